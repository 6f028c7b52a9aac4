//! File skip rules
//!
//! Decides which changed files are worth analyzing. Lock files, binaries,
//! vendored directories and documentation produce no useful findings and
//! burn analyzer quota, so they are dropped before the fan-out.

use gh_review_config::FilterConfig;

use crate::model::{FileChange, FileStatus};

/// File filter built from configured skip lists.
///
/// Match semantics are part of the contract: directory rules match as a
/// path prefix (or anywhere after a `/`), basename rules match the final
/// path segment exactly, extension rules match as a case-insensitive
/// suffix.
#[derive(Debug, Clone)]
pub struct FileFilter {
    skip_extensions: Vec<String>,
    skip_basenames: Vec<String>,
    skip_directories: Vec<String>,
    include_deletions: bool,
}

impl FileFilter {
    pub fn from_config(config: &FilterConfig) -> Self {
        Self {
            skip_extensions: config
                .skip_extensions
                .iter()
                .map(|e| e.to_lowercase())
                .collect(),
            skip_basenames: config.skip_basenames.clone(),
            skip_directories: config.skip_directories.clone(),
            include_deletions: config.include_deletions,
        }
    }

    /// Check whether a path passes the skip rules.
    pub fn should_review(&self, path: &str) -> bool {
        for dir in &self.skip_directories {
            if path.starts_with(dir.as_str()) || path.contains(&format!("/{}", dir)) {
                return false;
            }
        }

        let basename = path.rsplit('/').next().unwrap_or(path);
        if self.skip_basenames.iter().any(|name| name == basename) {
            return false;
        }

        let lower = path.to_lowercase();
        if self.skip_extensions.iter().any(|ext| lower.ends_with(ext)) {
            return false;
        }

        true
    }

    /// Filter a parsed file list down to the files worth analyzing.
    ///
    /// Unless deletions are explicitly included, deleted files and files
    /// with zero added lines are dropped too: there is nothing new to
    /// analyze in them.
    pub fn filter_files(&self, files: Vec<FileChange>) -> Vec<FileChange> {
        files
            .into_iter()
            .filter(|file| {
                if !self.should_review(&file.path) {
                    log::debug!("Skipping {} (skip rules)", file.path);
                    return false;
                }
                if !self.include_deletions {
                    if file.status == FileStatus::Deleted {
                        log::debug!("Skipping {} (deleted)", file.path);
                        return false;
                    }
                    if file.added_lines.is_empty() {
                        log::debug!("Skipping {} (no added lines)", file.path);
                        return false;
                    }
                }
                true
            })
            .collect()
    }
}

impl Default for FileFilter {
    fn default() -> Self {
        Self::from_config(&FilterConfig::default())
    }
}
