//! Commentable-line maps for inline review placement.
//!
//! The review API only accepts inline comments on lines that are part of
//! the diff (added or context lines of the new file). Analyzers report
//! against the new file without knowing that, so their line numbers must be
//! checked against this map and, when they miss, nudged to the nearest line
//! that can legally host a comment.

use std::collections::{BTreeSet, HashMap};

use crate::parser::DiffError;
use unidiff::PatchSet;

/// Per-file set of new-file line numbers that may receive an inline comment.
///
/// Built once from the diff, queried many times, never mutated.
#[derive(Debug, Clone, Default)]
pub struct LineMap {
    commentable: BTreeSet<u32>,
}

impl LineMap {
    pub fn from_lines(lines: impl IntoIterator<Item = u32>) -> Self {
        Self {
            commentable: lines.into_iter().collect(),
        }
    }

    pub fn contains(&self, line: u32) -> bool {
        self.commentable.contains(&line)
    }

    pub fn is_empty(&self) -> bool {
        self.commentable.is_empty()
    }

    pub fn len(&self) -> usize {
        self.commentable.len()
    }

    /// Find the nearest commentable line to `target`, searching outward up
    /// to `max_distance` lines. The target itself wins if present; at equal
    /// distance the line *below* the target is preferred over the line
    /// above.
    pub fn nearest_commentable(&self, target: u32, max_distance: u32) -> Option<u32> {
        if self.contains(target) {
            return Some(target);
        }

        for distance in 1..=max_distance {
            if self.contains(target + distance) {
                return Some(target + distance);
            }
            if let Some(below) = target.checked_sub(distance) {
                if self.contains(below) {
                    return Some(below);
                }
            }
        }

        None
    }
}

/// Build commentable-line maps for every file in the diff.
///
/// Added *and* context lines count: both exist in the new file version.
/// Deleted files have an empty map; nothing on the new side to anchor to.
pub fn build_line_maps(diff_text: &str) -> Result<HashMap<String, LineMap>, DiffError> {
    let mut patch_set = PatchSet::new();
    patch_set
        .parse(diff_text)
        .map_err(|e| DiffError::ParseFailed(e.to_string()))?;

    let mut maps = HashMap::new();

    for file in patch_set.files() {
        let path = crate::parser::parsed_file_path(file);
        let mut lines = BTreeSet::new();

        for hunk in file.hunks() {
            for line in hunk.lines() {
                if matches!(line.line_type.as_str(), "+" | " ") {
                    if let Some(n) = line.target_line_no {
                        lines.insert(n as u32);
                    }
                }
            }
        }

        maps.insert(path, LineMap { commentable: lines });
    }

    Ok(maps)
}
