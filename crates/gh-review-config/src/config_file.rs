//! Config file discovery
//!
//! Looks for gh-review.toml in the current working directory first, then in
//! the user's home directory.

use std::fs;
use std::path::PathBuf;

/// Name of the configuration file.
pub const CONFIG_FILE_NAME: &str = "gh-review.toml";

/// Candidate paths for the config file, in priority order.
fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(CONFIG_FILE_NAME));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(CONFIG_FILE_NAME));
    }

    paths
}

/// Load the first config file found, returning its contents.
pub fn load_config_file() -> Option<String> {
    for path in candidate_paths() {
        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(content) => {
                    log::debug!("Loaded config from {}", path.display());
                    return Some(content);
                }
                Err(e) => {
                    log::warn!("Failed to read {}: {}", path.display(), e);
                }
            }
        }
    }
    None
}
