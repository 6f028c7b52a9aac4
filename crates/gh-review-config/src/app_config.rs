//! Application configuration
//!
//! Configuration loaded from gh-review.toml file. Every field has a default
//! so a partial (or absent) file is always valid. Secrets are never read
//! from the file; they come from the process environment.

use serde::{Deserialize, Serialize};
use std::env;

/// Application configuration loaded from gh-review.toml
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    #[serde(default)]
    pub retry: RetryConfig,

    #[serde(default)]
    pub merge: MergeConfig,

    #[serde(default)]
    pub filter: FilterConfig,
}

/// Settings for the model-backed analyzers.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AnalyzerConfig {
    /// Model identifier sent to the generateContent endpoint.
    #[serde(default = "default_model")]
    pub model: String,

    /// Maximum lines of numbered code per request before chunking.
    #[serde(default = "default_max_lines_per_chunk")]
    pub max_lines_per_chunk: usize,

    /// Maximum characters per request before chunking.
    #[serde(default = "default_max_chars_per_chunk")]
    pub max_chars_per_chunk: usize,

    /// Upper bound on concurrent analyzer requests during the fan-out.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_model() -> String {
    "gemini-2.5-flash-lite".to_string()
}

fn default_max_lines_per_chunk() -> usize {
    200
}

fn default_max_chars_per_chunk() -> usize {
    15_000
}

fn default_max_concurrency() -> usize {
    4
}

fn default_request_timeout_secs() -> u64 {
    120
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            max_lines_per_chunk: default_max_lines_per_chunk(),
            max_chars_per_chunk: default_max_chars_per_chunk(),
            max_concurrency: default_max_concurrency(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Retry budget applied per external call.
#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
pub struct RetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    1_000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
        }
    }
}

/// Knobs for the finding merge step.
#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
pub struct MergeConfig {
    /// Word-overlap ratio above which two descriptions count as duplicates.
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,

    /// How far from the reported line to search for a commentable line.
    #[serde(default = "default_line_search_radius")]
    pub line_search_radius: u32,
}

fn default_similarity_threshold() -> f64 {
    0.6
}

fn default_line_search_radius() -> u32 {
    5
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: default_similarity_threshold(),
            line_search_radius: default_line_search_radius(),
        }
    }
}

/// File skip rules applied before analysis.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FilterConfig {
    /// Suffixes excluded from review (matched case-insensitively, so
    /// compound suffixes like ".min.js" work).
    #[serde(default = "default_skip_extensions")]
    pub skip_extensions: Vec<String>,

    /// Exact basenames excluded from review.
    #[serde(default = "default_skip_basenames")]
    pub skip_basenames: Vec<String>,

    /// Directory prefixes (with trailing slash) excluded from review.
    #[serde(default = "default_skip_directories")]
    pub skip_directories: Vec<String>,

    /// Also analyze deleted files and files with no added lines.
    #[serde(default)]
    pub include_deletions: bool,
}

fn default_skip_extensions() -> Vec<String> {
    [
        // Docs
        ".md", ".txt", ".rst", ".adoc",
        // Lock files
        ".lock",
        // Images
        ".png", ".jpg", ".jpeg", ".gif", ".svg", ".ico", ".webp",
        // Fonts
        ".woff", ".woff2", ".ttf", ".eot",
        // Data
        ".csv", ".json", ".xml", ".yaml", ".yml", ".toml",
        // Build artifacts
        ".min.js", ".min.css", ".map",
        // Binaries
        ".exe", ".dll", ".so", ".dylib", ".pyc",
        // Archives
        ".zip", ".tar", ".gz", ".pdf",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_skip_basenames() -> Vec<String> {
    [
        "package-lock.json",
        "yarn.lock",
        "pnpm-lock.yaml",
        "Pipfile.lock",
        "poetry.lock",
        "composer.lock",
        "Gemfile.lock",
        "Cargo.lock",
        "uv.lock",
        ".gitignore",
        ".gitattributes",
        ".editorconfig",
        "LICENSE",
        "LICENSE.md",
        "LICENSE.txt",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_skip_directories() -> Vec<String> {
    [
        "node_modules/",
        "vendor/",
        "dist/",
        "build/",
        ".git/",
        "__pycache__/",
        ".venv/",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            skip_extensions: default_skip_extensions(),
            skip_basenames: default_skip_basenames(),
            skip_directories: default_skip_directories(),
            include_deletions: false,
        }
    }
}

impl AppConfig {
    /// Load config from CWD first, then home directory, or use defaults.
    pub fn load() -> Self {
        if let Some(content) = crate::load_config_file() {
            match toml::from_str(&content) {
                Ok(config) => {
                    log::info!("Loaded app config from file");
                    return config;
                }
                Err(e) => {
                    log::warn!("Failed to parse config file: {}", e);
                }
            }
        }

        log::debug!("Using default app config");
        Self::default()
    }

    /// Parse config from TOML text.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// GitHub token from the environment.
    pub fn github_token() -> anyhow::Result<String> {
        env::var("GITHUB_TOKEN").map_err(|_| {
            anyhow::anyhow!(
                "GITHUB_TOKEN not found. Set it in the environment or a .env file."
            )
        })
    }

    /// Gemini API key from the environment.
    pub fn gemini_api_key() -> anyhow::Result<String> {
        env::var("GEMINI_API_KEY").map_err(|_| {
            anyhow::anyhow!(
                "GEMINI_API_KEY not found. Set it in the environment or a .env file."
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.analyzer.model, "gemini-2.5-flash-lite");
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.merge.similarity_threshold, 0.6);
        assert_eq!(config.merge.line_search_radius, 5);
        assert!(!config.filter.include_deletions);
        assert!(config.filter.skip_basenames.contains(&"Cargo.lock".to_string()));
    }

    #[test]
    fn test_config_deserialize_partial() {
        let toml = r#"
            [analyzer]
            model = "gemini-2.5-pro"

            [merge]
            similarity_threshold = 0.8
        "#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.analyzer.model, "gemini-2.5-pro");
        assert_eq!(config.merge.similarity_threshold, 0.8);
        // Untouched sections keep their defaults
        assert_eq!(config.merge.line_search_radius, 5);
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.analyzer.max_lines_per_chunk, 200);
    }

    #[test]
    fn test_config_deserialize_empty() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.retry.base_delay_ms, 1_000);
        assert!(!config.filter.skip_extensions.is_empty());
    }

    #[test]
    fn test_filter_overrides_replace_lists() {
        let toml = r#"
            [filter]
            skip_directories = ["generated/"]
            include_deletions = true
        "#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.filter.skip_directories, vec!["generated/".to_string()]);
        assert!(config.filter.include_deletions);
        // Other lists still default
        assert!(config.filter.skip_basenames.contains(&"yarn.lock".to_string()));
    }
}
