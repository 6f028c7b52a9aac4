//! Configuration and retry policy for gh-review
//!
//! This crate provides:
//! - Application configuration (AppConfig) loaded from gh-review.toml
//! - Secret lookup from the process environment
//! - The retry policy object shared by all external call sites

pub mod app_config;
pub mod config_file;
pub mod retry;

pub use app_config::{AnalyzerConfig, AppConfig, FilterConfig, MergeConfig, RetryConfig};
pub use config_file::load_config_file;
pub use retry::RetryPolicy;
