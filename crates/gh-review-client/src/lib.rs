//! GitHub API boundary for gh-review
//!
//! This crate provides the trait-based GitHub collaborator the review
//! workflow talks to: fetching the raw unified diff and PR metadata, and
//! publishing the finished review (inline or as a plain comment fallback).
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │              GitHubClient trait                  │
//! │  - fetch_raw_diff()                              │
//! │  - fetch_pr_metadata()                           │
//! │  - post_review() / post_comment()                │
//! └─────────────────────────────────────────────────┘
//!                        │
//!                        ▼
//!              ┌─────────────────┐
//!              │ OctocrabClient  │
//!              │ (direct API)    │
//!              └─────────────────┘
//! ```
//!
//! Errors carry a fatal/transient classification so callers can decide
//! what is worth retrying: not-found and permission failures never are,
//! rate limits and 5xx responses are.

pub mod client;
pub mod error;
pub mod octocrab_client;
pub mod types;

pub use client::GitHubClient;
pub use error::GitHubError;
pub use octocrab_client::OctocrabClient;
pub use types::{PrCoordinate, PrMetadata, ReviewComment, ReviewEvent, ReviewSubmission, Side};

// Re-export octocrab so consumers don't need to depend on it directly
pub use octocrab;
