//! GitHub client trait.

use crate::error::GitHubError;
use crate::types::{PrCoordinate, PrMetadata, ReviewSubmission};
use async_trait::async_trait;

/// GitHub API client trait
///
/// Defines the operations the review workflow needs from GitHub. Errors
/// carry their retry classification (`GitHubError::is_transient`); the
/// caller owns the retry policy.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow sharing across async
/// tasks.
#[async_trait]
pub trait GitHubClient: Send + Sync {
    /// Fetch the raw unified diff for the entire PR as one string.
    async fn fetch_raw_diff(&self, pr: &PrCoordinate) -> Result<String, GitHubError>;

    /// Fetch PR metadata (title, author, head SHA, ...).
    async fn fetch_pr_metadata(&self, pr: &PrCoordinate) -> Result<PrMetadata, GitHubError>;

    /// Post a complete review with inline comments.
    ///
    /// Returns the review ID on success.
    async fn post_review(
        &self,
        pr: &PrCoordinate,
        review: &ReviewSubmission,
    ) -> Result<u64, GitHubError>;

    /// Post a plain (non-inline) comment on the PR.
    ///
    /// This is the degraded fallback when inline positions are rejected.
    /// Returns the comment ID on success.
    async fn post_comment(&self, pr: &PrCoordinate, body: &str) -> Result<u64, GitHubError>;
}
