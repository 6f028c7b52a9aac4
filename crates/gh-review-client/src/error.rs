//! GitHub API error classification.

use thiserror::Error;

/// Errors from the GitHub boundary, classified for retry decisions.
#[derive(Debug, Error)]
pub enum GitHubError {
    /// The PR or repository does not exist (or the token cannot see it).
    #[error("not found: {0}")]
    NotFound(String),

    /// The token lacks permission for the operation.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// The API rate limit was hit.
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// A transient transport or server failure.
    #[error("transient error: {0}")]
    Transient(String),

    /// An invalid repo/PR coordinate was supplied.
    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// Any other API failure (validation errors, malformed responses).
    #[error("GitHub API error: {0}")]
    Api(String),
}

impl GitHubError {
    /// Whether a retry with backoff could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, GitHubError::RateLimited(_) | GitHubError::Transient(_))
    }
}

/// Map an octocrab error onto the classification above.
///
/// API responses are classified by status code; anything below the HTTP
/// layer (connect, timeout) counts as transient.
pub(crate) fn classify_octocrab(err: octocrab::Error) -> GitHubError {
    match err {
        octocrab::Error::GitHub { source, .. } => {
            let message = source.message.clone();
            match source.status_code.as_u16() {
                404 => GitHubError::NotFound(message),
                401 => GitHubError::PermissionDenied(message),
                403 => {
                    if message.to_lowercase().contains("rate limit") {
                        GitHubError::RateLimited(message)
                    } else {
                        GitHubError::PermissionDenied(message)
                    }
                }
                429 => GitHubError::RateLimited(message),
                500..=599 => GitHubError::Transient(message),
                _ => GitHubError::Api(message),
            }
        }
        other => GitHubError::Transient(other.to_string()),
    }
}
