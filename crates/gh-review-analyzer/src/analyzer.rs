//! Analyzer trait and error classification.

use crate::finding::Finding;
use crate::role::ReviewRole;
use async_trait::async_trait;
use thiserror::Error;

/// Errors from an analyzer call, classified for retry decisions.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// Transient transport or server failure (timeout, 429, 5xx).
    #[error("transient model failure: {0}")]
    Transient(String),

    /// Non-retryable API failure.
    #[error("model API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The model answered, but not with parseable review JSON.
    #[error("unparseable model response: {0}")]
    InvalidResponse(String),
}

impl AnalyzerError {
    /// Whether a retry with backoff could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, AnalyzerError::Transient(_))
    }
}

/// A single analysis perspective over one file's added code.
///
/// `code` is the added-lines-only content of a file, each line prefixed
/// with its new-file line number in a fixed-width field (`{:>4}| `).
/// Implementations are invoked concurrently across (file × role) pairs and
/// must be `Send + Sync`.
#[async_trait]
pub trait Analyzer: Send + Sync {
    /// The perspective this analyzer applies.
    fn role(&self) -> ReviewRole;

    /// Analyze the code and return findings. Line numbers in findings
    /// refer to the new file.
    async fn analyze(&self, code: &str, filename: &str) -> Result<Vec<Finding>, AnalyzerError>;
}
