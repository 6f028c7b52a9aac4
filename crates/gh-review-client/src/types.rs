//! Types crossing the GitHub boundary.

use chrono::{DateTime, Utc};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

use crate::error::GitHubError;

/// Repository + pull request coordinate ("owner/repo" and a PR number).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrCoordinate {
    pub owner: String,
    pub repo: String,
    pub number: u64,
}

fn slug_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[\w.-]+/[\w.-]+$").expect("valid slug regex"))
}

impl PrCoordinate {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>, number: u64) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            number,
        }
    }

    /// Parse an `owner/repo` slug and PR number, validating the slug shape.
    pub fn parse(slug: &str, number: u64) -> Result<Self, GitHubError> {
        if !slug_pattern().is_match(slug) {
            return Err(GitHubError::InvalidCoordinate(format!(
                "invalid repo format: {:?}, expected 'owner/repo'",
                slug
            )));
        }
        let (owner, repo) = slug.split_once('/').expect("slug matched pattern");
        Ok(Self::new(owner, repo, number))
    }

    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

impl fmt::Display for PrCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.number)
    }
}

/// Pull request metadata.
#[derive(Debug, Clone)]
pub struct PrMetadata {
    pub number: u64,
    pub title: String,
    pub author: String,
    pub draft: bool,
    pub state: String,
    pub base_branch: String,
    pub head_branch: String,
    /// Head commit SHA, used to anchor the posted review.
    pub head_sha: String,
    pub description: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Which side of the diff a comment is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Old file (deletions side).
    Left,
    /// New file (additions side).
    Right,
}

impl Side {
    /// Convert to GitHub API string representation.
    pub fn as_github_str(&self) -> &'static str {
        match self {
            Side::Left => "LEFT",
            Side::Right => "RIGHT",
        }
    }
}

/// A comment to post on a specific line in a PR.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewComment {
    /// File path relative to the repository root.
    pub path: String,
    /// Line number in the file version given by `side`.
    pub line: u32,
    pub side: Side,
    /// Comment body (markdown).
    pub body: String,
}

/// The type of review to submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReviewEvent {
    Approve,
    RequestChanges,
    #[default]
    Comment,
}

impl ReviewEvent {
    /// Convert to GitHub API string representation.
    pub fn as_github_str(&self) -> &'static str {
        match self {
            ReviewEvent::Approve => "APPROVE",
            ReviewEvent::RequestChanges => "REQUEST_CHANGES",
            ReviewEvent::Comment => "COMMENT",
        }
    }
}

/// A complete review to submit to a PR.
#[derive(Debug, Clone, Default)]
pub struct ReviewSubmission {
    /// Overall summary body.
    pub body: String,
    pub event: ReviewEvent,
    pub comments: Vec<ReviewComment>,
    /// Commit the review is anchored to; defaults to the PR head when None.
    pub commit_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_valid_slug() {
        let coord = PrCoordinate::parse("rust-lang/rust", 42).unwrap();
        assert_eq!(coord.owner, "rust-lang");
        assert_eq!(coord.repo, "rust");
        assert_eq!(coord.number, 42);
        assert_eq!(coord.to_string(), "rust-lang/rust#42");
    }

    #[test]
    fn test_parse_slug_with_dots() {
        let coord = PrCoordinate::parse("some.org/repo.name", 1).unwrap();
        assert_eq!(coord.slug(), "some.org/repo.name");
    }

    #[test]
    fn test_parse_rejects_bad_slugs() {
        assert!(PrCoordinate::parse("no-slash", 1).is_err());
        assert!(PrCoordinate::parse("too/many/parts", 1).is_err());
        assert!(PrCoordinate::parse("", 1).is_err());
        assert!(PrCoordinate::parse("owner/", 1).is_err());
    }

    #[test]
    fn test_side_github_str() {
        assert_eq!(Side::Left.as_github_str(), "LEFT");
        assert_eq!(Side::Right.as_github_str(), "RIGHT");
    }

    #[test]
    fn test_review_event_github_str() {
        assert_eq!(ReviewEvent::Approve.as_github_str(), "APPROVE");
        assert_eq!(ReviewEvent::RequestChanges.as_github_str(), "REQUEST_CHANGES");
        assert_eq!(ReviewEvent::Comment.as_github_str(), "COMMENT");
    }
}
