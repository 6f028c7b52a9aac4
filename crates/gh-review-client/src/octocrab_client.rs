//! Octocrab-based GitHub API client
//!
//! Direct implementation of the `GitHubClient` trait using the octocrab
//! library. Review submission goes through the raw REST route because
//! octocrab does not model the reviews endpoint with inline comments.

use crate::client::GitHubClient;
use crate::error::{classify_octocrab, GitHubError};
use crate::types::{PrCoordinate, PrMetadata, ReviewSubmission};
use async_trait::async_trait;
use log::debug;
use octocrab::Octocrab;
use serde_json::json;
use std::sync::Arc;

/// Direct GitHub API client using octocrab.
#[derive(Debug, Clone)]
pub struct OctocrabClient {
    octocrab: Arc<Octocrab>,
}

impl OctocrabClient {
    /// Create a new client with the given octocrab instance.
    pub fn new(octocrab: Arc<Octocrab>) -> Self {
        Self { octocrab }
    }

    /// Build a client from a personal access token.
    pub fn from_token(token: impl Into<String>) -> Result<Self, GitHubError> {
        let octocrab = Octocrab::builder()
            .personal_token(token.into())
            .build()
            .map_err(classify_octocrab)?;
        Ok(Self::new(Arc::new(octocrab)))
    }
}

#[async_trait]
impl GitHubClient for OctocrabClient {
    async fn fetch_raw_diff(&self, pr: &PrCoordinate) -> Result<String, GitHubError> {
        debug!("Fetching raw diff for {}", pr);

        let diff = self
            .octocrab
            .pulls(&pr.owner, &pr.repo)
            .get_diff(pr.number)
            .await
            .map_err(classify_octocrab)?;

        debug!("Fetched {} bytes of diff for {}", diff.len(), pr);
        Ok(diff)
    }

    async fn fetch_pr_metadata(&self, pr: &PrCoordinate) -> Result<PrMetadata, GitHubError> {
        debug!("Fetching metadata for {}", pr);

        let pull = self
            .octocrab
            .pulls(&pr.owner, &pr.repo)
            .get(pr.number)
            .await
            .map_err(classify_octocrab)?;

        Ok(convert_pull_request(&pull))
    }

    async fn post_review(
        &self,
        pr: &PrCoordinate,
        review: &ReviewSubmission,
    ) -> Result<u64, GitHubError> {
        debug!(
            "Posting review on {} with {} inline comments",
            pr,
            review.comments.len()
        );

        let comments: Vec<serde_json::Value> = review
            .comments
            .iter()
            .map(|c| {
                json!({
                    "path": c.path,
                    "line": c.line,
                    "side": c.side.as_github_str(),
                    "body": c.body,
                })
            })
            .collect();

        let mut payload = json!({
            "body": review.body,
            "event": review.event.as_github_str(),
            "comments": comments,
        });
        if let Some(sha) = &review.commit_id {
            payload["commit_id"] = json!(sha);
        }

        let route = format!(
            "/repos/{}/{}/pulls/{}/reviews",
            pr.owner, pr.repo, pr.number
        );
        let response: serde_json::Value = self
            .octocrab
            .post(route, Some(&payload))
            .await
            .map_err(classify_octocrab)?;

        let id = response["id"]
            .as_u64()
            .ok_or_else(|| GitHubError::Api("review response carried no id".to_string()))?;

        debug!("Posted review {} on {}", id, pr);
        Ok(id)
    }

    async fn post_comment(&self, pr: &PrCoordinate, body: &str) -> Result<u64, GitHubError> {
        debug!("Posting plain comment on {}", pr);

        let route = format!(
            "/repos/{}/{}/issues/{}/comments",
            pr.owner, pr.repo, pr.number
        );
        let response: serde_json::Value = self
            .octocrab
            .post(route, Some(&json!({ "body": body })))
            .await
            .map_err(classify_octocrab)?;

        let id = response["id"]
            .as_u64()
            .ok_or_else(|| GitHubError::Api("comment response carried no id".to_string()))?;

        debug!("Posted comment {} on {}", id, pr);
        Ok(id)
    }
}

/// Convert octocrab's PullRequest model to our PrMetadata type.
fn convert_pull_request(pr: &octocrab::models::pulls::PullRequest) -> PrMetadata {
    PrMetadata {
        number: pr.number,
        title: pr.title.clone().unwrap_or_default(),
        author: pr
            .user
            .as_ref()
            .map(|u| u.login.clone())
            .unwrap_or_else(|| "unknown".to_string()),
        draft: pr.draft.unwrap_or(false),
        state: pr
            .state
            .as_ref()
            .map(|s| format!("{:?}", s).to_lowercase())
            .unwrap_or_else(|| "unknown".to_string()),
        base_branch: pr.base.ref_field.clone(),
        head_branch: pr.head.ref_field.clone(),
        head_sha: pr.head.sha.clone(),
        description: pr.body.clone(),
        created_at: pr.created_at,
    }
}
