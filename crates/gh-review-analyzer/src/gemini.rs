//! Gemini-backed analyzer.
//!
//! One instance per review role. Each call builds the role's prompt over
//! the numbered added code, requests a JSON-typed completion, and parses
//! the findings out of the response. Oversized files are reviewed in
//! chunks and the findings concatenated.

use std::time::Duration;

use async_trait::async_trait;
use gh_review_config::{AnalyzerConfig, RetryPolicy};
use serde_json::json;

use crate::analyzer::{Analyzer, AnalyzerError};
use crate::chunk::{chunk_code, ChunkLimits};
use crate::finding::Finding;
use crate::json::parse_review_json;
use crate::prompts::build_prompt;
use crate::role::ReviewRole;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

pub struct GeminiAnalyzer {
    role: ReviewRole,
    api_key: String,
    endpoint: String,
    client: reqwest::Client,
    retry: RetryPolicy,
    limits: ChunkLimits,
    timeout: Duration,
}

impl GeminiAnalyzer {
    pub fn new(
        role: ReviewRole,
        api_key: impl Into<String>,
        config: &AnalyzerConfig,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            role,
            api_key: api_key.into(),
            endpoint: format!("{}/{}:generateContent", API_BASE, config.model),
            client: reqwest::Client::new(),
            retry,
            limits: ChunkLimits::new(config.max_lines_per_chunk, config.max_chars_per_chunk),
            timeout: Duration::from_secs(config.request_timeout_secs),
        }
    }

    /// One request/response cycle for a single prompt.
    async fn request(&self, prompt: &str) -> Result<Vec<Finding>, AnalyzerError> {
        let payload = json!({
            "contents": [{
                "parts": [{ "text": prompt }]
            }],
            "generationConfig": {
                "temperature": 0.2,
                "responseMimeType": "application/json"
            }
        });

        let url = format!("{}?key={}", self.endpoint, self.api_key);
        let response = self
            .client
            .post(&url)
            .json(&payload)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| AnalyzerError::Transient(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status.as_u16(), body));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AnalyzerError::Transient(e.to_string()))?;

        let text = body["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or_else(|| {
                AnalyzerError::InvalidResponse("response carried no candidate text".to_string())
            })?;

        Ok(parse_review_json(text)?.findings)
    }

    async fn analyze_chunk(
        &self,
        chunk: &str,
        filename: &str,
        chunk_note: &str,
    ) -> Result<Vec<Finding>, AnalyzerError> {
        let prompt = build_prompt(self.role, chunk, filename, chunk_note);
        self.retry
            .run(|| self.request(&prompt), AnalyzerError::is_transient)
            .await
    }
}

/// Map an HTTP status onto the retry classification. The transient set
/// matches what the API actually emits under load: rate limiting, internal
/// errors, unavailability, upstream timeouts.
fn classify_status(status: u16, body: String) -> AnalyzerError {
    match status {
        429 | 500 | 502 | 503 | 504 => {
            AnalyzerError::Transient(format!("status {}: {}", status, body))
        }
        _ => AnalyzerError::Api {
            status,
            message: body,
        },
    }
}

#[async_trait]
impl Analyzer for GeminiAnalyzer {
    fn role(&self) -> ReviewRole {
        self.role
    }

    async fn analyze(&self, code: &str, filename: &str) -> Result<Vec<Finding>, AnalyzerError> {
        let chunks = chunk_code(code, self.limits);

        if chunks.len() == 1 {
            return self.analyze_chunk(&chunks[0], filename, "").await;
        }

        log::info!(
            "{}: large file {} split into {} chunks",
            self.role,
            filename,
            chunks.len()
        );

        let mut findings = Vec::new();
        let mut last_err: Option<AnalyzerError> = None;

        for (i, chunk) in chunks.iter().enumerate() {
            let note = format!("chunk {}/{}", i + 1, chunks.len());
            match self.analyze_chunk(chunk, filename, &note).await {
                Ok(chunk_findings) => findings.extend(chunk_findings),
                Err(e) => {
                    log::warn!("{}: {} {} failed: {}", self.role, filename, note, e);
                    last_err = Some(e);
                }
            }
        }

        // Partial chunk results are still useful; only a total loss fails
        // the call.
        if findings.is_empty() {
            if let Some(err) = last_err {
                return Err(err);
            }
        }

        Ok(findings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(classify_status(429, String::new()).is_transient());
        assert!(classify_status(503, String::new()).is_transient());
        assert!(classify_status(504, String::new()).is_transient());
        assert!(!classify_status(400, String::new()).is_transient());
        assert!(!classify_status(404, String::new()).is_transient());
    }

    #[test]
    fn test_endpoint_built_from_model() {
        let config = AnalyzerConfig {
            model: "gemini-2.5-pro".to_string(),
            ..AnalyzerConfig::default()
        };
        let analyzer = GeminiAnalyzer::new(
            ReviewRole::Security,
            "key",
            &config,
            RetryPolicy::default(),
        );
        assert!(analyzer.endpoint.ends_with("gemini-2.5-pro:generateContent"));
        assert_eq!(analyzer.role(), ReviewRole::Security);
    }
}
