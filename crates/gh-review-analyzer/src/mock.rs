//! Deterministic mock analyzer for tests and offline runs.

use async_trait::async_trait;

use crate::analyzer::{Analyzer, AnalyzerError};
use crate::finding::{Category, Finding, Severity};
use crate::role::ReviewRole;

/// Analyzer returning canned findings without any network traffic.
pub struct MockAnalyzer {
    role: ReviewRole,
    findings: Vec<Finding>,
    fail: bool,
}

impl MockAnalyzer {
    /// One representative finding per call, like a real but dull reviewer.
    pub fn new(role: ReviewRole) -> Self {
        Self {
            role,
            findings: vec![Finding::new(
                Severity::Medium,
                Category::Bug,
                "Mock finding for testing",
            )
            .at_line(1)
            .with_fix("This is a mock fix")],
            fail: false,
        }
    }

    /// Return exactly these findings on every call.
    pub fn with_findings(role: ReviewRole, findings: Vec<Finding>) -> Self {
        Self {
            role,
            findings,
            fail: false,
        }
    }

    /// Fail every call with a transient error.
    pub fn failing(role: ReviewRole) -> Self {
        Self {
            role,
            findings: Vec::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl Analyzer for MockAnalyzer {
    fn role(&self) -> ReviewRole {
        self.role
    }

    async fn analyze(&self, _code: &str, filename: &str) -> Result<Vec<Finding>, AnalyzerError> {
        if self.fail {
            return Err(AnalyzerError::Transient(format!(
                "mock {} analyzer failure on {}",
                self.role, filename
            )));
        }
        Ok(self.findings.clone())
    }
}
