//! Review finding data model.
//!
//! Findings are value objects: two findings with equal fields are
//! interchangeable. Analyzers produce them without a `path` (they only see
//! one file at a time); the workflow stamps the path in afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Finding severity, most severe first.
///
/// The declaration order drives `Ord`: `Critical < High < Medium < Low`,
/// so an ascending sort puts the most severe findings first and `min`
/// picks the more severe of two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    /// Numeric rank; lower means more severe.
    pub fn rank(&self) -> u8 {
        match self {
            Severity::Critical => 0,
            Severity::High => 1,
            Severity::Medium => 2,
            Severity::Low => 3,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Critical => write!(f, "CRITICAL"),
            Severity::High => write!(f, "HIGH"),
            Severity::Medium => write!(f, "MEDIUM"),
            Severity::Low => write!(f, "LOW"),
        }
    }
}

/// Finding category tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Bug,
    Security,
    Performance,
    Style,
    Quality,
    /// Anything the model invents that we do not classify.
    #[serde(other)]
    Other,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Bug => write!(f, "bug"),
            Category::Security => write!(f, "security"),
            Category::Performance => write!(f, "performance"),
            Category::Style => write!(f, "style"),
            Category::Quality => write!(f, "quality"),
            Category::Other => write!(f, "other"),
        }
    }
}

/// A single reported issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    #[serde(default = "default_severity")]
    pub severity: Severity,

    #[serde(default)]
    pub category: Category,

    /// Line number against the new file, if the analyzer gave one.
    #[serde(default)]
    pub line: Option<u32>,

    /// File path; set by the workflow, not by the analyzer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// What the issue is.
    pub description: String,

    /// Suggested fix, possibly empty.
    #[serde(default)]
    pub fix: String,

    /// The originally reported line, kept when remapping adjusted `line`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_line: Option<u32>,
}

fn default_severity() -> Severity {
    Severity::Medium
}

impl Finding {
    pub fn new(severity: Severity, category: Category, description: impl Into<String>) -> Self {
        Self {
            severity,
            category,
            line: None,
            path: None,
            description: description.into(),
            fix: String::new(),
            original_line: None,
        }
    }

    pub fn at_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_fix(mut self, fix: impl Into<String>) -> Self {
        self.fix = fix.into();
        self
    }
}

/// Complete payload of one analyzer call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewResult {
    #[serde(default)]
    pub findings: Vec<Finding>,

    #[serde(default)]
    pub summary: String,
}
