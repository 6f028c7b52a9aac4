//! The review run aggregate.
//!
//! One `ReviewRun` is created per workflow invocation and threaded through
//! every stage. Stages are the only writers; once a terminal status is set
//! the run is read-only result data.

use std::collections::HashMap;

use gh_review_analyzer::{Finding, ReviewRole};
use gh_review_client::{PrCoordinate, PrMetadata};
use gh_review_diff::{FileChange, LineMap};

use crate::merge::{MergeSummary, RoleBuckets};

/// Workflow stages. `Done` is the no-findings exit that skips publishing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetching,
    Filtering,
    Analyzing,
    Merging,
    Deciding,
    Publishing,
    Done,
    Terminal,
}

/// Terminal result of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    /// A review (or fallback comment) was posted.
    Published { review_id: u64 },
    /// Analysis came back clean; nothing was posted.
    DoneNoFindings,
    /// Fetch or parse failed; no analysis was dispatched.
    FailedAtFetch { reason: String },
    /// Findings were computed but could not be posted at all.
    FailedAtPublish,
}

/// One analyzer call that failed after retries. The run continues; the
/// (file, role) pair just contributes zero findings.
#[derive(Debug, Clone)]
pub struct UnitFailure {
    pub path: String,
    pub role: ReviewRole,
    pub error: String,
}

/// Aggregate state of one review run.
#[derive(Debug)]
pub struct ReviewRun {
    pub target: PrCoordinate,
    pub metadata: Option<PrMetadata>,

    pub raw_diff: String,
    /// Count of files in the diff before filtering.
    pub total_files: usize,
    /// Files that passed the filter, in diff order.
    pub files: Vec<FileChange>,
    pub line_maps: HashMap<String, LineMap>,

    /// Per-role finding buckets filled after the analysis join.
    pub buckets: RoleBuckets,
    /// Merged, deduplicated, severity-ordered findings.
    pub merged: Vec<Finding>,
    /// Merged findings that can host an inline comment.
    pub inline: Vec<Finding>,
    /// Merged findings with no commentable anchor; reported in the body.
    pub unmappable: Vec<Finding>,
    pub merge_summary: Option<MergeSummary>,

    pub summary: String,
    pub unit_failures: Vec<UnitFailure>,
    /// Whether publishing fell back to a plain comment.
    pub used_fallback: bool,

    stage: Stage,
    status: Option<RunStatus>,
}

impl ReviewRun {
    pub fn new(target: PrCoordinate) -> Self {
        Self {
            target,
            metadata: None,
            raw_diff: String::new(),
            total_files: 0,
            files: Vec::new(),
            line_maps: HashMap::new(),
            buckets: RoleBuckets::default(),
            merged: Vec::new(),
            inline: Vec::new(),
            unmappable: Vec::new(),
            merge_summary: None,
            summary: String::new(),
            unit_failures: Vec::new(),
            used_fallback: false,
            stage: Stage::Fetching,
            status: None,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Move to the next stage. Ignored once the run is terminal.
    pub fn advance(&mut self, stage: Stage) {
        if self.stage == Stage::Terminal {
            return;
        }
        log::debug!("{}: stage {:?} -> {:?}", self.target, self.stage, stage);
        self.stage = stage;
    }

    /// Set the terminal status and stop the state machine.
    pub fn finish(&mut self, status: RunStatus) {
        log::info!("{}: terminal status {:?}", self.target, status);
        self.status = Some(status);
        self.stage = Stage::Terminal;
    }

    pub fn status(&self) -> Option<&RunStatus> {
        self.status.as_ref()
    }

    pub fn is_terminal(&self) -> bool {
        self.stage == Stage::Terminal
    }

    /// At least one (file, role) unit failed but the run completed anyway.
    pub fn is_partial(&self) -> bool {
        !self.unit_failures.is_empty()
            && matches!(
                self.status,
                Some(RunStatus::Published { .. }) | Some(RunStatus::DoneNoFindings)
            )
    }

    /// Five-way outcome surface.
    ///
    /// Completed runs that lost at least one analysis unit report as
    /// `partial-analysis`; the publish result stays available in
    /// `status()`.
    pub fn outcome_label(&self) -> &'static str {
        match self.status {
            Some(RunStatus::FailedAtFetch { .. }) => "failed-at-fetch",
            Some(RunStatus::FailedAtPublish) => "failed-at-publish",
            Some(RunStatus::Published { .. }) if self.is_partial() => "partial-analysis",
            Some(RunStatus::DoneNoFindings) if self.is_partial() => "partial-analysis",
            Some(RunStatus::Published { .. }) => "published",
            Some(RunStatus::DoneNoFindings) => "done-no-findings",
            None => "running",
        }
    }
}
