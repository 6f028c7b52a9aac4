//! Review workflow engine for gh-review
//!
//! Drives a pull-request review end to end: fetch the diff, filter the
//! changed files, fan the (file × role) analysis units out to the
//! analyzers, join, merge and deduplicate the findings, and publish the
//! result. The workflow is an explicit state machine over one typed
//! aggregate (`ReviewRun`); every terminal run lands in exactly one of
//! five distinguishable outcomes.

pub mod merge;
pub mod remap;
pub mod report;
pub mod run;
pub mod workflow;

pub use merge::{merge_findings, MergeSummary, RoleBuckets};
pub use remap::{remap_findings, RemappedFindings};
pub use run::{ReviewRun, RunStatus, Stage, UnitFailure};
pub use workflow::ReviewWorkflow;
