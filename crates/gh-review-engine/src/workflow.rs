//! The review workflow state machine.
//!
//! Stages run in a fixed order over one `ReviewRun` aggregate:
//!
//! ```text
//! FETCHING -> FILTERING -> ANALYZING -> MERGING -> DECIDING -+-> PUBLISHING -> TERMINAL
//!     |                  (fan-out/join)                      |
//!     +-> TERMINAL (fetch/parse failure)                     +-> DONE -> TERMINAL
//! ```
//!
//! A fetch or parse failure short-circuits before any analysis is
//! dispatched. Analyzer units fail in isolation: the (file, role) pair is
//! recorded and contributes zero findings, and the run keeps going.

use std::sync::Arc;

use futures::stream::{self, StreamExt};

use gh_review_analyzer::{Analyzer, Finding, ReviewRole};
use gh_review_client::{GitHubClient, GitHubError, PrCoordinate};
use gh_review_config::{AppConfig, RetryPolicy};
use gh_review_diff::{build_line_maps, parse_diff, FileFilter};

use crate::merge::merge_findings;
use crate::remap::remap_findings;
use crate::report;
use crate::run::{ReviewRun, RunStatus, Stage, UnitFailure};

/// Orchestrates one review run against a PR coordinate.
pub struct ReviewWorkflow {
    github: Arc<dyn GitHubClient>,
    analyzers: Vec<Arc<dyn Analyzer>>,
    config: AppConfig,
    retry: RetryPolicy,
    filter: FileFilter,
}

impl ReviewWorkflow {
    pub fn new(
        github: Arc<dyn GitHubClient>,
        analyzers: Vec<Arc<dyn Analyzer>>,
        config: AppConfig,
    ) -> Self {
        let retry = RetryPolicy::from_config(&config.retry);
        let filter = FileFilter::from_config(&config.filter);
        Self {
            github,
            analyzers,
            config,
            retry,
            filter,
        }
    }

    /// Drive the state machine to a terminal status.
    pub async fn run(&self, target: PrCoordinate) -> ReviewRun {
        let mut run = ReviewRun::new(target);

        while !run.is_terminal() {
            match run.stage() {
                Stage::Fetching => self.fetch(&mut run).await,
                Stage::Filtering => self.filter_files(&mut run),
                Stage::Analyzing => self.analyze(&mut run).await,
                Stage::Merging => self.merge(&mut run),
                Stage::Deciding => self.decide(&mut run),
                Stage::Publishing => self.publish(&mut run).await,
                Stage::Done => run.finish(RunStatus::DoneNoFindings),
                Stage::Terminal => break,
            }
        }

        run
    }

    async fn fetch(&self, run: &mut ReviewRun) {
        log::info!("Fetching {}", run.target);

        let metadata = self
            .retry
            .run(
                || self.github.fetch_pr_metadata(&run.target),
                GitHubError::is_transient,
            )
            .await;
        match metadata {
            Ok(metadata) => {
                log::info!(
                    "{}: \"{}\" by {} ({} -> {})",
                    run.target,
                    metadata.title,
                    metadata.author,
                    metadata.head_branch,
                    metadata.base_branch,
                );
                run.metadata = Some(metadata);
            }
            Err(e) => {
                log::error!("Failed to fetch PR metadata: {}", e);
                run.finish(RunStatus::FailedAtFetch {
                    reason: e.to_string(),
                });
                return;
            }
        }

        let diff = self
            .retry
            .run(
                || self.github.fetch_raw_diff(&run.target),
                GitHubError::is_transient,
            )
            .await;
        let diff = match diff {
            Ok(diff) => diff,
            Err(e) => {
                log::error!("Failed to fetch diff: {}", e);
                run.finish(RunStatus::FailedAtFetch {
                    reason: e.to_string(),
                });
                return;
            }
        };

        let files = match parse_diff(&diff) {
            Ok(files) => files,
            Err(e) => {
                log::error!("Failed to parse diff: {}", e);
                run.finish(RunStatus::FailedAtFetch {
                    reason: e.to_string(),
                });
                return;
            }
        };

        let line_maps = match build_line_maps(&diff) {
            Ok(maps) => maps,
            Err(e) => {
                run.finish(RunStatus::FailedAtFetch {
                    reason: e.to_string(),
                });
                return;
            }
        };

        run.raw_diff = diff;
        run.total_files = files.len();
        run.files = files;
        run.line_maps = line_maps;
        run.advance(Stage::Filtering);
    }

    fn filter_files(&self, run: &mut ReviewRun) {
        let parsed = std::mem::take(&mut run.files);
        run.files = self.filter.filter_files(parsed);
        log::info!(
            "Found {} file(s), {} to review",
            run.total_files,
            run.files.len()
        );
        run.advance(Stage::Analyzing);
    }

    /// Fan every (file × role) unit out to a bounded concurrent stream and
    /// join before moving on. Buckets are filled after the join, in role
    /// order then file order, so the merge input is deterministic.
    async fn analyze(&self, run: &mut ReviewRun) {
        let mut units: Vec<(Arc<dyn Analyzer>, usize, String, String)> = Vec::new();
        for (file_idx, file) in run.files.iter().enumerate() {
            let code = file.numbered_added_code();
            if code.trim().is_empty() {
                continue;
            }
            for analyzer in &self.analyzers {
                units.push((Arc::clone(analyzer), file_idx, file.path.clone(), code.clone()));
            }
        }

        if units.is_empty() {
            log::info!("No analyzable content");
            run.advance(Stage::Merging);
            return;
        }

        log::info!(
            "Analyzing {} unit(s) ({} file(s) x {} role(s))",
            units.len(),
            run.files.len(),
            self.analyzers.len()
        );

        let concurrency = self.config.analyzer.max_concurrency.max(1);
        let mut results: Vec<(ReviewRole, usize, String, Result<Vec<Finding>, _>)> =
            stream::iter(units)
                .map(|(analyzer, file_idx, path, code)| async move {
                    log::debug!("{} review: {}", analyzer.role(), path);
                    let outcome = analyzer.analyze(&code, &path).await;
                    (analyzer.role(), file_idx, path, outcome)
                })
                .buffer_unordered(concurrency)
                .collect()
                .await;

        results.sort_by_key(|(role, file_idx, _, _)| (role.index(), *file_idx));

        for (role, _, path, outcome) in results {
            match outcome {
                Ok(findings) => {
                    let bucket = run.buckets.get_mut(role);
                    for mut finding in findings {
                        finding.path = Some(path.clone());
                        bucket.push(finding);
                    }
                }
                Err(e) => {
                    log::warn!("{} analyzer failed on {}: {}", role, path, e);
                    run.unit_failures.push(UnitFailure {
                        path,
                        role,
                        error: e.to_string(),
                    });
                }
            }
        }

        run.advance(Stage::Merging);
    }

    fn merge(&self, run: &mut ReviewRun) {
        let (merged, summary) =
            merge_findings(&run.buckets, self.config.merge.similarity_threshold);
        log::info!(
            "Merged {} finding(s) into {} ({} duplicate(s) removed)",
            summary.input_count,
            summary.kept_count,
            summary.removed_count
        );

        let remapped = remap_findings(
            merged.clone(),
            &run.line_maps,
            self.config.merge.line_search_radius,
        );
        if !remapped.unmappable.is_empty() {
            log::info!(
                "{} finding(s) have no commentable line and will be reported in the body",
                remapped.unmappable.len()
            );
        }

        run.merged = merged;
        run.inline = remapped.inline;
        run.unmappable = remapped.unmappable;
        run.merge_summary = Some(summary);
        run.advance(Stage::Deciding);
    }

    fn decide(&self, run: &mut ReviewRun) {
        if run.merged.is_empty() {
            run.summary = "No issues found. Code looks good.".to_string();
            run.advance(Stage::Done);
        } else {
            run.summary = format!(
                "Found {} issue(s) across {} file(s).",
                run.merged.len(),
                run.files.len()
            );
            run.advance(Stage::Publishing);
        }
        log::info!("{}", run.summary);
    }

    async fn publish(&self, run: &mut ReviewRun) {
        let submission = report::build_submission(run);

        let posted = self
            .retry
            .run(
                || self.github.post_review(&run.target, &submission),
                GitHubError::is_transient,
            )
            .await;

        match posted {
            Ok(review_id) => run.finish(RunStatus::Published { review_id }),
            Err(e) => {
                log::warn!(
                    "Inline review failed ({}); retrying once as a plain comment",
                    e
                );
                let body = report::build_fallback_body(run);
                let fallback = self
                    .retry
                    .run(
                        || self.github.post_comment(&run.target, &body),
                        GitHubError::is_transient,
                    )
                    .await;
                match fallback {
                    Ok(comment_id) => {
                        run.used_fallback = true;
                        run.finish(RunStatus::Published {
                            review_id: comment_id,
                        });
                    }
                    Err(e) => {
                        log::error!("Fallback comment failed: {}", e);
                        run.finish(RunStatus::FailedAtPublish);
                    }
                }
            }
        }
    }
}
