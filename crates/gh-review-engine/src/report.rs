//! Assembling the published review from merged findings.

use gh_review_analyzer::{Finding, Severity};
use gh_review_client::{ReviewComment, ReviewEvent, ReviewSubmission, Side};

use crate::merge::MergeSummary;
use crate::run::ReviewRun;

/// Findings per severity, for the summary header.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeverityCount {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

pub fn count_by_severity(findings: &[Finding]) -> SeverityCount {
    let mut count = SeverityCount::default();
    for finding in findings {
        match finding.severity {
            Severity::Critical => count.critical += 1,
            Severity::High => count.high += 1,
            Severity::Medium => count.medium += 1,
            Severity::Low => count.low += 1,
        }
    }
    count
}

/// Build the inline review submission for a run that reached PUBLISHING.
pub fn build_submission(run: &ReviewRun) -> ReviewSubmission {
    let comments = run
        .inline
        .iter()
        .filter_map(|finding| {
            let (path, line) = match (&finding.path, finding.line) {
                (Some(path), Some(line)) => (path.clone(), line),
                _ => return None,
            };
            Some(ReviewComment {
                path,
                line,
                side: Side::Right,
                body: comment_body(finding),
            })
        })
        .collect();

    ReviewSubmission {
        body: build_body(run),
        event: ReviewEvent::Comment,
        comments,
        commit_id: run.metadata.as_ref().map(|m| m.head_sha.clone()),
    }
}

/// Body of a single inline comment.
fn comment_body(finding: &Finding) -> String {
    let mut body = format!(
        "**{}** ({}): {}",
        finding.severity, finding.category, finding.description
    );
    if !finding.fix.is_empty() {
        body.push_str(&format!("\n\n**Suggested fix:** {}", finding.fix));
    }
    if let Some(original) = finding.original_line {
        body.push_str(&format!("\n\n_(originally reported for line {})_", original));
    }
    body
}

/// Overall review body: summary header, per-severity counts, merge stats,
/// and the findings that could not be anchored inline.
fn build_body(run: &ReviewRun) -> String {
    let mut body = String::from("## Automated review\n\n");

    if let Some(metadata) = &run.metadata {
        body.push_str(&format!("**{}** by @{}\n\n", metadata.title, metadata.author));
    }

    body.push_str(&run.summary);
    body.push('\n');

    let count = count_by_severity(&run.merged);
    body.push_str(&format!(
        "\n| Severity | Count |\n|---|---|\n| CRITICAL | {} |\n| HIGH | {} |\n| MEDIUM | {} |\n| LOW | {} |\n",
        count.critical, count.high, count.medium, count.low
    ));

    if let Some(merge) = &run.merge_summary {
        body.push('\n');
        body.push_str(&merge_note(merge));
        body.push('\n');
    }

    if !run.unmappable.is_empty() {
        body.push_str("\n### Findings outside the diff\n\n");
        for finding in &run.unmappable {
            body.push_str(&format!("- {}\n", describe_finding(finding)));
        }
    }

    if !run.unit_failures.is_empty() {
        body.push_str(&format!(
            "\n_Partial analysis: {} analyzer call(s) failed; their findings are missing._\n",
            run.unit_failures.len()
        ));
    }

    body
}

fn merge_note(merge: &MergeSummary) -> String {
    format!(
        "{} finding(s) from {} security / {} quality / {} general; {} duplicate(s) merged.",
        merge.kept_count,
        merge.security_count,
        merge.quality_count,
        merge.general_count,
        merge.removed_count,
    )
}

/// One-line rendering used for non-inline findings.
fn describe_finding(finding: &Finding) -> String {
    let location = match (&finding.path, finding.line) {
        (Some(path), Some(line)) => format!("`{}:{}` ", path, line),
        (Some(path), None) => format!("`{}` ", path),
        _ => String::new(),
    };
    let mut text = format!(
        "{}**{}** ({}): {}",
        location, finding.severity, finding.category, finding.description
    );
    if !finding.fix.is_empty() {
        text.push_str(&format!(" (fix: {})", finding.fix));
    }
    text
}

/// Degraded plain-comment body used when inline publishing fails: the full
/// report with every finding flattened into the text.
pub fn build_fallback_body(run: &ReviewRun) -> String {
    let mut body = build_body(run);

    if !run.inline.is_empty() {
        body.push_str("\n### Findings\n\n");
        for finding in &run.inline {
            body.push_str(&format!("- {}\n", describe_finding(finding)));
        }
    }

    body.push_str("\n_Inline comments could not be placed; findings are listed above._\n");
    body
}
