//! Snapping findings onto commentable diff lines.
//!
//! Analyzers report against the new file without knowing which lines the
//! review API accepts. Each finding is checked against its file's line map
//! and nudged to the nearest commentable line when it misses. Findings
//! that cannot be anchored anywhere are never dropped; they are split off
//! so the report can render them as non-inline remarks.

use std::collections::HashMap;

use gh_review_analyzer::Finding;
use gh_review_diff::LineMap;

/// Result of the remapping pass. `inline` findings carry a line the review
/// API will accept; `unmappable` findings go into the report body instead.
#[derive(Debug, Default, Clone)]
pub struct RemappedFindings {
    pub inline: Vec<Finding>,
    pub unmappable: Vec<Finding>,
}

/// Partition findings by whether their location can host an inline comment.
///
/// A finding lands in `unmappable` when it has no line, its file is not in
/// the diff, or no commentable line exists within `max_distance`. Adjusted
/// findings remember the originally reported line.
pub fn remap_findings(
    findings: Vec<Finding>,
    maps: &HashMap<String, LineMap>,
    max_distance: u32,
) -> RemappedFindings {
    let mut result = RemappedFindings::default();

    for mut finding in findings {
        let line = match finding.line {
            Some(line) => line,
            None => {
                result.unmappable.push(finding);
                continue;
            }
        };

        let map = match finding.path.as_ref().and_then(|p| maps.get(p)) {
            Some(map) => map,
            None => {
                result.unmappable.push(finding);
                continue;
            }
        };

        match map.nearest_commentable(line, max_distance) {
            Some(valid_line) => {
                if valid_line != line {
                    log::debug!(
                        "Adjusted finding line {} -> {} in {}",
                        line,
                        valid_line,
                        finding.path.as_deref().unwrap_or("?")
                    );
                    finding.original_line = Some(line);
                    finding.line = Some(valid_line);
                }
                result.inline.push(finding);
            }
            None => result.unmappable.push(finding),
        }
    }

    result
}
