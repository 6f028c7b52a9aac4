//! Similarity-based deduplication of findings across review roles.
//!
//! Independent analyzers frequently report the same problem in different
//! words. Findings are grouped by exact `(path, line)` location and, within
//! a group, compared by word overlap over normalized descriptions; a
//! duplicate keeps the earlier finding and raises its severity when the
//! incoming one outranks it. The whole pass is deterministic for a fixed
//! input order: buckets are processed in first-appearance order and the
//! final severity sort is stable.

use std::collections::{HashMap, HashSet};

use gh_review_analyzer::{Finding, ReviewRole};

/// Findings collected per review role, in fixed merge order.
#[derive(Debug, Default, Clone)]
pub struct RoleBuckets {
    pub security: Vec<Finding>,
    pub quality: Vec<Finding>,
    pub general: Vec<Finding>,
}

impl RoleBuckets {
    pub fn get_mut(&mut self, role: ReviewRole) -> &mut Vec<Finding> {
        match role {
            ReviewRole::Security => &mut self.security,
            ReviewRole::Quality => &mut self.quality,
            ReviewRole::General => &mut self.general,
        }
    }

    pub fn get(&self, role: ReviewRole) -> &[Finding] {
        match role {
            ReviewRole::Security => &self.security,
            ReviewRole::Quality => &self.quality,
            ReviewRole::General => &self.general,
        }
    }

    /// All findings in merge order: security, then quality, then general.
    pub fn concatenated(&self) -> Vec<Finding> {
        let mut all =
            Vec::with_capacity(self.security.len() + self.quality.len() + self.general.len());
        all.extend(self.security.iter().cloned());
        all.extend(self.quality.iter().cloned());
        all.extend(self.general.iter().cloned());
        all
    }

    pub fn total(&self) -> usize {
        self.security.len() + self.quality.len() + self.general.len()
    }
}

/// Counts feeding the human summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    pub input_count: usize,
    pub kept_count: usize,
    pub removed_count: usize,
    pub security_count: usize,
    pub quality_count: usize,
    pub general_count: usize,
}

/// Merge and rank the three role buckets into one deduplicated list.
///
/// Deterministic given the same input: identical runs produce identical
/// output, independent of any hash ordering.
pub fn merge_findings(buckets: &RoleBuckets, similarity_threshold: f64) -> (Vec<Finding>, MergeSummary) {
    let all = buckets.concatenated();
    let input_count = all.len();

    // Group by exact (path, line); first-appearance order, not hash order.
    type LocationKey = (Option<String>, Option<u32>);
    let mut order: Vec<LocationKey> = Vec::new();
    let mut groups: HashMap<LocationKey, Vec<Finding>> = HashMap::new();

    for finding in all {
        let key = (finding.path.clone(), finding.line);
        if !groups.contains_key(&key) {
            order.push(key.clone());
        }
        groups.entry(key).or_default().push(finding);
    }

    let mut merged: Vec<Finding> = Vec::new();
    let mut removed_count = 0usize;

    for key in &order {
        let group = groups.remove(key).unwrap_or_default();
        let mut kept: Vec<Finding> = Vec::new();

        for incoming in group {
            match kept
                .iter_mut()
                .find(|k| is_duplicate(&k.description, &incoming.description, similarity_threshold))
            {
                Some(existing) => {
                    // Same issue said twice; keep the more severe rating.
                    existing.severity = existing.severity.min(incoming.severity);
                    removed_count += 1;
                }
                None => kept.push(incoming),
            }
        }

        merged.extend(kept);
    }

    // Stable: ties keep bucket processing order.
    merged.sort_by_key(|f| f.severity.rank());

    let summary = MergeSummary {
        input_count,
        kept_count: merged.len(),
        removed_count,
        security_count: buckets.security.len(),
        quality_count: buckets.quality.len(),
        general_count: buckets.general.len(),
    };

    (merged, summary)
}

/// Word-overlap similarity test between two descriptions.
///
/// Descriptions that tokenize to nothing (all punctuation, all short
/// words) cannot be compared by overlap; those fall back to an exact
/// 50-character prefix comparison.
fn is_duplicate(a: &str, b: &str, threshold: f64) -> bool {
    let tokens_a = tokenize(a);
    let tokens_b = tokenize(b);

    if tokens_a.is_empty() || tokens_b.is_empty() {
        return prefix50(a) == prefix50(b);
    }

    let intersection = tokens_a.intersection(&tokens_b).count() as f64;
    let smaller = tokens_a.len().min(tokens_b.len()) as f64;

    intersection / smaller >= threshold
}

/// Lower-case, strip punctuation, split on whitespace, keep words of
/// length >= 3.
fn tokenize(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .filter(|w| w.len() >= 3)
        .map(|w| w.to_string())
        .collect()
}

fn prefix50(text: &str) -> String {
    text.chars().take(50).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use gh_review_analyzer::{Category, Severity};
    use pretty_assertions::assert_eq;

    fn finding(
        severity: Severity,
        desc: &str,
        path: Option<&str>,
        line: Option<u32>,
    ) -> Finding {
        let mut f = Finding::new(severity, Category::Bug, desc);
        f.path = path.map(|p| p.to_string());
        f.line = line;
        f
    }

    const THRESHOLD: f64 = 0.6;

    #[test]
    fn test_cross_role_duplicate_keeps_higher_severity() {
        let buckets = RoleBuckets {
            security: vec![finding(
                Severity::Low,
                "missing docstring",
                Some("a.py"),
                Some(5),
            )],
            quality: vec![],
            general: vec![finding(
                Severity::High,
                "function missing docstring for public API",
                Some("a.py"),
                Some(5),
            )],
        };

        let (merged, summary) = merge_findings(&buckets, THRESHOLD);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].severity, Severity::High);
        assert_eq!(merged[0].path.as_deref(), Some("a.py"));
        assert_eq!(merged[0].line, Some(5));
        assert_eq!(summary.removed_count, 1);
        assert_eq!(summary.input_count, 2);
        assert_eq!(summary.kept_count, 1);
    }

    #[test]
    fn test_different_locations_never_compared() {
        let buckets = RoleBuckets {
            security: vec![
                finding(Severity::Medium, "unvalidated input used", Some("a.py"), Some(5)),
                finding(Severity::Medium, "unvalidated input used", Some("a.py"), Some(9)),
                finding(Severity::Medium, "unvalidated input used", Some("b.py"), Some(5)),
            ],
            quality: vec![],
            general: vec![],
        };

        let (merged, summary) = merge_findings(&buckets, THRESHOLD);
        assert_eq!(merged.len(), 3);
        assert_eq!(summary.removed_count, 0);
    }

    #[test]
    fn test_lineless_findings_share_a_bucket() {
        let buckets = RoleBuckets {
            security: vec![finding(Severity::High, "secrets committed to the repo", None, None)],
            quality: vec![],
            general: vec![finding(Severity::Low, "secrets committed into repo", None, None)],
        };

        let (merged, _) = merge_findings(&buckets, THRESHOLD);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].severity, Severity::High);
    }

    #[test]
    fn test_dissimilar_descriptions_both_kept() {
        let buckets = RoleBuckets {
            security: vec![finding(Severity::High, "SQL injection via string concat", Some("a.py"), Some(5))],
            quality: vec![finding(Severity::Low, "variable name is unclear here", Some("a.py"), Some(5))],
            general: vec![],
        };

        let (merged, summary) = merge_findings(&buckets, THRESHOLD);
        assert_eq!(merged.len(), 2);
        assert_eq!(summary.removed_count, 0);
    }

    #[test]
    fn test_ordering_severity_first_stable_within() {
        let buckets = RoleBuckets {
            security: vec![
                finding(Severity::Low, "low one", Some("a.py"), Some(1)),
                finding(Severity::Critical, "critical one", Some("a.py"), Some(2)),
            ],
            quality: vec![finding(Severity::High, "high one", Some("a.py"), Some(3))],
            general: vec![finding(Severity::Low, "low two", Some("b.py"), Some(1))],
        };

        let (merged, _) = merge_findings(&buckets, THRESHOLD);
        let descs: Vec<&str> = merged.iter().map(|f| f.description.as_str()).collect();
        assert_eq!(descs, vec!["critical one", "high one", "low one", "low two"]);

        // Ordering invariant: severity never decreases in rank order.
        for pair in merged.windows(2) {
            assert!(pair[0].severity.rank() <= pair[1].severity.rank());
        }
    }

    #[test]
    fn test_idempotence() {
        let buckets = RoleBuckets {
            security: vec![
                finding(Severity::High, "missing docstring", Some("a.py"), Some(5)),
                finding(Severity::Low, "function missing a docstring", Some("a.py"), Some(5)),
            ],
            quality: vec![finding(Severity::Medium, "magic number used", Some("a.py"), Some(9))],
            general: vec![],
        };

        let (merged, _) = merge_findings(&buckets, THRESHOLD);

        // Feed the merged output back in as a single bucket: nothing
        // further should collapse.
        let again = RoleBuckets {
            security: vec![],
            quality: vec![],
            general: merged.clone(),
        };
        let (remerged, summary) = merge_findings(&again, THRESHOLD);
        assert_eq!(remerged, merged);
        assert_eq!(summary.removed_count, 0);
    }

    #[test]
    fn test_degenerate_descriptions_use_prefix_comparison() {
        // Tokenization drops everything here (short words / punctuation).
        let buckets = RoleBuckets {
            security: vec![
                finding(Severity::Medium, "!!", Some("a.py"), Some(1)),
                finding(Severity::High, "!!", Some("a.py"), Some(1)),
                finding(Severity::Low, "??", Some("a.py"), Some(1)),
            ],
            quality: vec![],
            general: vec![],
        };

        let (merged, summary) = merge_findings(&buckets, THRESHOLD);
        assert_eq!(merged.len(), 2);
        assert_eq!(summary.removed_count, 1);
        // The duplicate "!!" raised the kept finding to HIGH.
        assert_eq!(merged[0].severity, Severity::High);
        assert_eq!(merged[0].description, "!!");
    }

    #[test]
    fn test_empty_input() {
        let (merged, summary) = merge_findings(&RoleBuckets::default(), THRESHOLD);
        assert!(merged.is_empty());
        assert_eq!(summary, MergeSummary::default());
    }

    #[test]
    fn test_tokenize_normalizes() {
        let tokens = tokenize("SQL-Injection, via string CONCAT!");
        assert!(tokens.contains("sql"));
        assert!(tokens.contains("injection"));
        assert!(tokens.contains("via"));
        assert!(tokens.contains("string"));
        assert!(tokens.contains("concat"));
        // Words shorter than 3 are dropped entirely
        assert!(tokenize("a an is of to").is_empty());
    }

    #[test]
    fn test_overlap_uses_smaller_set() {
        // A is a strict subset of B: ratio against min(|A|,|B|) is 1.0.
        assert!(is_duplicate(
            "null pointer dereference",
            "possible null pointer dereference when parsing header",
            0.6
        ));
    }
}
