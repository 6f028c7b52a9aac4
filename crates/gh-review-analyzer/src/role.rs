//! Review roles.
//!
//! Three independent perspectives are applied to the same code. The fixed
//! ordering here is load-bearing: the merge step concatenates role buckets
//! in this order, which keeps the whole pipeline deterministic.

use std::fmt;

/// One of the independent analysis perspectives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReviewRole {
    Security,
    Quality,
    General,
}

impl ReviewRole {
    /// All roles, in merge-concatenation order.
    pub const ALL: [ReviewRole; 3] = [ReviewRole::Security, ReviewRole::Quality, ReviewRole::General];

    pub fn name(&self) -> &'static str {
        match self {
            ReviewRole::Security => "security",
            ReviewRole::Quality => "quality",
            ReviewRole::General => "general",
        }
    }

    /// Bucket index used by the workflow's per-role result slots.
    pub fn index(&self) -> usize {
        match self {
            ReviewRole::Security => 0,
            ReviewRole::Quality => 1,
            ReviewRole::General => 2,
        }
    }
}

impl fmt::Display for ReviewRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_order_is_security_quality_general() {
        let names: Vec<&str> = ReviewRole::ALL.iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["security", "quality", "general"]);
    }

    #[test]
    fn test_indices_match_order() {
        for (i, role) in ReviewRole::ALL.iter().enumerate() {
            assert_eq!(role.index(), i);
        }
    }
}
