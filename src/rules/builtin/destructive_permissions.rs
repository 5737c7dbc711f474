use crate::dataset::UserRecord;
use crate::rules::{Finding, RiskCategory, RiskPattern, RiskRule, RuleMetadata, Severity};

use super::tokens_containing;

const DESTRUCTIVE_KEYWORDS: &[&str] = &["delete", "remove", "destroy", "drop", "purge"];

/// Destructive permissions
///
/// Flags any permission able to delete or purge data.
pub struct DestructivePermissionsRule;

impl RiskRule for DestructivePermissionsRule {
    fn metadata(&self) -> RuleMetadata {
        RuleMetadata {
            pattern: RiskPattern::DestructivePermissions,
            name: "Destructive Permissions".into(),
            description: "Permission that can delete, drop or purge data".into(),
            impact: "Destructive permissions can cause irreversible damage".into(),
            default_severity: Severity::High,
            category: RiskCategory::DataProtection,
            base_score: 6,
        }
    }

    fn evaluate(&self, user: &UserRecord) -> Option<Finding> {
        let matched = tokens_containing(user, DESTRUCTIVE_KEYWORDS);
        if matched.is_empty() {
            return None;
        }

        Some(Finding::new(
            &self.metadata(),
            format!("Has destructive capabilities: {}", matched.join(", ")),
            matched,
        ))
    }
}
