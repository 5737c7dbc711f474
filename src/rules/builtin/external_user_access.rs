use crate::dataset::UserRecord;
use crate::rules::{Finding, RiskCategory, RiskPattern, RiskRule, RuleMetadata, Severity};

use super::{admin_permissions, role_contains_any};

const EXTERNAL_INDICATORS: &[&str] = &["contractor", "consultant"];

/// External user with internal access
///
/// Flags contractors and consultants holding admin permissions.
pub struct ExternalUserAccessRule;

impl RiskRule for ExternalUserAccessRule {
    fn metadata(&self) -> RuleMetadata {
        RuleMetadata {
            pattern: RiskPattern::ExternalUserInternalAccess,
            name: "External User Internal Access".into(),
            description: "Contractor or consultant holding admin permissions".into(),
            impact: "External users should have limited, time-bound access".into(),
            default_severity: Severity::High,
            category: RiskCategory::ThirdPartyRisk,
            base_score: 7,
        }
    }

    fn evaluate(&self, user: &UserRecord) -> Option<Finding> {
        if !role_contains_any(user, EXTERNAL_INDICATORS) {
            return None;
        }

        let admin = admin_permissions(user);
        if admin.is_empty() {
            return None;
        }

        Some(Finding::new(
            &self.metadata(),
            format!(
                "External user ({}) has internal admin access: {}",
                user.role,
                admin.join(", ")
            ),
            admin,
        ))
    }
}
