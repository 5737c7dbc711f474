use crate::dataset::UserRecord;
use crate::rules::{Finding, RiskCategory, RiskPattern, RiskRule, RuleMetadata, Severity};

/// Stale access
///
/// Flags accounts whose employment status is terminated or inactive but
/// which still hold at least one permission. Accounts already stripped of
/// access are not flagged.
pub struct StaleAccessRule;

impl RiskRule for StaleAccessRule {
    fn metadata(&self) -> RuleMetadata {
        RuleMetadata {
            pattern: RiskPattern::StaleAccess,
            name: "Stale Access".into(),
            description: "Terminated or inactive user still holds permissions".into(),
            impact: "Terminated employees should have zero access".into(),
            default_severity: Severity::Critical,
            category: RiskCategory::AccessGovernance,
            base_score: 10,
        }
    }

    fn evaluate(&self, user: &UserRecord) -> Option<Finding> {
        if !user.is_inactive() || user.permissions.is_empty() {
            return None;
        }

        Some(Finding::new(
            &self.metadata(),
            format!(
                "User is {} but still has {} active permissions",
                user.employment_status,
                user.permission_count()
            ),
            user.permissions.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::test_support::{user, with_status};

    #[test]
    fn flags_terminated_user_with_permissions() {
        let record = with_status(
            user("d", "HR", "Recruiter", "employee_read,employee_write,offer_send"),
            "Terminated",
        );
        let finding = StaleAccessRule.evaluate(&record).unwrap();
        assert_eq!(finding.severity, Severity::Critical);
        assert_eq!(finding.score, 10);
        assert_eq!(
            finding.description,
            "User is Terminated but still has 3 active permissions"
        );
    }

    #[test]
    fn inactive_counts_as_stale() {
        let record = with_status(user("d", "HR", "Recruiter", "employee_read"), "INACTIVE");
        assert!(StaleAccessRule.evaluate(&record).is_some());
    }

    #[test]
    fn passes_stripped_account() {
        let record = with_status(user("d", "HR", "Recruiter", ""), "Terminated");
        assert!(StaleAccessRule.evaluate(&record).is_none());
    }

    #[test]
    fn passes_active_user() {
        let record = user("d", "HR", "Recruiter", "employee_read");
        assert!(StaleAccessRule.evaluate(&record).is_none());
    }
}
