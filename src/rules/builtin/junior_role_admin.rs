use crate::dataset::UserRecord;
use crate::rules::{Finding, RiskCategory, RiskPattern, RiskRule, RuleMetadata, Severity};

use super::{admin_permissions, role_contains_any};

const JUNIOR_INDICATORS: &[&str] = &["junior", "assistant", "coordinator", "intern", "trainee"];

/// Junior role with admin access
///
/// Flags admin permissions held by junior-sounding roles, regardless of
/// department.
pub struct JuniorRoleAdminRule;

impl RiskRule for JuniorRoleAdminRule {
    fn metadata(&self) -> RuleMetadata {
        RuleMetadata {
            pattern: RiskPattern::JuniorRoleAdminAccess,
            name: "Junior Role Admin Access".into(),
            description: "Junior, assistant, intern or trainee role holding admin permissions"
                .into(),
            impact: "Junior roles typically should not have administrative privileges".into(),
            default_severity: Severity::High,
            category: RiskCategory::RoleBasedAccess,
            base_score: 6,
        }
    }

    fn evaluate(&self, user: &UserRecord) -> Option<Finding> {
        if !role_contains_any(user, JUNIOR_INDICATORS) {
            return None;
        }

        let admin = admin_permissions(user);
        if admin.is_empty() {
            return None;
        }

        Some(Finding::new(
            &self.metadata(),
            format!(
                "Junior role ({}) has admin permissions: {}",
                user.role,
                admin.join(", ")
            ),
            admin,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::test_support::user;

    #[test]
    fn flags_junior_analyst_with_admin_reports() {
        for department in ["Finance", "Engineering", ""] {
            let record = user("j", department, "Junior Analyst", "ledger_read,admin_reports");
            let finding = JuniorRoleAdminRule.evaluate(&record).unwrap();
            assert_eq!(finding.score, 6);
            assert_eq!(
                finding.description,
                "Junior role (Junior Analyst) has admin permissions: admin_reports"
            );
        }
    }

    #[test]
    fn indicator_match_is_case_insensitive() {
        let record = user("j", "IT", "HELP DESK INTERN", "Ticket_Admin");
        assert!(JuniorRoleAdminRule.evaluate(&record).is_some());
    }

    #[test]
    fn junior_without_admin_passes() {
        let record = user("j", "HR", "HR Coordinator", "employee_read");
        assert!(JuniorRoleAdminRule.evaluate(&record).is_none());
    }

    #[test]
    fn senior_with_admin_passes() {
        let record = user("j", "Finance", "Senior Analyst", "admin_reports");
        assert!(JuniorRoleAdminRule.evaluate(&record).is_none());
    }
}
