use crate::dataset::UserRecord;
use crate::rules::{Finding, RiskCategory, RiskPattern, RiskRule, RuleMetadata, Severity};

use super::tokens_containing;

const SYSTEM_KEYWORDS: &[&str] = &["root", "system", "admin_all", "superuser", "emergency"];

/// Keywords that escalate a system-level finding to CRITICAL.
const ESCALATING_KEYWORDS: &[&str] = &["root", "admin_all"];

/// Score when any matched token is root or admin_all.
const ESCALATED_SCORE: u32 = 8;

/// System-level access
///
/// Flags infrastructure-wide permissions. Root and admin_all tokens raise
/// the finding from HIGH (+5) to CRITICAL (+8).
pub struct SystemLevelAccessRule;

impl RiskRule for SystemLevelAccessRule {
    fn metadata(&self) -> RuleMetadata {
        RuleMetadata {
            pattern: RiskPattern::SystemLevelAccess,
            name: "System-Level Access".into(),
            description: "Root, superuser, system or emergency permission".into(),
            impact: "System-level access provides extensive control over infrastructure".into(),
            default_severity: Severity::High,
            category: RiskCategory::SystemSecurity,
            base_score: 5,
        }
    }

    fn evaluate(&self, user: &UserRecord) -> Option<Finding> {
        let matched = tokens_containing(user, SYSTEM_KEYWORDS);
        if matched.is_empty() {
            return None;
        }

        let escalated = matched.iter().any(|perm| {
            let lower = perm.to_lowercase();
            ESCALATING_KEYWORDS.iter().any(|k| lower.contains(k))
        });

        let finding = Finding::new(
            &self.metadata(),
            format!("Has system-level permissions: {}", matched.join(", ")),
            matched,
        );

        if escalated {
            Some(finding.with_severity(Severity::Critical, ESCALATED_SCORE))
        } else {
            Some(finding)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::test_support::user;

    #[test]
    fn root_escalates_to_critical() {
        let record = user("r", "IT", "SRE", "system_root_access");
        let finding = SystemLevelAccessRule.evaluate(&record).unwrap();
        assert_eq!(finding.severity, Severity::Critical);
        assert_eq!(finding.score, 8);
    }

    #[test]
    fn admin_all_escalates_to_critical() {
        let record = user("r", "IT", "SRE", "ADMIN_ALL");
        let finding = SystemLevelAccessRule.evaluate(&record).unwrap();
        assert_eq!(finding.severity, Severity::Critical);
    }

    #[test]
    fn superuser_alone_is_high() {
        let record = user("r", "IT", "SRE", "emergency_access,superuser_console,read_logs");
        let finding = SystemLevelAccessRule.evaluate(&record).unwrap();
        assert_eq!(finding.severity, Severity::High);
        assert_eq!(finding.score, 5);
        assert_eq!(
            finding.matched_permissions,
            vec!["emergency_access", "superuser_console"]
        );
    }

    #[test]
    fn passes_ordinary_permissions() {
        let record = user("r", "IT", "SRE", "read_logs,deploy_staging");
        assert!(SystemLevelAccessRule.evaluate(&record).is_none());
    }
}
