//! Risk pattern scoring for a single user.

use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::error::{Result, ToolOutput};
use crate::rules::{Finding, RiskCategory, RuleEngine, Severity};

/// Risk analysis of one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskReport {
    pub username: String,
    pub total_permissions: usize,
    /// Fired findings in catalogue order.
    pub risk_factors: Vec<Finding>,
    /// Sum of the fired findings' scores.
    pub severity_score: u32,
    pub overall_risk_level: Severity,
    /// Distinct categories in first-fired order.
    pub risk_categories: Vec<RiskCategory>,
    pub status: String,
}

impl RiskReport {
    fn from_findings(username: String, total_permissions: usize, findings: Vec<Finding>) -> Self {
        let severity_score = findings.iter().map(|f| f.score).sum();
        let overall_risk_level = Severity::from_score(severity_score);

        let mut risk_categories = Vec::new();
        for finding in &findings {
            if !risk_categories.contains(&finding.category) {
                risk_categories.push(finding.category);
            }
        }

        let status = format!(
            "Analyzed {} - {} risk ({} patterns)",
            username,
            overall_risk_level,
            findings.len()
        );

        Self {
            username,
            total_permissions,
            risk_factors: findings,
            severity_score,
            overall_risk_level,
            risk_categories,
            status,
        }
    }
}

/// Analyze a user with the built-in rule catalogue.
pub fn analyze(username: &str, dataset: &Dataset) -> ToolOutput<RiskReport> {
    analyze_with(&RuleEngine::new(), username, dataset)
}

/// Analyze a user with an existing engine.
pub fn analyze_with(engine: &RuleEngine, username: &str, dataset: &Dataset) -> ToolOutput<RiskReport> {
    ToolOutput::from_result(
        try_analyze(engine, username, dataset),
        "Risk pattern analysis failed",
    )
}

fn try_analyze(engine: &RuleEngine, username: &str, dataset: &Dataset) -> Result<RiskReport> {
    let user = dataset.resolve(username)?;
    let findings = engine.run(user);

    let report = RiskReport::from_findings(user.username.clone(), user.permission_count(), findings);
    tracing::debug!(
        username = %report.username,
        score = report.severity_score,
        tier = %report.overall_risk_level,
        "risk analysis complete"
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::test_support::{user, with_status};
    use crate::error::ErrorKind;
    use crate::rules::RiskPattern;
    use pretty_assertions::assert_eq;

    fn report(records: Vec<crate::dataset::UserRecord>, username: &str) -> RiskReport {
        match analyze(username, &Dataset::new(records)) {
            ToolOutput::Ok(report) => report,
            ToolOutput::Err(e) => panic!("analysis failed: {e:?}"),
        }
    }

    #[test]
    fn terminated_user_fires_stale_access() {
        let r = report(
            vec![with_status(
                user("dana", "HR", "Recruiter", "employee_read,employee_write,offer_send"),
                "Terminated",
            )],
            "dana",
        );
        assert_eq!(r.risk_factors[0].pattern, RiskPattern::StaleAccess);
        assert_eq!(r.risk_factors[0].severity, Severity::Critical);
        assert!(r.severity_score >= 10);
        assert!(r.overall_risk_level >= Severity::High);
    }

    #[test]
    fn destructive_plus_root_scores_fourteen() {
        let r = report(
            vec![user("ops", "IT", "Operator", "delete_records,system_root_access")],
            "ops",
        );
        let patterns: Vec<RiskPattern> = r.risk_factors.iter().map(|f| f.pattern).collect();
        assert_eq!(
            patterns,
            vec![RiskPattern::DestructivePermissions, RiskPattern::SystemLevelAccess]
        );
        assert_eq!(r.risk_factors[1].severity, Severity::Critical);
        assert_eq!(r.severity_score, 14);
        assert_eq!(r.overall_risk_level, Severity::High);
        assert_eq!(
            r.risk_categories,
            vec![RiskCategory::DataProtection, RiskCategory::SystemSecurity]
        );
    }

    #[test]
    fn active_user_without_permissions_is_low() {
        let r = report(vec![user("new", "Sales", "Associate", "")], "new");
        assert!(r.risk_factors.is_empty());
        assert_eq!(r.severity_score, 0);
        assert_eq!(r.overall_risk_level, Severity::Low);
        assert!(r.risk_categories.is_empty());
        assert_eq!(r.status, "Analyzed new - LOW risk (0 patterns)");
    }

    #[test]
    fn junior_analyst_admin_reports() {
        let r = report(
            vec![user("jr", "Finance", "Junior Analyst", "admin_reports")],
            "JR",
        );
        assert_eq!(r.username, "jr");
        assert_eq!(r.risk_factors.len(), 1);
        assert_eq!(r.risk_factors[0].pattern, RiskPattern::JuniorRoleAdminAccess);
        assert_eq!(r.overall_risk_level, Severity::Medium);
    }

    #[test]
    fn categories_are_deduplicated() {
        let r = report(
            vec![with_status(
                user("c", "Sales", "Junior Contractor", "admin_finance_root,purge_logs"),
                "inactive",
            )],
            "c",
        );
        assert_eq!(r.severity_score, 44);
        assert_eq!(r.overall_risk_level, Severity::Critical);
        assert_eq!(r.risk_categories.len(), 6);
    }

    #[test]
    fn unknown_user_is_not_found() {
        let out = analyze("ghost", &Dataset::new(vec![user("dana", "HR", "Recruiter", "")]));
        let err = out.err().unwrap();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(err.error, "User ghost not found");
    }
}
