use serde::{Deserialize, Serialize};

use super::Severity;
use crate::risk::RiskReport;

/// Review verdict: whether a user's overall tier is below the failure
/// threshold. Scores and tiers are never altered by policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewVerdict {
    pub pass: bool,
    pub overall_risk_level: Severity,
    pub fail_threshold: Severity,
}

/// Policy configuration loaded from `.accessaudit.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    /// Minimum overall tier that fails the review.
    #[serde(default = "default_fail_on")]
    pub fail_on: Severity,
}

fn default_fail_on() -> Severity {
    Severity::High
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            fail_on: default_fail_on(),
        }
    }
}

impl Policy {
    /// Evaluate a risk report against this policy.
    pub fn evaluate(&self, report: &RiskReport) -> ReviewVerdict {
        ReviewVerdict {
            pass: report.overall_risk_level < self.fail_on,
            overall_risk_level: report.overall_risk_level,
            fail_threshold: self.fail_on,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report_at(score: u32) -> RiskReport {
        RiskReport {
            username: "test".into(),
            total_permissions: 0,
            risk_factors: vec![],
            severity_score: score,
            overall_risk_level: Severity::from_score(score),
            risk_categories: vec![],
            status: String::new(),
        }
    }

    #[test]
    fn default_policy_fails_on_high() {
        let verdict = Policy::default().evaluate(&report_at(10));
        assert!(!verdict.pass);
        assert_eq!(verdict.overall_risk_level, Severity::High);
    }

    #[test]
    fn default_policy_passes_on_medium() {
        let verdict = Policy::default().evaluate(&report_at(6));
        assert!(verdict.pass);
    }

    #[test]
    fn raised_threshold_passes_high() {
        let policy = Policy {
            fail_on: Severity::Critical,
        };
        assert!(policy.evaluate(&report_at(14)).pass);
        assert!(!policy.evaluate(&report_at(15)).pass);
    }
}
