use serde::{Deserialize, Serialize};

/// Score at or above which the overall tier is CRITICAL.
const CRITICAL_SCORE: u32 = 15;
/// Score at or above which the overall tier is HIGH.
const HIGH_SCORE: u32 = 8;
/// Score at or above which the overall tier is MEDIUM.
const MEDIUM_SCORE: u32 = 4;

/// A risk finding produced by one rule for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Which rule fired.
    pub pattern: RiskPattern,
    /// Human-readable description naming the matched permissions.
    pub description: String,
    pub severity: Severity,
    /// Why this pattern matters to a reviewer.
    pub impact: String,
    pub category: RiskCategory,
    /// Contribution to the user's severity score.
    pub score: u32,
    /// Permission tokens that triggered the rule.
    pub matched_permissions: Vec<String>,
}

impl Finding {
    /// Finding at the rule's default severity and base score.
    pub fn new(metadata: &RuleMetadata, description: String, matched: Vec<String>) -> Self {
        Self {
            pattern: metadata.pattern,
            description,
            severity: metadata.default_severity,
            impact: metadata.impact.clone(),
            category: metadata.category,
            score: metadata.base_score,
            matched_permissions: matched,
        }
    }

    /// Escalate (or otherwise adjust) severity and score.
    pub fn with_severity(mut self, severity: Severity, score: u32) -> Self {
        self.severity = severity;
        self.score = score;
        self
    }
}

/// Severity of a single finding, also used as the overall risk tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    #[serde(alias = "low")]
    Low,
    #[serde(alias = "medium")]
    Medium,
    #[serde(alias = "high")]
    High,
    #[serde(alias = "critical")]
    Critical,
}

impl Severity {
    pub fn from_str_lenient(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" | "med" => Some(Self::Medium),
            "high" => Some(Self::High),
            "critical" | "crit" => Some(Self::Critical),
            _ => None,
        }
    }

    /// Map an accumulated severity score onto the four-level tier.
    pub fn from_score(score: u32) -> Self {
        if score >= CRITICAL_SCORE {
            Self::Critical
        } else if score >= HIGH_SCORE {
            Self::High
        } else if score >= MEDIUM_SCORE {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::High => write!(f, "HIGH"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// The fixed rule catalogue, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskPattern {
    StaleAccess,
    CrossDepartmentAdmin,
    DestructivePermissions,
    SystemLevelAccess,
    JuniorRoleAdminAccess,
    ExternalUserInternalAccess,
}

impl std::fmt::Display for RiskPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StaleAccess => write!(f, "stale_access"),
            Self::CrossDepartmentAdmin => write!(f, "cross_department_admin"),
            Self::DestructivePermissions => write!(f, "destructive_permissions"),
            Self::SystemLevelAccess => write!(f, "system_level_access"),
            Self::JuniorRoleAdminAccess => write!(f, "junior_role_admin_access"),
            Self::ExternalUserInternalAccess => write!(f, "external_user_internal_access"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskCategory {
    AccessGovernance,
    PrivilegeEscalation,
    DataProtection,
    SystemSecurity,
    RoleBasedAccess,
    ThirdPartyRisk,
}

impl std::fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AccessGovernance => write!(f, "Access Governance"),
            Self::PrivilegeEscalation => write!(f, "Privilege Escalation"),
            Self::DataProtection => write!(f, "Data Protection"),
            Self::SystemSecurity => write!(f, "System Security"),
            Self::RoleBasedAccess => write!(f, "Role-Based Access"),
            Self::ThirdPartyRisk => write!(f, "Third-Party Risk"),
        }
    }
}

/// Metadata about a rule, used for `list-rules` output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleMetadata {
    pub pattern: RiskPattern,
    pub name: String,
    pub description: String,
    pub impact: String,
    pub default_severity: Severity,
    pub category: RiskCategory,
    pub base_score: u32,
}
