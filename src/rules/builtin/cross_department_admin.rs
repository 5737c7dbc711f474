use crate::dataset::UserRecord;
use crate::rules::{Finding, RiskCategory, RiskPattern, RiskRule, RuleMetadata, Severity};

use super::ADMIN_MARKER;

/// Department names recognised inside permission tokens.
const DEPARTMENT_KEYWORDS: &[&str] = &["engineering", "finance", "hr", "sales", "marketing", "it"];

/// Cross-department admin
///
/// Flags admin permissions that name a department other than the user's
/// own. The user's department is compared as a whole lowercase string, so
/// "Finance" suppresses the `finance` keyword but "IT Operations" does not
/// suppress `it`.
pub struct CrossDepartmentAdminRule;

impl RiskRule for CrossDepartmentAdminRule {
    fn metadata(&self) -> RuleMetadata {
        RuleMetadata {
            pattern: RiskPattern::CrossDepartmentAdmin,
            name: "Cross-Department Admin".into(),
            description: "Admin permission scoped to a department other than the user's".into(),
            impact: "Cross-department admin access violates principle of least privilege".into(),
            default_severity: Severity::High,
            category: RiskCategory::PrivilegeEscalation,
            base_score: 7,
        }
    }

    fn evaluate(&self, user: &UserRecord) -> Option<Finding> {
        let own_department = user.department.trim().to_lowercase();

        let matched: Vec<String> = user
            .permissions
            .iter()
            .filter(|perm| {
                let lower = perm.to_lowercase();
                lower.contains(ADMIN_MARKER)
                    && DEPARTMENT_KEYWORDS
                        .iter()
                        .any(|dept| *dept != own_department && lower.contains(dept))
            })
            .cloned()
            .collect();

        if matched.is_empty() {
            return None;
        }

        Some(Finding::new(
            &self.metadata(),
            format!(
                "Has admin access to other departments: {}",
                matched.join(", ")
            ),
            matched,
        ))
    }
}
