mod cross_department_admin;
mod destructive_permissions;
mod external_user_access;
mod junior_role_admin;
mod stale_access;
mod system_level_access;

use crate::dataset::UserRecord;

use super::RiskRule;

/// Substring marking an administrative permission.
const ADMIN_MARKER: &str = "admin";

/// Returns the built-in catalogue in evaluation order.
pub fn all_rules() -> Vec<Box<dyn RiskRule>> {
    vec![
        Box::new(stale_access::StaleAccessRule),
        Box::new(cross_department_admin::CrossDepartmentAdminRule),
        Box::new(destructive_permissions::DestructivePermissionsRule),
        Box::new(system_level_access::SystemLevelAccessRule),
        Box::new(junior_role_admin::JuniorRoleAdminRule),
        Box::new(external_user_access::ExternalUserAccessRule),
    ]
}

/// Permission tokens containing any of `keywords`, case-insensitively.
/// Each token appears at most once, in source order.
fn tokens_containing(user: &UserRecord, keywords: &[&str]) -> Vec<String> {
    user.permissions
        .iter()
        .filter(|perm| {
            let lower = perm.to_lowercase();
            keywords.iter().any(|k| lower.contains(k))
        })
        .cloned()
        .collect()
}

fn admin_permissions(user: &UserRecord) -> Vec<String> {
    tokens_containing(user, &[ADMIN_MARKER])
}

fn role_contains_any(user: &UserRecord, indicators: &[&str]) -> bool {
    let role = user.role.to_lowercase();
    indicators.iter().any(|i| role.contains(i))
}
