//! Exact-match user lookup.

use serde::{Deserialize, Serialize};

use crate::dataset::{Dataset, UserRecord};
use crate::error::{AuditError, ErrorKind};

/// Normalized profile of a matched user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Always `true`.
    pub found: bool,
    pub username: String,
    pub department: String,
    pub role: String,
    pub permissions: Vec<String>,
    pub permission_count: usize,
    pub employment_status: String,
    pub hire_date: String,
    pub risk_reasoning: Option<String>,
    pub has_risk_flags: bool,
    pub risky_permissions: Vec<String>,
    pub status: String,
}

impl From<&UserRecord> for UserProfile {
    fn from(record: &UserRecord) -> Self {
        let level = if record.has_risk_flags() {
            "HIGH RISK"
        } else {
            "Standard"
        };
        Self {
            found: true,
            username: record.username.clone(),
            department: record.department.clone(),
            role: record.role.clone(),
            permissions: record.permissions.clone(),
            permission_count: record.permission_count(),
            employment_status: record.employment_status.clone(),
            hire_date: record.hire_date.clone(),
            risk_reasoning: record.risk_reasoning.clone(),
            has_risk_flags: record.has_risk_flags(),
            risky_permissions: record.risky_permissions(),
            status: format!("Found {} - {}", record.username, level),
        }
    }
}

/// A lookup that did not produce a user. Not a failure: the caller's flow
/// continues with this as data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupMiss {
    /// Always `false`.
    pub found: bool,
    pub kind: ErrorKind,
    pub message: String,
    /// The searched name, trimmed.
    pub username: String,
    /// Up to five usernames from the start of the dataset.
    pub available_users: Vec<String>,
    pub total_records: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub did_you_mean: Option<String>,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LookupResult {
    Found(UserProfile),
    Missing(LookupMiss),
}

impl LookupResult {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        match self {
            Self::Found(profile) => Some(profile),
            Self::Missing(_) => None,
        }
    }

    /// Lookup result for input that never reached the dataset, e.g. an
    /// unsupported dataset shape at the host boundary.
    pub fn rejected(username: &str, err: AuditError) -> Self {
        Self::Missing(miss(username, &Dataset::default(), err))
    }
}

/// Look up a user by case-insensitive username; the first match wins.
pub fn lookup(username: &str, dataset: &Dataset) -> LookupResult {
    match dataset.resolve(username) {
        Ok(record) => {
            tracing::debug!(username = %record.username, "user found");
            LookupResult::Found(UserProfile::from(record))
        }
        Err(err) => {
            tracing::debug!(username = %username.trim(), error = %err, "lookup missed");
            LookupResult::Missing(miss(username, dataset, err))
        }
    }
}

fn miss(username: &str, dataset: &Dataset, err: AuditError) -> LookupMiss {
    let username = username.trim().to_string();
    let (kind, message, did_you_mean, status) = match err {
        AuditError::NotFound { suggestion, .. } => (
            ErrorKind::NotFound,
            format!("User '{}' not found in IAM system", username),
            suggestion,
            format!("User {} not found", username),
        ),
        AuditError::InvalidInput(message) => {
            let status = format!("Error: {}", message);
            (ErrorKind::InvalidInput, message, None, status)
        }
        other => {
            let message = format!("Lookup failed: {}", other);
            let status = format!("Error: {}", other);
            (ErrorKind::Internal, message, None, status)
        }
    };

    LookupMiss {
        found: false,
        kind,
        message,
        username,
        available_users: dataset.preview_usernames(),
        total_records: dataset.len(),
        did_you_mean,
        status,
    }
}
