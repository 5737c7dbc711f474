//! Normalized user-access inventory.
//!
//! Every operation reads a `Dataset`. Raw host input (JSON records, JSON
//! column/row tables, CSV rows) is normalized once, here, so permission
//! splitting and risk-token handling are identical for lookup, peer
//! comparison and risk scoring.

pub mod loader;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::error::{AuditError, Result};

/// Employment states meaning the account should no longer hold access.
const INACTIVE_STATUSES: &[&str] = &["terminated", "inactive"];

/// Placeholder tabular exports write into empty cells.
const MISSING_MARKER: &str = "nan";

/// Separator between entries of the free-text `risk_reasoning` field.
const REASONING_SEPARATOR: &str = ", ";

/// Number of usernames shown in not-found diagnostics.
pub const PREVIEW_LIMIT: usize = 5;

/// Maximum edit distance for a "did you mean" suggestion.
const SUGGESTION_DISTANCE: usize = 2;

/// One row of the access inventory, normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    pub department: String,
    pub role: String,
    /// Trimmed, non-empty permission tokens in source order.
    pub permissions: Vec<String>,
    pub employment_status: String,
    /// Passed through unchanged.
    pub hire_date: String,
    /// `None` when the source cell was absent, blank or `nan`.
    pub risk_reasoning: Option<String>,
}

impl UserRecord {
    /// Build a record from a key-value row. Missing keys read as empty.
    pub fn from_map(row: &Map<String, Value>) -> Self {
        let text = |key: &str| row.get(key).map(cell_text).unwrap_or_default();

        Self {
            username: text("username").trim().to_string(),
            department: text("department"),
            role: text("role"),
            permissions: split_permissions(&text("permissions")),
            employment_status: text("employment_status"),
            hire_date: text("hire_date"),
            risk_reasoning: normalize_reasoning(&text("risk_reasoning")),
        }
    }

    pub fn permission_count(&self) -> usize {
        self.permissions.len()
    }

    /// Terminated or inactive, compared case-insensitively.
    pub fn is_inactive(&self) -> bool {
        let status = self.employment_status.trim().to_lowercase();
        INACTIVE_STATUSES.contains(&status.as_str())
    }

    pub fn has_risk_flags(&self) -> bool {
        self.risk_reasoning.is_some()
    }

    /// Individual entries of `risk_reasoning`; empty when there are no flags.
    pub fn risky_permissions(&self) -> Vec<String> {
        self.risk_reasoning
            .as_deref()
            .map(split_risk_reasoning)
            .unwrap_or_default()
    }

    /// Case-insensitive username equality.
    pub fn is_user(&self, username: &str) -> bool {
        self.username.to_lowercase() == username.trim().to_lowercase()
    }
}

/// Split a raw comma-separated permission field.
///
/// Tokens are trimmed and empty tokens dropped, so `""` yields no
/// permissions rather than one empty permission.
pub fn split_permissions(raw: &str) -> Vec<String> {
    split_tokens(raw, ",")
}

/// Split a risk-reasoning string on `", "` with the same trimming rules as
/// [`split_permissions`].
pub fn split_risk_reasoning(raw: &str) -> Vec<String> {
    split_tokens(raw, REASONING_SEPARATOR)
}

/// Blank and `nan` reasoning both mean "no flags".
pub fn normalize_reasoning(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(MISSING_MARKER) {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn split_tokens(raw: &str, separator: &str) -> Vec<String> {
    raw.split(separator)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(String::from)
        .collect()
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Trim a requested username, rejecting blanks.
pub fn validate_username(username: &str) -> Result<&str> {
    let trimmed = username.trim();
    if trimmed.is_empty() {
        return Err(AuditError::InvalidInput(
            "Please provide a username to lookup".into(),
        ));
    }
    Ok(trimmed)
}

/// Immutable snapshot of the inventory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    records: Vec<UserRecord>,
}

impl Dataset {
    pub fn new(records: Vec<UserRecord>) -> Self {
        Self { records }
    }

    /// Normalize key-value rows (CSV loader, host records).
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = Map<String, Value>>,
    {
        Self::new(rows.into_iter().map(|row| UserRecord::from_map(&row)).collect())
    }

    /// Accept the two host shapes: an array of objects, or a
    /// `{"columns": [...], "data": [[...]]}` table. Anything else is
    /// rejected as invalid input.
    pub fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Array(items) => {
                let rows = items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| match item {
                        Value::Object(row) => Ok(row.clone()),
                        _ => Err(AuditError::InvalidInput(format!(
                            "record {} is not a key-value mapping",
                            i
                        ))),
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(Self::from_rows(rows))
            }
            Value::Object(table) if table.contains_key("columns") => Self::from_table(table),
            Value::Null => Err(AuditError::InvalidInput(
                "No user data provided".into(),
            )),
            _ => Err(AuditError::InvalidInput(
                "Expected a sequence of records or a column/row table".into(),
            )),
        }
    }

    fn from_table(table: &Map<String, Value>) -> Result<Self> {
        let columns: Vec<String> = match table.get("columns") {
            Some(Value::Array(cols)) => cols.iter().map(cell_text).collect(),
            _ => {
                return Err(AuditError::InvalidInput(
                    "table 'columns' must be an array".into(),
                ))
            }
        };

        let rows = match table.get("data").or_else(|| table.get("rows")) {
            Some(Value::Array(rows)) => rows,
            Some(_) => {
                return Err(AuditError::InvalidInput(
                    "table 'data' must be an array of rows".into(),
                ))
            }
            None => return Ok(Self::default()),
        };

        let mut records = Vec::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            let cells = match row {
                Value::Array(cells) if cells.len() == columns.len() => cells,
                Value::Array(cells) => {
                    return Err(AuditError::InvalidInput(format!(
                        "table row {} has {} cells, expected {}",
                        i,
                        cells.len(),
                        columns.len()
                    )))
                }
                _ => {
                    return Err(AuditError::InvalidInput(format!(
                        "table row {} is not an array",
                        i
                    )))
                }
            };
            let map: Map<String, Value> = columns.iter().cloned().zip(cells.iter().cloned()).collect();
            records.push(UserRecord::from_map(&map));
        }

        Ok(Self::new(records))
    }

    pub fn records(&self) -> &[UserRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, UserRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First record whose username matches case-insensitively.
    pub fn find(&self, username: &str) -> Option<&UserRecord> {
        self.records.iter().find(|r| r.is_user(username))
    }

    /// Validate inputs and resolve the target record. Shared by every
    /// operation so they agree on blank names, empty data and duplicates.
    pub fn resolve(&self, username: &str) -> Result<&UserRecord> {
        let username = validate_username(username)?;
        if self.is_empty() {
            return Err(AuditError::InvalidInput(
                "No user data provided".into(),
            ));
        }
        self.find(username).ok_or_else(|| AuditError::NotFound {
            username: username.to_string(),
            suggestion: self.suggest(username),
        })
    }

    /// The first few usernames, for not-found diagnostics.
    pub fn preview_usernames(&self) -> Vec<String> {
        self.records
            .iter()
            .take(PREVIEW_LIMIT)
            .map(|r| r.username.clone())
            .collect()
    }

    /// Closest username by edit distance, if any is near enough.
    pub fn suggest(&self, username: &str) -> Option<String> {
        let wanted = username.trim().to_lowercase();
        self.records
            .iter()
            .filter(|r| !r.username.is_empty())
            .map(|r| (levenshtein::levenshtein(&wanted, &r.username.to_lowercase()), r))
            .filter(|(distance, _)| *distance <= SUGGESTION_DISTANCE)
            .min_by_key(|(distance, _)| *distance)
            .map(|(_, r)| r.username.clone())
    }

    /// SHA-256 over the normalized records, hex encoded.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for record in &self.records {
            for field in [
                &record.username,
                &record.department,
                &record.role,
                &record.employment_status,
                &record.hire_date,
            ] {
                hasher.update(field.as_bytes());
                hasher.update([0x1f]);
            }
            hasher.update(record.permissions.join(",").as_bytes());
            hasher.update([0x1f]);
            hasher.update(record.risk_reasoning.as_deref().unwrap_or("").as_bytes());
            hasher.update([0x1e]);
        }
        hex::encode(hasher.finalize())
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a UserRecord;
    type IntoIter = std::slice::Iter<'a, UserRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
