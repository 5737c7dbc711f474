use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AuditError>;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("User {username} not found")]
    NotFound {
        username: String,
        suggestion: Option<String>,
    },

    #[error("No suitable loader found for dataset: {0}")]
    UnsupportedSource(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "csv")]
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuditError {
    pub fn exit_code(&self) -> i32 {
        2
    }
}

/// Which class of failure an error record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidInput,
    NotFound,
    Internal,
}

/// A failure reported as data rather than propagated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub error: String,
    pub kind: ErrorKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    pub status: String,
}

impl ErrorRecord {
    /// Fold an error into a record. `context` prefixes the status line.
    pub fn from_error(err: AuditError, context: &str) -> Self {
        let (kind, suggestion) = match &err {
            AuditError::InvalidInput(_) => (ErrorKind::InvalidInput, None),
            AuditError::NotFound { suggestion, .. } => (ErrorKind::NotFound, suggestion.clone()),
            _ => (ErrorKind::Internal, None),
        };
        let error = match err {
            AuditError::InvalidInput(message) => message,
            other => other.to_string(),
        };
        Self {
            status: format!("{}: {}", context, error),
            error,
            kind,
            suggestion,
        }
    }
}

/// Result of an operation at the host boundary: the value, or an error
/// record. Serializes as whichever one it holds.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ToolOutput<T> {
    Ok(T),
    Err(ErrorRecord),
}

impl<T> ToolOutput<T> {
    pub fn from_result(result: Result<T>, context: &str) -> Self {
        match result {
            Ok(value) => Self::Ok(value),
            Err(err) => {
                let record = ErrorRecord::from_error(err, context);
                match record.kind {
                    ErrorKind::Internal => tracing::warn!(error = %record.error, "{}", context),
                    _ => tracing::debug!(error = %record.error, "{}", context),
                }
                Self::Err(record)
            }
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    pub fn ok(&self) -> Option<&T> {
        match self {
            Self::Ok(value) => Some(value),
            Self::Err(_) => None,
        }
    }

    pub fn err(&self) -> Option<&ErrorRecord> {
        match self {
            Self::Ok(_) => None,
            Self::Err(record) => Some(record),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_keeps_suggestion() {
        let record = ErrorRecord::from_error(
            AuditError::NotFound {
                username: "jsmiht".into(),
                suggestion: Some("jsmith".into()),
            },
            "Peer comparison failed",
        );
        assert_eq!(record.kind, ErrorKind::NotFound);
        assert_eq!(record.error, "User jsmiht not found");
        assert_eq!(record.suggestion.as_deref(), Some("jsmith"));
        assert_eq!(record.status, "Peer comparison failed: User jsmiht not found");
    }

    #[test]
    fn unexpected_errors_are_internal() {
        let record = ErrorRecord::from_error(AuditError::Internal("boom".into()), "Lookup failed");
        assert_eq!(record.kind, ErrorKind::Internal);
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["error"], "Internal error: boom");
        assert!(value.get("suggestion").is_none());
    }
}
