//! Host boundary: the three operations as named tools over raw JSON.
//!
//! A tool never fails. Unsupported dataset shapes, blank usernames and
//! unknown users come back as result mappings; only a failure to serialize
//! the result is wrapped into a bare `{"error": ..., "kind": "internal"}`.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::dataset::Dataset;
use crate::error::ErrorRecord;
use crate::lookup::{self, LookupResult};
use crate::{peers, risk};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    UserLookup,
    PeerComparison,
    RiskPatterns,
}

impl Tool {
    pub const ALL: [Tool; 3] = [Self::UserLookup, Self::PeerComparison, Self::RiskPatterns];

    pub fn name(&self) -> &'static str {
        match self {
            Self::UserLookup => "user_lookup",
            Self::PeerComparison => "peer_comparison",
            Self::RiskPatterns => "risk_patterns",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::UserLookup => "Look up user information from IAM data",
            Self::PeerComparison => "Compare user permissions with peers in same role/department",
            Self::RiskPatterns => "Analyze specific risk patterns in user permissions",
        }
    }

    pub fn from_str_lenient(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "user_lookup" | "lookup" => Some(Self::UserLookup),
            "peer_comparison" | "peers" => Some(Self::PeerComparison),
            "risk_patterns" | "risk" => Some(Self::RiskPatterns),
            _ => None,
        }
    }

    /// Run the tool against a raw dataset value.
    pub fn invoke(&self, username: &str, data: &Value) -> Value {
        let rendered = match Dataset::from_value(data) {
            Ok(dataset) => self.run(username, &dataset),
            Err(err) => {
                tracing::warn!(tool = self.name(), error = %err, "rejected dataset input");
                match self {
                    Self::UserLookup => serde_json::to_value(LookupResult::rejected(username, err)),
                    _ => serde_json::to_value(ErrorRecord::from_error(err, self.failure_context())),
                }
            }
        };

        rendered.unwrap_or_else(|e| {
            tracing::warn!(tool = self.name(), error = %e, "failed to serialize result");
            json!({
                "error": format!("{}: {}", self.failure_context(), e),
                "kind": "internal",
            })
        })
    }

    fn run(&self, username: &str, dataset: &Dataset) -> serde_json::Result<Value> {
        match self {
            Self::UserLookup => serde_json::to_value(lookup::lookup(username, dataset)),
            Self::PeerComparison => serde_json::to_value(peers::compare(username, dataset)),
            Self::RiskPatterns => serde_json::to_value(risk::analyze(username, dataset)),
        }
    }

    fn failure_context(&self) -> &'static str {
        match self {
            Self::UserLookup => "Lookup failed",
            Self::PeerComparison => "Peer comparison failed",
            Self::RiskPatterns => "Risk pattern analysis failed",
        }
    }
}

impl std::fmt::Display for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
