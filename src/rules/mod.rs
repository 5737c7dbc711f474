pub mod builtin;
pub mod finding;
pub mod policy;

use crate::dataset::UserRecord;

pub use finding::{Finding, RiskCategory, RiskPattern, RuleMetadata, Severity};

/// A rule inspects one user record and reports at most one finding.
pub trait RiskRule: Send + Sync {
    /// Metadata about this rule (pattern, severity, category, score).
    fn metadata(&self) -> RuleMetadata;

    /// Evaluate the rule against a single user.
    fn evaluate(&self, user: &UserRecord) -> Option<Finding>;
}

/// The rule engine runs every registered rule against a user.
pub struct RuleEngine {
    rules: Vec<Box<dyn RiskRule>>,
}

impl RuleEngine {
    /// Create a new engine with the built-in catalogue registered.
    pub fn new() -> Self {
        Self {
            rules: builtin::all_rules(),
        }
    }

    /// Run all rules in catalogue order. Rules are independent; any subset
    /// may fire.
    pub fn run(&self, user: &UserRecord) -> Vec<Finding> {
        self.rules.iter().filter_map(|r| r.evaluate(user)).collect()
    }

    /// List metadata for all registered rules.
    pub fn list_rules(&self) -> Vec<RuleMetadata> {
        self.rules.iter().map(|r| r.metadata()).collect()
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}
