use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::rules::policy::Policy;

/// Top-level configuration from `.accessaudit.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub policy: Policy,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Inventory file used when `--data` is not given.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load config from a TOML file. Returns default if file doesn't exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Generate a starter config file.
    pub fn starter_toml() -> &'static str {
        r#"# accessaudit configuration

[dataset]
# Inventory to review when --data is not given (.csv or .json).
# path = "users.csv"

[policy]
# Minimum overall risk tier that fails `accessaudit risk` (low, medium, high, critical).
fail_on = "high"
"#
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Severity;
    use std::io::Write;

    #[test]
    fn missing_file_gives_defaults() {
        let config = Config::load(Path::new("does/not/exist.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.policy.fail_on, Severity::High);
    }

    #[test]
    fn starter_config_parses() {
        let config: Config = toml::from_str(Config::starter_toml()).unwrap();
        assert_eq!(config.policy.fail_on, Severity::High);
        assert!(config.dataset.path.is_none());
    }

    #[test]
    fn reads_dataset_and_policy() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[dataset]\npath = \"inventory/users.csv\"\n\n[policy]\nfail_on = \"CRITICAL\""
        )
        .unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.dataset.path, Some(PathBuf::from("inventory/users.csv")));
        assert_eq!(config.policy.fail_on, Severity::Critical);
    }

    #[test]
    fn bad_severity_is_a_toml_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[policy]\nfail_on = \"severe\"").unwrap();
        assert!(matches!(
            Config::load(file.path()),
            Err(crate::error::AuditError::Toml(_))
        ));
    }
}
