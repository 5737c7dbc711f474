//! accessaudit: access-governance review for identity inventories.
//!
//! Three independent, read-only operations over one inventory snapshot:
//! user lookup, peer comparison and risk pattern scoring. Every operation
//! returns its outcome as data; unknown users and malformed input never
//! abort the caller.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use accessaudit::{analyze, dataset::loader};
//!
//! let dataset = loader::auto_detect_and_load(Path::new("users.csv")).unwrap();
//! if let Some(report) = analyze("jsmith", &dataset).ok() {
//!     println!("{}: {} (score {})", report.username, report.overall_risk_level, report.severity_score);
//! }
//! ```

pub mod config;
pub mod dataset;
pub mod error;
pub mod lookup;
pub mod output;
pub mod peers;
pub mod risk;
pub mod rules;
pub mod tools;

use std::path::{Path, PathBuf};

use config::Config;
use dataset::Dataset;
use error::{AuditError, Result};

pub use lookup::{lookup, LookupResult};
pub use peers::{compare, ComparisonResult, OutlierStatus};
pub use risk::{analyze, RiskReport};

/// Options shared by every CLI review command.
#[derive(Debug, Clone, Default)]
pub struct ReviewOptions {
    /// Path to config file (defaults to `.accessaudit.toml` in the working directory).
    pub config_path: Option<PathBuf>,
    /// Inventory file; overrides `dataset.path` from config.
    pub data_path: Option<PathBuf>,
    /// CLI override for the fail_on threshold.
    pub fail_on_override: Option<rules::Severity>,
}

/// A loaded review session: resolved config plus the inventory snapshot.
#[derive(Debug)]
pub struct Session {
    pub config: Config,
    pub dataset: Dataset,
}

/// Load config, apply CLI overrides and load the inventory.
pub fn open_session(options: &ReviewOptions) -> Result<Session> {
    let config_path = options
        .config_path
        .clone()
        .unwrap_or_else(|| PathBuf::from(".accessaudit.toml"));
    let mut config = Config::load(&config_path)?;

    if let Some(fail_on) = options.fail_on_override {
        config.policy.fail_on = fail_on;
    }

    let data_path = options
        .data_path
        .clone()
        .or_else(|| config.dataset.path.clone())
        .ok_or_else(|| {
            AuditError::Config("no dataset given; pass --data or set [dataset] path".into())
        })?;

    let dataset = load_dataset(&data_path)?;
    Ok(Session { config, dataset })
}

/// Load an inventory file by extension.
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    dataset::loader::auto_detect_and_load(path)
}
