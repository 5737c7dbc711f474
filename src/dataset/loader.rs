use std::path::Path;

use serde::{Deserialize, Serialize};
#[cfg(feature = "csv")]
use serde_json::{Map, Value};

use super::Dataset;
use crate::error::{AuditError, Result};

/// On-disk inventory formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Json,
    Csv,
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => write!(f, "JSON"),
            Self::Csv => write!(f, "CSV"),
        }
    }
}

/// A loader recognizes one inventory format and normalizes it into a
/// `Dataset`.
pub trait Loader: Send + Sync {
    /// The format this loader handles.
    fn format(&self) -> SourceFormat;

    /// Check if this loader can read the given file.
    fn detect(&self, path: &Path) -> bool;

    /// Read and normalize the file.
    fn load(&self, path: &Path) -> Result<Dataset>;
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .is_some_and(|e| e.to_string_lossy().eq_ignore_ascii_case(ext))
}

/// JSON inventory: an array of records or a column/row table.
pub struct JsonLoader;

impl Loader for JsonLoader {
    fn format(&self) -> SourceFormat {
        SourceFormat::Json
    }

    fn detect(&self, path: &Path) -> bool {
        has_extension(path, "json")
    }

    fn load(&self, path: &Path) -> Result<Dataset> {
        let content = std::fs::read_to_string(path)?;
        let value: serde_json::Value = serde_json::from_str(&content)?;
        Dataset::from_value(&value)
    }
}

/// CSV inventory with a header row.
#[cfg(feature = "csv")]
pub struct CsvLoader;

#[cfg(feature = "csv")]
impl Loader for CsvLoader {
    fn format(&self) -> SourceFormat {
        SourceFormat::Csv
    }

    fn detect(&self, path: &Path) -> bool {
        has_extension(path, "csv")
    }

    fn load(&self, path: &Path) -> Result<Dataset> {
        let mut reader = csv::Reader::from_path(path)?;
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            let row: Map<String, Value> = headers
                .iter()
                .cloned()
                .zip(record.iter().map(|cell| Value::String(cell.to_string())))
                .collect();
            rows.push(row);
        }

        Ok(Dataset::from_rows(rows))
    }
}

/// All registered loaders.
pub fn all_loaders() -> Vec<Box<dyn Loader>> {
    let mut loaders: Vec<Box<dyn Loader>> = vec![Box::new(JsonLoader)];
    #[cfg(feature = "csv")]
    loaders.push(Box::new(CsvLoader));
    loaders
}

/// Pick the loader for `path` by extension and load the dataset.
pub fn auto_detect_and_load(path: &Path) -> Result<Dataset> {
    let loader = all_loaders()
        .into_iter()
        .find(|l| l.detect(path))
        .ok_or_else(|| AuditError::UnsupportedSource(path.display().to_string()))?;

    let dataset = loader.load(path)?;
    tracing::debug!(
        format = %loader.format(),
        path = %path.display(),
        records = dataset.len(),
        "loaded inventory"
    );

    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn json_fixture_loads() {
        let dataset = auto_detect_and_load(Path::new("tests/fixtures/users.json")).unwrap();
        assert_eq!(dataset.len(), 12);
        let record = dataset.find("jsmith").unwrap();
        assert_eq!(record.department, "Engineering");
    }

    #[cfg(feature = "csv")]
    #[test]
    fn csv_and_json_fixtures_agree() {
        let from_csv = auto_detect_and_load(Path::new("tests/fixtures/users.csv")).unwrap();
        let from_json = auto_detect_and_load(Path::new("tests/fixtures/users.json")).unwrap();
        assert_eq!(from_csv, from_json);
        assert_eq!(from_csv.fingerprint(), from_json.fingerprint());
    }

    #[cfg(feature = "csv")]
    #[test]
    fn csv_quoted_permissions_split() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(
            file,
            "username,department,role,permissions,employment_status,hire_date,risk_reasoning"
        )
        .unwrap();
        writeln!(
            file,
            "kchen,Finance,Analyst,\"ledger_read, ledger_write\",Active,2022-05-01,"
        )
        .unwrap();
        writeln!(file, "lpark,Finance,Analyst,,Active,2022-06-01,nan").unwrap();

        let dataset = auto_detect_and_load(file.path()).unwrap();
        assert_eq!(dataset.records()[0].permissions, vec!["ledger_read", "ledger_write"]);
        assert!(dataset.records()[1].permissions.is_empty());
        assert!(!dataset.records()[1].has_risk_flags());
    }

    #[test]
    fn json_scalar_is_invalid_input() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "\"not a dataset\"").unwrap();
        let err = auto_detect_and_load(file.path()).unwrap_err();
        assert!(matches!(err, AuditError::InvalidInput(_)));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = auto_detect_and_load(Path::new("users.xlsx")).unwrap_err();
        assert!(matches!(err, AuditError::UnsupportedSource(_)));
    }
}
