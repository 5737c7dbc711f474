use chrono::{DateTime, Utc};
use serde::Serialize;

use super::Report;
use crate::dataset::Dataset;
use crate::error::Result;
use crate::rules::policy::ReviewVerdict;

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: DateTime<Utc>,
    dataset_fingerprint: String,
    total_records: usize,
    result: Report<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    verdict: Option<&'a ReviewVerdict>,
}

/// Render an operation result as a JSON document tied to its dataset.
pub fn render(report: Report<'_>, verdict: Option<&ReviewVerdict>, dataset: &Dataset) -> Result<String> {
    let doc = JsonReport {
        generated_at: Utc::now(),
        dataset_fingerprint: dataset.fingerprint(),
        total_records: dataset.len(),
        result: report,
        verdict,
    };
    let json = serde_json::to_string_pretty(&doc)?;
    Ok(json)
}
