pub mod console;
pub mod json;

use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::error::{Result, ToolOutput};
use crate::lookup::LookupResult;
use crate::peers::ComparisonResult;
use crate::risk::RiskReport;
use crate::rules::policy::ReviewVerdict;

/// Output format selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Console,
    Json,
}

impl OutputFormat {
    pub fn from_str_lenient(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "console" | "text" => Some(Self::Console),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// The result of one operation, ready to render.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(untagged)]
pub enum Report<'a> {
    Lookup(&'a LookupResult),
    Peers(&'a ToolOutput<ComparisonResult>),
    Risk(&'a ToolOutput<RiskReport>),
}

/// Render an operation result into the specified format.
pub fn render(
    report: Report<'_>,
    verdict: Option<&ReviewVerdict>,
    format: OutputFormat,
    dataset: &Dataset,
) -> Result<String> {
    match format {
        OutputFormat::Console => Ok(console::render(report, verdict)),
        OutputFormat::Json => json::render(report, verdict, dataset),
    }
}
