use super::Report;
use crate::error::{ErrorRecord, ToolOutput};
use crate::lookup::{LookupMiss, LookupResult, UserProfile};
use crate::peers::ComparisonResult;
use crate::risk::RiskReport;
use crate::rules::policy::ReviewVerdict;
use crate::rules::Severity;

/// Render an operation result as plain console text.
pub fn render(report: Report<'_>, verdict: Option<&ReviewVerdict>) -> String {
    let mut output = match report {
        Report::Lookup(LookupResult::Found(profile)) => render_profile(profile),
        Report::Lookup(LookupResult::Missing(miss)) => render_miss(miss),
        Report::Peers(ToolOutput::Ok(result)) => render_comparison(result),
        Report::Risk(ToolOutput::Ok(report)) => render_risk(report),
        Report::Peers(ToolOutput::Err(record)) | Report::Risk(ToolOutput::Err(record)) => {
            render_error(record)
        }
    };

    if let Some(verdict) = verdict {
        let status = if verdict.pass { "PASS" } else { "FAIL" };
        output.push_str(&format!(
            "  Result: {} (threshold: {}, level: {})\n\n",
            status, verdict.fail_threshold, verdict.overall_risk_level,
        ));
    }

    output
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".into()
    } else {
        items.join(", ")
    }
}

fn render_profile(profile: &UserProfile) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "\n  {} ({}, {})\n\n",
        profile.username, profile.role, profile.department
    ));
    output.push_str(&format!("    status:      {}\n", profile.employment_status));
    output.push_str(&format!("    hired:       {}\n", profile.hire_date));
    output.push_str(&format!("    permissions: {}\n", profile.permission_count));
    for perm in &profile.permissions {
        output.push_str(&format!("      - {}\n", perm));
    }
    output.push_str(&format!(
        "    risk flags:  {}\n\n",
        list_or_none(&profile.risky_permissions)
    ));
    output
}

fn render_miss(miss: &LookupMiss) -> String {
    let mut output = format!("\n  {}\n", miss.message);
    if let Some(suggestion) = &miss.did_you_mean {
        output.push_str(&format!("    did you mean: {}?\n", suggestion));
    }
    if !miss.available_users.is_empty() {
        output.push_str(&format!(
            "    first users: {} ({} records)\n",
            miss.available_users.join(", "),
            miss.total_records
        ));
    }
    output.push('\n');
    output
}

fn render_comparison(result: &ComparisonResult) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "\n  Peer comparison for {} ({}, {})\n\n",
        result.username, result.role, result.department
    ));
    output.push_str(&format!("    permissions:  {}\n", result.user_permission_count));
    output.push_str(&format!(
        "    exact peers:  {}  (role peers: {})\n",
        result.exact_peers_found, result.role_peers_found
    ));

    match &result.peer_statistics {
        Some(stats) => {
            output.push_str(&format!(
                "    peer average: {:.1} (range {}, difference {:+.1})\n",
                stats.peer_avg_permissions,
                stats.peer_permission_range,
                stats.user_vs_peer_difference
            ));
            output.push_str(&format!("    outlier:      {}\n", result.outlier_status));
            output.push_str(&format!(
                "    only {} has: {}\n",
                result.username,
                list_or_none(&stats.permissions_only_user_has)
            ));
            output.push_str(&format!(
                "    missing vs peers: {}\n",
                list_or_none(&stats.common_permissions_user_missing)
            ));
        }
        None => {
            output.push_str("    peer average: not applicable (no exact peers)\n");
            output.push_str(&format!("    outlier:      {}\n", result.outlier_status));
        }
    }

    if !result.peer_examples.is_empty() {
        let examples: Vec<String> = result
            .peer_examples
            .iter()
            .map(|p| format!("{} ({})", p.username, p.permission_count))
            .collect();
        output.push_str(&format!("    examples:     {}\n", examples.join(", ")));
    }

    output.push('\n');
    output
}

/// Findings in catalogue order, tagged by severity.
fn render_risk(report: &RiskReport) -> String {
    let mut output = format!(
        "\n  Risk analysis for {}: {} (score {}, {} permissions)\n\n",
        report.username, report.overall_risk_level, report.severity_score, report.total_permissions
    );

    if report.risk_factors.is_empty() {
        output.push_str("  No risk patterns detected.\n\n");
        return output;
    }

    for finding in &report.risk_factors {
        let severity_tag = match finding.severity {
            Severity::Critical => "[CRITICAL]",
            Severity::High => "[HIGH]    ",
            Severity::Medium => "[MEDIUM]  ",
            Severity::Low => "[LOW]     ",
        };
        output.push_str(&format!(
            "  {} {} (+{}) {}\n",
            severity_tag, finding.pattern, finding.score, finding.description
        ));
        output.push_str(&format!("           impact: {}\n\n", finding.impact));
    }

    let categories: Vec<String> = report.risk_categories.iter().map(|c| c.to_string()).collect();
    output.push_str(&format!("  Categories: {}\n\n", categories.join(", ")));
    output
}

fn render_error(record: &ErrorRecord) -> String {
    let mut output = format!("\n  Error: {}\n", record.error);
    if let Some(suggestion) = &record.suggestion {
        output.push_str(&format!("    did you mean: {}?\n", suggestion));
    }
    output.push('\n');
    output
}
