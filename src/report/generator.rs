//! Markdown and JSON report generation.
//!
//! This module renders a [`Report`] for people (Markdown) or for other
//! tools (JSON).

use crate::models::{FitResult, Report, ReportMetadata, RollCount, SidesSource};
use anyhow::Result;
use std::io::Write;
use std::path::Path;

/// Width of the longest bar in the frequency table.
const BAR_WIDTH: usize = 30;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report) -> String {
    let mut output = String::new();

    // Title
    output.push_str("# Dice Fairness Report\n\n");

    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_verdict_section(report));
    output.push_str(&generate_warnings_section(&report.warnings));
    output.push_str(&generate_counts_section(&report.counts));
    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Source:** `{}`\n", metadata.source));
    section.push_str(&format!(
        "- **Analysis Date:** {}\n",
        metadata.analysis_date.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Total Rolls:** {}\n", metadata.total_rolls));
    section.push_str(&format!(
        "- **Distinct Values:** {}\n",
        metadata.distinct_labels
    ));
    section.push('\n');

    section
}

/// Generate the die type and fit test section.
fn generate_verdict_section(report: &Report) -> String {
    let mut section = String::new();

    section.push_str("## Die Type\n\n");
    match report.die_type {
        Some(die) => section.push_str(&format!("Best guess: **{}**\n\n", die)),
        None => section.push_str("Best guess: *indeterminate*\n\n"),
    }

    if let Some(ref fit) = report.fit {
        section.push_str(&generate_fit_block(fit, report.sides_source));
    }

    section
}

/// Generate the fit test table and verdict.
fn generate_fit_block(fit: &FitResult, source: Option<SidesSource>) -> String {
    let mut block = String::new();

    block.push_str("## Fairness Test\n\n");

    let origin = match source {
        Some(SidesSource::Override) => " (set by user)",
        _ => "",
    };

    block.push_str("| Measure | Value |\n");
    block.push_str("|:---|---:|\n");
    block.push_str(&format!("| Sides tested | {}{} |\n", fit.sides, origin));
    block.push_str(&format!("| Chi-squared | {:.4} |\n", fit.statistic));
    block.push_str(&format!(
        "| Degrees of freedom | {} |\n",
        fit.degrees_of_freedom
    ));
    block.push_str(&format!("| CDF | {:.4} |\n", fit.cdf));
    block.push_str(&format!("| p-value | {:.4} |\n", fit.p_value));
    block.push_str(&format!("| Significance | {} |\n", fit.significance));
    block.push_str(&format!(
        "| Suggested minimum rolls | {} |\n\n",
        fit.suggested_minimum_rolls
    ));

    if fit.consistent_with_fair {
        block.push_str(&format!(
            "✅ **Consistent with a fair die** (p = {:.4} ≥ {})\n\n",
            fit.p_value, fit.significance
        ));
    } else {
        block.push_str(&format!(
            "⛔ **Unlikely to be a fair die** (p = {:.4} < {})\n\n",
            fit.p_value, fit.significance
        ));
    }

    block
}

/// Generate the warnings section.
fn generate_warnings_section(warnings: &[String]) -> String {
    if warnings.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("## Warnings\n\n");
    for warning in warnings {
        section.push_str(&format!("- ⚠️ {}\n", warning));
    }
    section.push('\n');

    section
}

/// Generate the frequency table with a text bar per value.
fn generate_counts_section(counts: &[RollCount]) -> String {
    if counts.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("## Roll Counts\n\n");
    section.push_str("| Roll | Count | |\n");
    section.push_str("|:---|---:|:---|\n");

    let max = counts.iter().map(|row| row.count).max().unwrap_or(1).max(1);
    for row in counts {
        let width = (row.count * BAR_WIDTH).div_ceil(max);
        section.push_str(&format!(
            "| {} | {} | `{}` |\n",
            row.label,
            row.count,
            "#".repeat(width)
        ));
    }
    section.push('\n');

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str(&format!(
        "*Report generated by dicecheck v{}*\n",
        env!("CARGO_PKG_VERSION")
    ));

    footer
}

/// Write a Markdown report to a file.
pub fn write_report(report: &Report, path: &Path) -> Result<()> {
    let content = generate_markdown_report(report);

    let mut file = std::fs::File::create(path)?;
    file.write_all(content.as_bytes())?;

    Ok(())
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Write a JSON report to a file.
pub fn write_json_report(report: &Report, path: &Path) -> Result<()> {
    let content = generate_json_report(report)?;

    let mut file = std::fs::File::create(path)?;
    file.write_all(content.as_bytes())?;

    Ok(())
}
