//! Shared output formatting for quality reports.
//!
//! Provides JSON and plain-text formatters for [`QualityReport`].
//! Color/terminal formatting belongs to the CLI layer.

use std::io::Write;

use crate::issue::Severity;
use crate::report::{Category, QualityReport};

/// Format a `QualityReport` as JSON to a writer.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json(report: &QualityReport, writer: &mut dyn Write) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    writeln!(writer, "{json}")?;
    Ok(())
}

fn percent(ratio: f64) -> String {
    format!("{:5.1}%", ratio * 100.0)
}

fn write_section(
    report: &QualityReport,
    writer: &mut dyn Write,
    severity: Severity,
    title: &str,
) -> anyhow::Result<()> {
    let mut issues = report.with_severity(severity).peekable();
    if issues.peek().is_none() {
        return Ok(());
    }
    writeln!(writer, "{}", "-".repeat(80))?;
    writeln!(writer, "  {title}")?;
    writeln!(writer, "{}", "-".repeat(80))?;
    for issue in issues {
        writeln!(writer, "{issue}")?;
    }
    writeln!(writer)?;
    Ok(())
}

/// Format a `QualityReport` as human-readable plain text to a writer.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_human(report: &QualityReport, writer: &mut dyn Write) -> anyhow::Result<()> {
    let counts = &report.counts;
    let coverage = &report.coverage;
    let summary = &report.summary;

    writeln!(writer)?;
    writeln!(writer, "{}", "=".repeat(80))?;
    writeln!(writer, "  LINEAGE QUALITY REPORT")?;
    writeln!(writer, "{}", "=".repeat(80))?;
    writeln!(writer)?;
    writeln!(writer, "  Individuals:    {}", counts.individuals)?;
    writeln!(writer, "  Families:       {}", counts.families)?;
    writeln!(writer, "  Sources:        {}", counts.sources)?;
    writeln!(writer, "  Notes:          {}", counts.notes)?;
    writeln!(writer, "  Repositories:   {}", counts.repositories)?;
    writeln!(writer)?;
    writeln!(writer, "  Coverage")?;
    writeln!(writer, "    Birth date:   {}", percent(coverage.birth_date))?;
    writeln!(writer, "    Death date:   {}", percent(coverage.death_date))?;
    writeln!(writer, "    Sources:      {}", percent(coverage.sources))?;
    writeln!(writer, "    Places:       {}", percent(coverage.places))?;
    writeln!(writer, "    Names:        {}", percent(coverage.names))?;
    writeln!(writer)?;

    let references = report.references.totals();
    writeln!(
        writer,
        "  References:     {} total, {} valid, {} orphaned, {} mismatched",
        references.total, references.valid, references.orphaned, references.mismatched
    )?;
    writeln!(writer, "  Duplicates:     {}", report.duplicates.len())?;
    writeln!(writer)?;

    writeln!(writer, "  Errors:         {}", summary.errors)?;
    writeln!(writer, "  Warnings:       {}", summary.warnings)?;
    writeln!(writer, "  Info:           {}", summary.infos)?;
    for category in Category::ALL {
        if let Some(count) = summary.by_category.get(&category) {
            let label = format!("{category}:");
            writeln!(writer, "    {label:<14}{count}")?;
        }
    }
    writeln!(writer)?;

    write_section(report, writer, Severity::Error, "ERRORS")?;
    write_section(report, writer, Severity::Warning, "WARNINGS")?;
    write_section(report, writer, Severity::Info, "INFO")?;

    writeln!(writer, "{}", "=".repeat(80))?;
    if report.has_errors() {
        writeln!(writer, "\u{2717} {} error(s) found", summary.errors)?;
    } else if summary.total() > 0 {
        writeln!(
            writer,
            "\u{2713} No errors ({} other finding(s))",
            summary.total()
        )?;
    } else {
        writeln!(writer, "\u{2713} No findings")?;
    }
    writeln!(writer, "{}", "=".repeat(80))?;

    Ok(())
}
