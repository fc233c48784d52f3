//! Argument parsing and the validation run.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, ValueEnum};
use lineage::Document;
use lineage_validator::{
    Issue, Severity, Strictness, Validator, ValidatorConfig, Vendor, output, sort_by_severity,
};
use serde::Serialize;

use crate::load::{load_config, load_document};

/// Validate a serialized lineage document
#[derive(Parser, Debug)]
#[command(name = "lineage", author, version, about, long_about = None)]
pub struct Cli {
    /// Document to validate (`.json`, `.yaml` or `.yml`)
    pub input: PathBuf,

    /// JSON validator configuration; flags below override it
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Which severities to report: relaxed, normal or strict
    #[arg(short, long)]
    pub strictness: Option<String>,

    /// Load a vendor's custom tag definitions (repeatable)
    #[arg(long = "vendor")]
    pub vendors: Vec<Vendor>,

    /// Report unregistered custom tags as info instead of warnings
    #[arg(long)]
    pub quiet_unknown_tags: bool,

    /// Minimum confidence for reporting a potential duplicate
    #[arg(long)]
    pub min_confidence: Option<f64>,

    /// Skip duplicate detection
    #[arg(long)]
    pub no_duplicates: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,

    /// Resolve references record by record instead of running the full analysis
    #[arg(long)]
    pub stream: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain-text report
    Human,
    /// Pretty-printed JSON
    Json,
}

/// Result of a run that completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// No error-severity findings.
    Clean,
    /// At least one error-severity finding.
    Failed,
}

impl Outcome {
    #[must_use]
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Clean => 0,
            Self::Failed => 1,
        }
    }

    fn from_issues(issues: &[Issue]) -> Self {
        if issues.iter().any(|i| i.severity() == Severity::Error) {
            Self::Failed
        } else {
            Self::Clean
        }
    }
}

#[derive(Serialize)]
struct StreamSummary<'a> {
    records: usize,
    identifiers: usize,
    referenced: usize,
    issues: &'a [Issue],
}

impl Cli {
    /// The configuration file (if any) with command-line overrides applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file cannot be loaded.
    pub fn validator_config(&self) -> Result<ValidatorConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => ValidatorConfig::default(),
        };
        if let Some(raw) = &self.strictness {
            config.strictness = Strictness::parse_lenient(raw);
        }
        if !self.vendors.is_empty() {
            config.tags.vendors.clone_from(&self.vendors);
        }
        if self.quiet_unknown_tags {
            config.tags.warn_unknown_tags = false;
        }
        if let Some(min) = self.min_confidence {
            config.duplicates.min_confidence = min;
        }
        if self.no_duplicates {
            config.check_duplicates = false;
        }
        Ok(config)
    }
}

/// Load the input, validate it and write the result to `out`.
///
/// # Errors
///
/// Returns an error if the configuration or document cannot be loaded, or
/// if writing the output fails.
pub fn execute(args: &Cli, out: &mut dyn Write) -> Result<Outcome> {
    let config = args.validator_config()?;
    let doc = load_document(&args.input)?;
    tracing::debug!(stream = args.stream, "validating");

    if args.stream {
        return stream(&doc, config, args.format, out);
    }

    let mut validator = Validator::new(config);
    let report = validator.analyze(Some(&doc));
    match args.format {
        OutputFormat::Human => output::write_human(&report, out)?,
        OutputFormat::Json => output::write_json(&report, out)?,
    }
    Ok(Outcome::from_issues(report.issues()))
}

fn stream(
    doc: &Document,
    config: ValidatorConfig,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<Outcome> {
    let strictness = config.strictness;
    let validator = Validator::new(config);
    let mut streaming = validator.streaming();

    let mut issues = Vec::new();
    for record in doc.records() {
        issues.extend(streaming.process_record(record));
    }
    issues.extend(streaming.finalize());
    issues.retain(|i| strictness.allows(i.severity()));
    sort_by_severity(&mut issues);

    match format {
        OutputFormat::Human => {
            writeln!(
                out,
                "Streamed {} record(s), {} identifier(s) declared, {} referenced",
                streaming.records_seen(),
                streaming.declared_count(),
                streaming.referenced_count()
            )?;
            for issue in &issues {
                writeln!(out, "{issue}")?;
            }
        }
        OutputFormat::Json => {
            let summary = StreamSummary {
                records: streaming.records_seen(),
                identifiers: streaming.declared_count(),
                referenced: streaming.referenced_count(),
                issues: &issues,
            };
            writeln!(out, "{}", serde_json::to_string_pretty(&summary)?)?;
        }
    }
    Ok(Outcome::from_issues(&issues))
}

/// Run against stdout.
///
/// # Errors
///
/// See [`execute`].
pub fn run(args: &Cli) -> Result<Outcome> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let outcome = execute(args, &mut out)?;
    out.flush()?;
    Ok(outcome)
}
