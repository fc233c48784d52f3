//! The validation facade.
//!
//! [`Validator`] wires the individual passes together from one
//! [`ValidatorConfig`], builds each pass on first use, and applies the
//! configured [`Strictness`] as a final filter. Every entry point takes an
//! `Option<&Document>`; `None` yields an empty result.
//!
//! Sub-validators are created lazily through `&mut self`, so a `Validator`
//! is not meant to be shared between threads. Give each caller its own.

use lineage::Document;

use crate::compliance::check_compliance;
use crate::config::{Strictness, ValidatorConfig};
use crate::error::ValidationError;
use crate::issue::{Issue, sort_by_severity};
use crate::quality::{QualityAnalyzer, escalate_tag_violations};
use crate::references::batch::ReferenceValidator;
use crate::references::streaming::StreamingValidator;
use crate::report::QualityReport;
use crate::rules::date_logic::DateLogicValidator;
use crate::rules::duplicates::{DuplicateDetector, DuplicatePair};
use crate::tags::{TagRegistry, TagValidator};

#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: ValidatorConfig,
    /// Overrides the vendor registries named in the config.
    registry: Option<TagRegistry>,
    date_logic: Option<DateLogicValidator>,
    references: Option<ReferenceValidator>,
    duplicates: Option<DuplicateDetector>,
    tags: Option<TagValidator>,
    analyzer: Option<QualityAnalyzer>,
}

impl Validator {
    #[must_use]
    pub fn new(config: ValidatorConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Change the surfaced severities. Already-built passes are kept; the
    /// filter applies to results only.
    #[must_use]
    pub fn with_strictness(mut self, strictness: Strictness) -> Self {
        self.config.strictness = strictness;
        self
    }

    /// Use `registry` for custom tags instead of the configured vendors.
    #[must_use]
    pub fn with_tag_registry(mut self, registry: TagRegistry) -> Self {
        self.registry = Some(registry);
        self.tags = None;
        self.analyzer = None;
        self
    }

    #[must_use]
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    #[must_use]
    pub fn strictness(&self) -> Strictness {
        self.config.strictness
    }

    fn filter(&self, mut issues: Vec<Issue>) -> Vec<Issue> {
        let strictness = self.config.strictness;
        issues.retain(|i| strictness.allows(i.severity()));
        sort_by_severity(&mut issues);
        issues
    }

    fn date_logic(&mut self) -> &DateLogicValidator {
        let config = self.config.date_logic;
        self.date_logic
            .get_or_insert_with(|| DateLogicValidator::new(config))
    }

    fn references(&mut self) -> &ReferenceValidator {
        self.references.get_or_insert_with(ReferenceValidator::new)
    }

    fn duplicates(&mut self) -> &DuplicateDetector {
        let config = self.config.duplicates;
        self.duplicates
            .get_or_insert_with(|| DuplicateDetector::new(config))
    }

    fn tag_validator(&mut self) -> &TagValidator {
        let Self {
            config,
            registry,
            tags,
            ..
        } = self;
        tags.get_or_insert_with(|| {
            let registry = registry
                .clone()
                .unwrap_or_else(|| TagRegistry::with_vendors(&config.tags.vendors));
            tracing::debug!(tags = registry.len(), "tag registry ready");
            TagValidator::new(registry, config.tags.warn_unknown_tags)
        })
    }

    fn analyzer(&mut self) -> &QualityAnalyzer {
        let analyzer = match self.analyzer.take() {
            Some(analyzer) => analyzer,
            None => {
                let tags = self.tag_validator().clone();
                QualityAnalyzer::with_tags(&self.config, tags).with_tag_escalation(true)
            }
        };
        self.analyzer.insert(analyzer)
    }

    /// Every pass, filtered and severity-sorted.
    pub fn validate(&mut self, doc: Option<&Document>) -> Vec<Issue> {
        self.analyze(doc).issues().to_vec()
    }

    /// The legacy entry point: the same findings as [`Validator::validate`]
    /// in the plain error shape.
    pub fn validate_legacy(&mut self, doc: Option<&Document>) -> Vec<ValidationError> {
        self.validate(doc)
            .into_iter()
            .map(ValidationError::from)
            .collect()
    }

    pub fn validate_dates(&mut self, doc: Option<&Document>) -> Vec<Issue> {
        let Some(doc) = doc else {
            return Vec::new();
        };
        let issues = self.date_logic().validate_document(doc);
        self.filter(issues)
    }

    pub fn validate_references(&mut self, doc: Option<&Document>) -> Vec<Issue> {
        let Some(doc) = doc else {
            return Vec::new();
        };
        let issues = self.references().validate(doc);
        self.filter(issues)
    }

    /// Custom-tag findings, with matched parent/value misuse raised to
    /// errors.
    pub fn validate_tags(&mut self, doc: Option<&Document>) -> Vec<Issue> {
        let Some(doc) = doc else {
            return Vec::new();
        };
        let issues = escalate_tag_violations(self.tag_validator().validate_document(doc));
        self.filter(issues)
    }

    pub fn validate_compliance(&mut self, doc: Option<&Document>) -> Vec<Issue> {
        let Some(doc) = doc else {
            return Vec::new();
        };
        self.filter(check_compliance(doc))
    }

    /// Duplicate findings as issues. These are informational, so only
    /// [`Strictness::Strict`] surfaces them.
    pub fn find_duplicates(&mut self, doc: Option<&Document>) -> Vec<Issue> {
        let issues = self
            .duplicate_pairs(doc)
            .iter()
            .map(DuplicatePair::to_issue)
            .collect();
        self.filter(issues)
    }

    /// Scored duplicate candidates, unfiltered.
    pub fn duplicate_pairs(&mut self, doc: Option<&Document>) -> Vec<DuplicatePair> {
        doc.map_or_else(Vec::new, |doc| self.duplicates().find_duplicates(doc))
    }

    /// Full quality report, with issues filtered by strictness.
    pub fn analyze(&mut self, doc: Option<&Document>) -> QualityReport {
        let Some(doc) = doc else {
            return QualityReport::empty();
        };
        let strictness = self.config.strictness;
        let report = self.analyzer().analyze(doc).filtered(strictness);
        tracing::debug!(
            strictness = ?strictness,
            surfaced = report.issues().len(),
            "validation complete"
        );
        report
    }

    /// A fresh streaming validator using this validator's date thresholds.
    #[must_use]
    pub fn streaming(&self) -> StreamingValidator {
        StreamingValidator::new(self.config.date_logic)
    }
}
