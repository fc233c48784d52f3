//! Whole-document quality analysis.

use lineage::Document;

use crate::compliance::check_compliance;
use crate::config::ValidatorConfig;
use crate::issue::{Issue, Severity, codes};
use crate::references::batch::ReferenceValidator;
use crate::report::{Category, EntityCounts, QualityReport};
use crate::rules::completeness::check_completeness;
use crate::rules::date_logic::DateLogicValidator;
use crate::rules::duplicates::{DuplicateDetector, DuplicatePair};
use crate::tags::{TagRegistry, TagValidator};

/// Raise matched tag misuse to errors. Unknown-tag findings keep their
/// severity.
#[must_use]
pub fn escalate_tag_violations(issues: Vec<Issue>) -> Vec<Issue> {
    issues
        .into_iter()
        .map(|issue| {
            if issue.code() == codes::INVALID_TAG_PARENT || issue.code() == codes::INVALID_TAG_VALUE
            {
                issue.with_severity(Severity::Error)
            } else {
                issue
            }
        })
        .collect()
}

/// Runs every pass over a document and aggregates the findings.
#[derive(Debug, Clone)]
pub struct QualityAnalyzer {
    date_logic: DateLogicValidator,
    references: ReferenceValidator,
    duplicates: Option<DuplicateDetector>,
    tags: TagValidator,
    escalate_tags: bool,
}

impl Default for QualityAnalyzer {
    fn default() -> Self {
        Self::new(&ValidatorConfig::default())
    }
}

impl QualityAnalyzer {
    #[must_use]
    pub fn new(config: &ValidatorConfig) -> Self {
        let tags = TagValidator::new(
            TagRegistry::with_vendors(&config.tags.vendors),
            config.tags.warn_unknown_tags,
        );
        Self::with_tags(config, tags)
    }

    /// Like [`QualityAnalyzer::new`], but checks tags against a prepared
    /// validator instead of building one from `config.tags`.
    #[must_use]
    pub fn with_tags(config: &ValidatorConfig, tags: TagValidator) -> Self {
        Self {
            date_logic: DateLogicValidator::new(config.date_logic),
            references: ReferenceValidator::new(),
            duplicates: config
                .check_duplicates
                .then(|| DuplicateDetector::new(config.duplicates)),
            tags,
            escalate_tags: false,
        }
    }

    /// Report matched tag misuse as errors rather than warnings.
    #[must_use]
    pub fn with_tag_escalation(mut self, enabled: bool) -> Self {
        self.escalate_tags = enabled;
        self
    }

    /// Every pass, unfiltered. Strictness is the caller's concern.
    #[must_use]
    pub fn analyze(&self, doc: &Document) -> QualityReport {
        let counts = EntityCounts::of(doc);
        let (coverage, completeness) = check_completeness(doc);
        let duplicates = self
            .duplicates
            .as_ref()
            .map_or_else(Vec::new, |d| d.find_duplicates(doc));
        let duplicate_issues: Vec<Issue> = duplicates.iter().map(DuplicatePair::to_issue).collect();

        let mut tag_issues = self.tags.validate_document(doc);
        if self.escalate_tags {
            tag_issues = escalate_tag_violations(tag_issues);
        }

        let report = QualityReport::new(
            counts,
            coverage,
            self.references.report(doc),
            duplicates,
            vec![
                (Category::Compliance, check_compliance(doc)),
                (Category::DateLogic, self.date_logic.validate_document(doc)),
                (Category::References, self.references.validate(doc)),
                (Category::Duplicates, duplicate_issues),
                (Category::Tags, tag_issues),
                (Category::Completeness, completeness),
            ],
        );
        tracing::debug!(
            records = counts.total(),
            errors = report.summary.errors,
            warnings = report.summary.warnings,
            infos = report.summary.infos,
            "quality analysis complete"
        );
        report
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use lineage::{Date, Family, Individual, Line, Sex};

    fn sample() -> Document {
        let mut tagged = Individual::new("@I3@")
            .with_name("Ann /Doe/")
            .with_birth(Date::from_year(1980));
        tagged.lines = vec![
            Line::new(0, "INDI", "", 10),
            Line::new(1, "_FSFTID", "bad id", 11),
        ];
        Document::new(None)
            .with_individual(
                Individual::new("@I1@")
                    .with_name("John /Doe/")
                    .with_sex(Sex::Male)
                    .with_birth(Date::from_year(1950))
                    .with_death(Date::from_year(1940)),
            )
            .with_individual(
                Individual::new("@I2@")
                    .with_name("Jon /Doe/")
                    .with_sex(Sex::Male)
                    .with_birth(Date::from_year(1950)),
            )
            .with_individual(tagged)
            .with_family(Family::new("@F1@").with_husband("@I999@"))
    }

    fn analyzer() -> QualityAnalyzer {
        let mut config = ValidatorConfig::default();
        config.tags.vendors = vec![crate::tags::Vendor::FamilySearch];
        QualityAnalyzer::new(&config)
    }

    #[test]
    fn test_all_passes_contribute() {
        let report = analyzer().analyze(&sample());
        assert_eq!(report.counts.individuals, 3);
        assert_eq!(report.issues_with_code(codes::DEATH_BEFORE_BIRTH).len(), 1);
        assert_eq!(report.issues_with_code(codes::ORPHANED_HUSB).len(), 1);
        assert_eq!(report.issues_with_code(codes::POTENTIAL_DUPLICATE).len(), 1);
        assert_eq!(report.issues_with_code(codes::INVALID_TAG_VALUE).len(), 1);
        assert_eq!(report.issues_with_code(codes::MISSING_SOURCES).len(), 3);
        assert_eq!(report.duplicates.len(), 1);
        assert_eq!(report.references.totals().orphaned, 1);
        assert!(report.by_category(Category::Compliance).is_empty());
    }

    #[test]
    fn test_coverage() {
        let report = analyzer().analyze(&sample());
        assert_eq!(report.coverage.birth_date, 1.0);
        assert_eq!(report.coverage.sources, 0.0);
        assert_eq!(report.coverage.names, 1.0);
    }

    #[test]
    fn test_empty_document_coverage_is_zero() {
        let report = QualityAnalyzer::default().analyze(&Document::new(None));
        assert_eq!(report.coverage.birth_date, 0.0);
        assert_eq!(report.coverage.death_date, 0.0);
        assert_eq!(report.coverage.sources, 0.0);
        assert_eq!(report.coverage.places, 0.0);
        assert_eq!(report.coverage.names, 0.0);
        assert!(report.issues().is_empty());
    }

    #[test]
    fn test_tag_escalation() {
        let plain = analyzer().analyze(&sample());
        let value = plain.issues_with_code(codes::INVALID_TAG_VALUE)[0];
        assert_eq!(value.severity(), Severity::Warning);

        let escalated = analyzer().with_tag_escalation(true).analyze(&sample());
        let value = escalated.issues_with_code(codes::INVALID_TAG_VALUE)[0];
        assert_eq!(value.severity(), Severity::Error);
    }

    #[test]
    fn test_duplicates_can_be_disabled() {
        let config = ValidatorConfig {
            check_duplicates: false,
            ..ValidatorConfig::default()
        };
        let report = QualityAnalyzer::new(&config).analyze(&sample());
        assert!(report.duplicates.is_empty());
        assert!(report.issues_with_code(codes::POTENTIAL_DUPLICATE).is_empty());
    }
}
