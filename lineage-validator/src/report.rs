//! Quality report types.

use std::collections::BTreeMap;
use std::fmt;

use lineage::Document;
use serde::Serialize;

use crate::config::Strictness;
use crate::issue::{Issue, Severity};
use crate::references::batch::ReferenceReport;
use crate::rules::duplicates::DuplicatePair;

/// Share of individuals carrying each kind of fact, each in `[0, 1]`.
///
/// Every ratio is exactly `0.0` for a document without individuals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Coverage {
    pub birth_date: f64,
    pub death_date: f64,
    pub sources: f64,
    pub places: f64,
    pub names: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EntityCounts {
    pub individuals: usize,
    pub families: usize,
    pub sources: usize,
    pub notes: usize,
    pub repositories: usize,
}

impl EntityCounts {
    #[must_use]
    pub fn of(doc: &Document) -> Self {
        Self {
            individuals: doc.individuals().len(),
            families: doc.families().len(),
            sources: doc.sources().len(),
            notes: doc.notes().len(),
            repositories: doc.repositories().len(),
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.individuals + self.families + self.sources + self.notes + self.repositories
    }
}

/// The pass that produced an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Compliance,
    DateLogic,
    References,
    Duplicates,
    Tags,
    Completeness,
}

impl Category {
    pub const ALL: [Self; 6] = [
        Self::Compliance,
        Self::DateLogic,
        Self::References,
        Self::Duplicates,
        Self::Tags,
        Self::Completeness,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Compliance => "compliance",
            Self::DateLogic => "date_logic",
            Self::References => "references",
            Self::Duplicates => "duplicates",
            Self::Tags => "tags",
            Self::Completeness => "completeness",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Issue counts by severity and by category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IssueSummary {
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
    pub by_category: BTreeMap<Category, usize>,
}

impl IssueSummary {
    fn tally(issues: &[Issue], categories: &[Category]) -> Self {
        let mut summary = Self::default();
        for issue in issues {
            match issue.severity() {
                Severity::Error => summary.errors += 1,
                Severity::Warning => summary.warnings += 1,
                Severity::Info => summary.infos += 1,
            }
        }
        for category in categories {
            *summary.by_category.entry(*category).or_default() += 1;
        }
        summary
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.errors + self.warnings + self.infos
    }
}

/// Result of a full quality analysis.
///
/// Issues are held severity-sorted (errors first); within one severity they
/// keep the order their passes produced them.
#[derive(Debug, Clone, Serialize)]
#[non_exhaustive]
pub struct QualityReport {
    pub counts: EntityCounts,
    pub coverage: Coverage,
    pub references: ReferenceReport,
    pub duplicates: Vec<DuplicatePair>,
    pub summary: IssueSummary,
    issues: Vec<Issue>,
    #[serde(skip)]
    categories: Vec<Category>,
}

impl QualityReport {
    /// Merge per-pass findings into a severity-sorted report.
    #[must_use]
    pub fn new(
        counts: EntityCounts,
        coverage: Coverage,
        references: ReferenceReport,
        duplicates: Vec<DuplicatePair>,
        passes: Vec<(Category, Vec<Issue>)>,
    ) -> Self {
        let mut tagged: Vec<(Category, Issue)> = passes
            .into_iter()
            .flat_map(|(category, issues)| issues.into_iter().map(move |i| (category, i)))
            .collect();
        tagged.sort_by_key(|(_, issue)| issue.severity());
        let (categories, issues): (Vec<Category>, Vec<Issue>) = tagged.into_iter().unzip();
        let summary = IssueSummary::tally(&issues, &categories);
        Self {
            counts,
            coverage,
            references,
            duplicates,
            summary,
            issues,
            categories,
        }
    }

    /// A report for "no document": zero counts and coverage, no issues.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(
            EntityCounts::default(),
            Coverage::default(),
            ReferenceReport::default(),
            Vec::new(),
            Vec::new(),
        )
    }

    #[must_use]
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(move |i| i.severity() == severity)
    }

    #[must_use]
    pub fn errors(&self) -> Vec<&Issue> {
        self.with_severity(Severity::Error).collect()
    }

    #[must_use]
    pub fn warnings(&self) -> Vec<&Issue> {
        self.with_severity(Severity::Warning).collect()
    }

    #[must_use]
    pub fn infos(&self) -> Vec<&Issue> {
        self.with_severity(Severity::Info).collect()
    }

    #[must_use]
    pub fn by_category(&self, category: Category) -> Vec<&Issue> {
        self.issues
            .iter()
            .zip(&self.categories)
            .filter(|(_, c)| **c == category)
            .map(|(i, _)| i)
            .collect()
    }

    /// Issues whose primary or related record is `xref`.
    #[must_use]
    pub fn issues_for(&self, xref: &str) -> Vec<&Issue> {
        self.issues.iter().filter(|i| i.involves(xref)).collect()
    }

    #[must_use]
    pub fn issues_with_code(&self, code: &str) -> Vec<&Issue> {
        self.issues.iter().filter(|i| i.code() == code).collect()
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.summary.errors > 0
    }

    /// The same report keeping only the issues `strictness` surfaces.
    /// Counts, coverage and tallies are untouched.
    #[must_use]
    pub fn filtered(&self, strictness: Strictness) -> Self {
        let (categories, issues): (Vec<Category>, Vec<Issue>) = self
            .categories
            .iter()
            .zip(&self.issues)
            .filter(|(_, issue)| strictness.allows(issue.severity()))
            .map(|(c, i)| (*c, i.clone()))
            .unzip();
        Self {
            counts: self.counts,
            coverage: self.coverage,
            references: self.references.clone(),
            duplicates: self.duplicates.clone(),
            summary: IssueSummary::tally(&issues, &categories),
            issues,
            categories,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::issue::codes;

    fn report() -> QualityReport {
        QualityReport::new(
            EntityCounts::default(),
            Coverage::default(),
            ReferenceReport::default(),
            Vec::new(),
            vec![
                (
                    Category::Completeness,
                    vec![Issue::info(codes::MISSING_NAME, "no name", "@I2@")],
                ),
                (
                    Category::DateLogic,
                    vec![
                        Issue::warning(codes::UNREASONABLE_LIFESPAN, "130 years", "@I1@"),
                        Issue::error(codes::DEATH_BEFORE_BIRTH, "died first", "@I1@"),
                    ],
                ),
                (
                    Category::References,
                    vec![
                        Issue::error(codes::ORPHANED_HUSB, "missing", "@F1@").with_related("@I1@"),
                    ],
                ),
            ],
        )
    }

    #[test]
    fn test_sorted_by_severity() {
        let report = report();
        let severities: Vec<Severity> = report.issues().iter().map(Issue::severity).collect();
        assert_eq!(
            severities,
            vec![
                Severity::Error,
                Severity::Error,
                Severity::Warning,
                Severity::Info
            ]
        );
        assert_eq!(report.issues()[0].code(), codes::DEATH_BEFORE_BIRTH);
        assert_eq!(report.issues()[1].code(), codes::ORPHANED_HUSB);
    }

    #[test]
    fn test_buckets() {
        let report = report();
        assert_eq!(report.errors().len(), 2);
        assert_eq!(report.warnings().len(), 1);
        assert_eq!(report.infos().len(), 1);
        assert_eq!(report.by_category(Category::DateLogic).len(), 2);
        assert!(report.by_category(Category::Tags).is_empty());
        assert_eq!(report.summary.by_category.get(&Category::References), Some(&1));
        assert_eq!(report.summary.total(), 4);
        assert!(report.has_errors());
    }

    #[test]
    fn test_lookup() {
        let report = report();
        assert_eq!(report.issues_for("@I1@").len(), 3);
        assert_eq!(report.issues_with_code(codes::MISSING_NAME).len(), 1);
    }

    #[test]
    fn test_filtered_keeps_categories_aligned() {
        let relaxed = report().filtered(Strictness::Relaxed);
        assert_eq!(relaxed.issues().len(), 2);
        assert_eq!(relaxed.by_category(Category::References).len(), 1);
        assert_eq!(relaxed.by_category(Category::DateLogic).len(), 1);
        assert_eq!(relaxed.summary.warnings, 0);
    }

    #[test]
    fn test_serializes_issues_and_summary() {
        let json = serde_json::to_value(report()).unwrap();
        assert_eq!(json["issues"].as_array().unwrap().len(), 4);
        assert_eq!(json["summary"]["errors"], 2);
        assert_eq!(json["summary"]["by_category"]["date_logic"], 2);
        assert!(json.get("categories").is_none());
    }
}
