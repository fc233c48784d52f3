//! Chronological consistency checks.
//!
//! Every check is skipped, never failed, when a date it needs is absent or
//! lacks a year: such a date cannot be compared.

use std::collections::HashSet;

use lineage::{Date, Document, Individual, Sex};

use crate::config::DateLogicConfig;
use crate::issue::{Issue, codes};

#[derive(Debug, Clone, Default)]
pub struct DateLogicValidator {
    config: DateLogicConfig,
}

fn dated(date: Option<Date>) -> Option<Date> {
    date.filter(Date::has_year)
}

impl DateLogicValidator {
    #[must_use]
    pub fn new(config: DateLogicConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &DateLogicConfig {
        &self.config
    }

    /// Checks that need nothing but the individual's own record:
    /// death before birth and implausible lifespan.
    #[must_use]
    pub fn check_individual(&self, individual: &Individual) -> Vec<Issue> {
        let mut issues = Vec::new();
        let (Some(birth), Some(death)) = (
            dated(individual.birth_date()),
            dated(individual.death_date()),
        ) else {
            return issues;
        };

        if death.is_before(&birth) == Some(true) {
            issues.push(
                Issue::error(
                    codes::DEATH_BEFORE_BIRTH,
                    format!("Death ({death}) occurs before birth ({birth})"),
                    &individual.xref,
                )
                .with_detail("birth", birth)
                .with_detail("death", death),
            );
        }

        if let Ok(years) = birth.years_between(&death)
            && years > self.config.max_lifespan()
        {
            issues.push(
                Issue::warning(
                    codes::UNREASONABLE_LIFESPAN,
                    format!(
                        "Lifespan of {years} years exceeds the maximum of {}",
                        self.config.max_lifespan()
                    ),
                    &individual.xref,
                )
                .with_detail("years", years)
                .with_detail("max", self.config.max_lifespan()),
            );
        }

        issues
    }

    /// Checks against linked records: parents' births and spousal marriages.
    #[must_use]
    pub fn check_relations(&self, individual: &Individual, doc: &Document) -> Vec<Issue> {
        let mut issues = Vec::new();
        let Some(birth) = dated(individual.birth_date()) else {
            return issues;
        };

        let mut seen_parents = HashSet::new();
        for family in individual.famc.iter().filter_map(|id| doc.family(id)) {
            for parent_id in family.parents() {
                if !seen_parents.insert(parent_id) {
                    continue;
                }
                if let Some(parent) = doc.individual(parent_id) {
                    self.check_parent(individual, birth, parent, &mut issues);
                }
            }
        }

        for family in individual.fams.iter().filter_map(|id| doc.family(id)) {
            let Some(marriage) = dated(family.marriage_date()) else {
                continue;
            };
            if marriage.is_before(&birth) == Some(true) {
                issues.push(
                    Issue::error(
                        codes::MARRIAGE_BEFORE_BIRTH,
                        format!("Marriage ({marriage}) occurs before birth ({birth})"),
                        &individual.xref,
                    )
                    .with_related(&family.xref)
                    .with_detail("birth", birth)
                    .with_detail("marriage", marriage),
                );
            }
        }

        issues
    }

    fn check_parent(
        &self,
        child: &Individual,
        child_birth: Date,
        parent: &Individual,
        issues: &mut Vec<Issue>,
    ) {
        let Some(parent_birth) = dated(parent.birth_date()) else {
            return;
        };

        if child_birth.is_before(&parent_birth) == Some(true) {
            issues.push(
                Issue::error(
                    codes::CHILD_BEFORE_PARENT,
                    format!("Born ({child_birth}) before parent's birth ({parent_birth})"),
                    &child.xref,
                )
                .with_related(&parent.xref)
                .with_detail("child_birth", child_birth)
                .with_detail("parent_birth", parent_birth),
            );
        }

        let Ok(age) = parent_birth.years_between(&child_birth) else {
            return;
        };
        let min = self.config.min_parent_age();
        let max = if parent.sex == Sex::Female {
            self.config.max_mother_age()
        } else {
            self.config.max_father_age()
        };

        if age < min {
            issues.push(
                Issue::warning(
                    codes::UNREASONABLE_PARENT_AGE,
                    format!("Parent was {age} at child's birth (minimum {min})"),
                    &child.xref,
                )
                .with_related(&parent.xref)
                .with_detail("age", age)
                .with_detail("min", min),
            );
        }
        if age > max {
            issues.push(
                Issue::warning(
                    codes::UNREASONABLE_PARENT_AGE,
                    format!("Parent was {age} at child's birth (maximum {max})"),
                    &child.xref,
                )
                .with_related(&parent.xref)
                .with_detail("age", age)
                .with_detail("max", max),
            );
        }
    }

    #[must_use]
    pub fn validate_individual(&self, individual: &Individual, doc: &Document) -> Vec<Issue> {
        let mut issues = self.check_individual(individual);
        issues.extend(self.check_relations(individual, doc));
        issues
    }

    #[must_use]
    pub fn validate_document(&self, doc: &Document) -> Vec<Issue> {
        let issues: Vec<Issue> = doc
            .individuals()
            .iter()
            .flat_map(|individual| self.validate_individual(individual, doc))
            .collect();
        tracing::debug!(
            individuals = doc.individuals().len(),
            issues = issues.len(),
            "date logic pass complete"
        );
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lineage::Family;

    fn person(xref: &str, birth: Option<i32>, death: Option<i32>) -> Individual {
        let mut p = Individual::new(xref);
        if let Some(y) = birth {
            p = p.with_birth(Date::from_year(y));
        }
        if let Some(y) = death {
            p = p.with_death(Date::from_year(y));
        }
        p
    }

    fn codes_of(issues: &[Issue]) -> Vec<&str> {
        issues.iter().map(Issue::code).collect()
    }

    #[test]
    fn test_death_before_birth() {
        let v = DateLogicValidator::default();
        let issues = v.check_individual(&person("@I1@", Some(1950), Some(1940)));
        assert_eq!(codes_of(&issues), vec![codes::DEATH_BEFORE_BIRTH]);
        assert_eq!(issues[0].record_id(), "@I1@");
    }

    #[test]
    fn test_same_year_death_is_not_before_birth() {
        let v = DateLogicValidator::default();
        assert!(v.check_individual(&person("@I1@", Some(1950), Some(1950))).is_empty());
    }

    #[test]
    fn test_missing_year_skips_checks() {
        let v = DateLogicValidator::default();
        let p = Individual::new("@I1@")
            .with_birth(Date::new(0, 3, 4))
            .with_death(Date::from_year(1700));
        assert!(v.check_individual(&p).is_empty());
        assert!(v.check_individual(&person("@I2@", None, Some(1700))).is_empty());
    }

    #[test]
    fn test_lifespan_boundary_allowed() {
        let v = DateLogicValidator::default();
        assert!(v.check_individual(&person("@I1@", Some(1800), Some(1920))).is_empty());

        let issues = v.check_individual(&person("@I1@", Some(1800), Some(1921)));
        assert_eq!(codes_of(&issues), vec![codes::UNREASONABLE_LIFESPAN]);
        assert_eq!(issues[0].detail("years"), Some("121"));
    }

    #[test]
    fn test_custom_lifespan() {
        let config = DateLogicConfig {
            max_lifespan: Some(90),
            ..DateLogicConfig::default()
        };
        let v = DateLogicValidator::new(config);
        let issues = v.check_individual(&person("@I1@", Some(1800), Some(1895)));
        assert_eq!(codes_of(&issues), vec![codes::UNREASONABLE_LIFESPAN]);
    }

    #[test]
    fn test_extreme_years_do_not_overflow() {
        let v = DateLogicValidator::default();
        assert!(
            v.check_individual(&person("@I1@", Some(-2_000_000_000), Some(2_000_000_000)))
                .is_empty()
        );

        let doc = family_doc(2_000_000_000, 1940, -2_000_000_000);
        let child = doc.individual("@C@").unwrap_or_else(|| panic!("child"));
        let issues = v.check_relations(child, &doc);
        let before = issues
            .iter()
            .filter(|i| i.code() == codes::CHILD_BEFORE_PARENT)
            .count();
        assert_eq!(before, 2);
    }

    fn family_doc(mother_birth: i32, father_birth: i32, child_birth: i32) -> Document {
        Document::new(None)
            .with_individual(
                person("@M@", Some(mother_birth), None)
                    .with_sex(Sex::Female)
                    .spouse_in("@F1@"),
            )
            .with_individual(
                person("@D@", Some(father_birth), None)
                    .with_sex(Sex::Male)
                    .spouse_in("@F1@"),
            )
            .with_individual(person("@C@", Some(child_birth), None).child_of("@F1@"))
            .with_family(
                Family::new("@F1@")
                    .with_husband("@D@")
                    .with_wife("@M@")
                    .with_child("@C@"),
            )
    }

    #[test]
    fn test_young_mother_warning() {
        let doc = family_doc(1950, 1940, 1960);
        let v = DateLogicValidator::default();
        let child = doc.individual("@C@").unwrap_or_else(|| panic!("child"));
        let issues = v.check_relations(child, &doc);

        assert_eq!(codes_of(&issues), vec![codes::UNREASONABLE_PARENT_AGE]);
        assert_eq!(issues[0].related_id(), Some("@M@"));
        assert_eq!(issues[0].severity(), crate::Severity::Warning);
    }

    #[test]
    fn test_child_before_parent_once_per_parent() {
        let doc = family_doc(1970, 1975, 1960);
        let v = DateLogicValidator::default();
        let child = doc.individual("@C@").unwrap_or_else(|| panic!("child"));
        let issues = v.check_relations(child, &doc);

        let before: Vec<&Issue> = issues
            .iter()
            .filter(|i| i.code() == codes::CHILD_BEFORE_PARENT)
            .collect();
        assert_eq!(before.len(), 2);
        let related: HashSet<_> = before.iter().filter_map(|i| i.related_id()).collect();
        assert_eq!(related, HashSet::from(["@M@", "@D@"]));
    }

    #[test]
    fn test_sex_specific_max_age() {
        // Mother 60, father 60: only the mother exceeds her threshold.
        let doc = family_doc(1900, 1900, 1960);
        let v = DateLogicValidator::default();
        let child = doc.individual("@C@").unwrap_or_else(|| panic!("child"));
        let issues = v.check_relations(child, &doc);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].related_id(), Some("@M@"));
        assert_eq!(issues[0].detail("max"), Some("55"));
    }

    #[test]
    fn test_unknown_sex_uses_father_threshold() {
        let doc = Document::new(None)
            .with_individual(person("@P@", Some(1880), None))
            .with_individual(person("@C@", Some(1950), None).child_of("@F1@"))
            .with_family(Family::new("@F1@").with_wife("@P@").with_child("@C@"));
        let v = DateLogicValidator::default();
        let child = doc.individual("@C@").unwrap_or_else(|| panic!("child"));
        // 70 is over the mother limit but under the father limit.
        assert!(v.check_relations(child, &doc).is_empty());
    }

    #[test]
    fn test_marriage_before_birth() {
        let doc = Document::new(None)
            .with_individual(person("@I1@", Some(1900), None).spouse_in("@F1@"))
            .with_family(
                Family::new("@F1@")
                    .with_husband("@I1@")
                    .with_marriage(Date::from_year(1890)),
            );
        let v = DateLogicValidator::default();
        let issues = v.validate_document(&doc);
        assert_eq!(codes_of(&issues), vec![codes::MARRIAGE_BEFORE_BIRTH]);
        assert_eq!(issues[0].related_id(), Some("@F1@"));
    }

    #[test]
    fn test_unresolvable_links_are_skipped() {
        let doc = Document::new(None).with_individual(
            person("@I1@", Some(1900), None)
                .child_of("@F404@")
                .spouse_in("@F405@"),
        );
        assert!(DateLogicValidator::default().validate_document(&doc).is_empty());
    }
}
