//! Potential duplicate individuals.
//!
//! Individuals are bucketed by normalized surname and every unordered pair
//! inside a bucket is scored. The score only ever grows with evidence; a
//! missing fact contributes nothing rather than counting against the pair.

use std::collections::BTreeMap;

use lineage::{Document, Individual};
use serde::Serialize;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::config::DuplicateConfig;
use crate::issue::{Issue, codes};

const SURNAME_WEIGHT: f64 = 0.3;
const GIVEN_NAME_WEIGHT: f64 = 0.3;
const SAME_BIRTH_YEAR_WEIGHT: f64 = 0.2;
const NEAR_BIRTH_YEAR_WEIGHT: f64 = 0.1;
const SAME_SEX_WEIGHT: f64 = 0.1;

/// Two individuals that may describe the same person.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicatePair {
    pub individual1: String,
    pub individual2: String,
    /// Additive evidence score in `[0, 1]`.
    pub confidence: f64,
    /// Given-name similarity in `[0, 1]`.
    pub name_similarity: f64,
    /// Evidence, in the order it was found.
    pub reasons: Vec<String>,
}

impl DuplicatePair {
    #[must_use]
    pub fn to_issue(&self) -> Issue {
        Issue::info(
            codes::POTENTIAL_DUPLICATE,
            format!(
                "Possible duplicate of {} (confidence {:.2})",
                self.individual2, self.confidence
            ),
            &self.individual1,
        )
        .with_related(&self.individual2)
        .with_detail("confidence", format!("{:.2}", self.confidence))
        .with_detail("reasons", self.reasons.join("; "))
    }
}

/// Trim, strip diacritics, case-fold and collapse inner whitespace.
#[must_use]
pub fn normalize_name(raw: &str) -> String {
    let stripped: String = raw.nfd().filter(|c| !is_combining_mark(*c)).collect();
    stripped
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// `1 - edit_distance / max_len` over code points; identical strings score 1.
#[must_use]
pub fn name_similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    strsim::normalized_levenshtein(a, b)
}

fn surname_key(individual: &Individual) -> Option<String> {
    let key = normalize_name(individual.primary_name()?.surname()?);
    (!key.is_empty()).then_some(key)
}

fn given_key(individual: &Individual) -> String {
    individual
        .primary_name()
        .map_or_else(String::new, |n| normalize_name(n.given_name()))
}

#[derive(Debug, Clone, Default)]
pub struct DuplicateDetector {
    config: DuplicateConfig,
}

impl DuplicateDetector {
    #[must_use]
    pub fn new(config: DuplicateConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &DuplicateConfig {
        &self.config
    }

    /// Score a pair. `None` unless both share a normalized surname and the
    /// pair clears every configured gate.
    #[must_use]
    pub fn score(&self, a: &Individual, b: &Individual) -> Option<DuplicatePair> {
        let surname = surname_key(a)?;
        if surname_key(b)? != surname {
            return None;
        }
        self.score_within_group(a, b)
    }

    fn score_within_group(&self, a: &Individual, b: &Individual) -> Option<DuplicatePair> {
        if self.config.require_birth_date && (a.birth_date().is_none() || b.birth_date().is_none())
        {
            return None;
        }

        let mut confidence = SURNAME_WEIGHT;
        let mut reasons = vec!["same surname".to_owned()];

        let similarity = name_similarity(&given_key(a), &given_key(b));
        if similarity < self.config.min_name_similarity {
            return None;
        }
        confidence += GIVEN_NAME_WEIGHT * similarity;
        if similarity >= 1.0 {
            reasons.push("same given name".to_owned());
        } else {
            reasons.push("similar given name".to_owned());
        }

        if let (Some(year_a), Some(year_b)) = (a.birth_year(), b.birth_year()) {
            let diff = year_a.abs_diff(year_b);
            if diff == 0 {
                confidence += SAME_BIRTH_YEAR_WEIGHT;
                reasons.push("same birth year".to_owned());
            } else if u32::try_from(self.config.max_birth_year_difference)
                .is_ok_and(|max| diff <= max)
            {
                confidence += NEAR_BIRTH_YEAR_WEIGHT;
                reasons.push(format!("birth years {diff} apart"));
            }
        }

        if a.sex.is_specified() && a.sex == b.sex {
            confidence += SAME_SEX_WEIGHT;
            reasons.push("same sex".to_owned());
        }

        let confidence = confidence.min(1.0);
        if confidence < self.config.min_confidence {
            return None;
        }

        Some(DuplicatePair {
            individual1: a.xref.clone(),
            individual2: b.xref.clone(),
            confidence,
            name_similarity: similarity,
            reasons,
        })
    }

    /// Every reportable pair, grouped by surname. Within a pair the earlier
    /// individual in document order comes first.
    #[must_use]
    pub fn find_duplicates(&self, doc: &Document) -> Vec<DuplicatePair> {
        let mut groups: BTreeMap<String, Vec<&Individual>> = BTreeMap::new();
        for individual in doc.individuals() {
            if let Some(key) = surname_key(individual) {
                groups.entry(key).or_default().push(individual);
            }
        }

        let mut pairs = Vec::new();
        let mut comparisons: usize = 0;
        for members in groups.values() {
            for (i, a) in members.iter().enumerate() {
                for b in &members[i + 1..] {
                    comparisons += 1;
                    if let Some(pair) = self.score_within_group(a, b) {
                        pairs.push(pair);
                    }
                }
            }
        }

        tracing::debug!(
            groups = groups.len(),
            comparisons,
            pairs = pairs.len(),
            "duplicate detection complete"
        );
        pairs
    }

    #[must_use]
    pub fn find_duplicate_issues(&self, doc: &Document) -> Vec<Issue> {
        self.find_duplicates(doc)
            .iter()
            .map(DuplicatePair::to_issue)
            .collect()
    }
}
