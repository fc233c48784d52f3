//! Data completeness: which individuals lack the facts researchers expect.

use lineage::{Document, Individual};

use crate::issue::{Issue, codes};
use crate::report::Coverage;

/// `count / total`, or exactly `0.0` when there is nothing to divide by.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn ratio(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

fn has_name(individual: &Individual) -> bool {
    individual.names.iter().any(|n| !n.is_empty())
}

fn has_place(individual: &Individual) -> bool {
    individual.events.iter().any(lineage::Event::has_place)
}

/// Coverage ratios plus one info issue per missing name, birth date or
/// source citation.
#[must_use]
pub fn check_completeness(doc: &Document) -> (Coverage, Vec<Issue>) {
    let individuals = doc.individuals();
    let total = individuals.len();
    let mut issues = Vec::new();
    let (mut births, mut deaths, mut sourced, mut placed, mut named) = (0, 0, 0, 0, 0);

    for individual in individuals {
        let xref = individual.xref.as_str();

        if has_name(individual) {
            named += 1;
        } else {
            issues.push(Issue::info(codes::MISSING_NAME, "Individual has no name", xref));
        }

        if individual.birth_date().is_some() {
            births += 1;
        } else {
            issues.push(Issue::info(
                codes::MISSING_BIRTH_DATE,
                "Individual has no birth date",
                xref,
            ));
        }

        if individual.death_date().is_some() {
            deaths += 1;
        }

        if individual.sources.iter().any(|s| !s.is_empty()) {
            sourced += 1;
        } else {
            issues.push(Issue::info(
                codes::MISSING_SOURCES,
                "Individual cites no sources",
                xref,
            ));
        }

        if has_place(individual) {
            placed += 1;
        }
    }

    let coverage = Coverage {
        birth_date: ratio(births, total),
        death_date: ratio(deaths, total),
        sources: ratio(sourced, total),
        places: ratio(placed, total),
        names: ratio(named, total),
    };
    tracing::debug!(individuals = total, issues = issues.len(), "completeness pass complete");
    (coverage, issues)
}
