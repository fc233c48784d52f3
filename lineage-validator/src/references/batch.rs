//! Full-document reference validation.

use std::collections::BTreeMap;

use lineage::Document;
use serde::Serialize;

use crate::issue::Issue;
use crate::references::{Relation, mismatch_issue, orphan_issue, outgoing_references};

/// Reference counts for one relation kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RelationTally {
    pub total: usize,
    pub valid: usize,
    pub orphaned: usize,
    /// Resolved, but to a record of the wrong kind.
    pub mismatched: usize,
}

impl RelationTally {
    fn add(&mut self, other: &Self) {
        self.total += other.total;
        self.valid += other.valid;
        self.orphaned += other.orphaned;
        self.mismatched += other.mismatched;
    }
}

/// Reference health tallies; raises no issues.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReferenceReport {
    pub relations: BTreeMap<Relation, RelationTally>,
}

impl ReferenceReport {
    #[must_use]
    pub fn totals(&self) -> RelationTally {
        let mut totals = RelationTally::default();
        for tally in self.relations.values() {
            totals.add(tally);
        }
        totals
    }

    #[must_use]
    pub fn get(&self, relation: Relation) -> RelationTally {
        self.relations.get(&relation).copied().unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct ReferenceValidator {
    check_kinds: bool,
}

impl Default for ReferenceValidator {
    fn default() -> Self {
        Self { check_kinds: true }
    }
}

impl ReferenceValidator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Also report references that resolve to the wrong kind of record.
    #[must_use]
    pub fn with_kind_checks(mut self, enabled: bool) -> Self {
        self.check_kinds = enabled;
        self
    }

    /// One error per reference that does not resolve (or resolves to the
    /// wrong kind of record), in document order.
    #[must_use]
    pub fn validate(&self, doc: &Document) -> Vec<Issue> {
        let mut issues = Vec::new();
        let mut checked: usize = 0;

        for record in doc.records() {
            let record_id = record.xref();
            let record_kind = record.kind();
            for reference in outgoing_references(record) {
                checked += 1;
                match doc.kind_of(reference.target) {
                    None => issues.push(orphan_issue(
                        record_id,
                        record_kind,
                        reference.relation,
                        reference.target,
                        reference.index,
                    )),
                    Some(actual)
                        if self.check_kinds && actual != reference.relation.target_kind() =>
                    {
                        issues.push(mismatch_issue(
                            record_id,
                            record_kind,
                            reference.relation,
                            reference.target,
                            reference.index,
                            actual,
                        ));
                    }
                    Some(_) => {}
                }
            }
        }

        tracing::debug!(references = checked, issues = issues.len(), "batch reference pass complete");
        issues
    }

    /// Tally total, valid, orphaned and mismatched references per relation.
    #[must_use]
    pub fn report(&self, doc: &Document) -> ReferenceReport {
        let mut report = ReferenceReport::default();
        for record in doc.records() {
            for reference in outgoing_references(record) {
                let tally = report.relations.entry(reference.relation).or_default();
                tally.total += 1;
                match doc.kind_of(reference.target) {
                    None => tally.orphaned += 1,
                    Some(actual)
                        if self.check_kinds && actual != reference.relation.target_kind() =>
                    {
                        tally.mismatched += 1;
                    }
                    Some(_) => tally.valid += 1,
                }
            }
        }
        report
    }
}
