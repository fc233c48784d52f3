//! Incremental reference validation with deferred resolution.
//!
//! Records arrive one at a time and may reference identifiers declared later
//! in the stream. The validator keeps three identifier-keyed indices and
//! reconciles them in [`StreamingValidator::finalize`]:
//!
//! - `declared`: every identifier a record has declared
//! - `declared_kinds`: the kind of record that first declared it
//! - `referenced`: target identifier -> every place it was referenced
//!
//! Map entries grow with the number of distinct identifiers, not with the
//! number of records or references: a source cited by 100 000 individuals is
//! one `referenced` entry holding 100 000 usage locations.

use std::collections::{HashMap, HashSet};

use lineage::{Document, Record, RecordKind};

use crate::config::DateLogicConfig;
use crate::issue::Issue;
use crate::references::{UsageLocation, mismatch_issue, orphan_issue, outgoing_references};
use crate::rules::date_logic::DateLogicValidator;

#[derive(Debug, Clone)]
pub struct StreamingValidator {
    declared: HashSet<String>,
    declared_kinds: HashMap<String, RecordKind>,
    referenced: HashMap<String, Vec<UsageLocation>>,
    date_logic: DateLogicValidator,
    check_kinds: bool,
    records_seen: usize,
}

impl Default for StreamingValidator {
    fn default() -> Self {
        Self::new(DateLogicConfig::default())
    }
}

impl StreamingValidator {
    #[must_use]
    pub fn new(date_logic: DateLogicConfig) -> Self {
        Self {
            declared: HashSet::new(),
            declared_kinds: HashMap::new(),
            referenced: HashMap::new(),
            date_logic: DateLogicValidator::new(date_logic),
            check_kinds: true,
            records_seen: 0,
        }
    }

    /// Also report references that resolve to the wrong kind of record.
    #[must_use]
    pub fn with_kind_checks(mut self, enabled: bool) -> Self {
        self.check_kinds = enabled;
        self
    }

    /// Register one record and return the findings that need no other record.
    ///
    /// Only the identifiers and usage locations are retained; the record
    /// itself may be dropped as soon as this returns.
    pub fn process_record(&mut self, record: Record<'_>) -> Vec<Issue> {
        self.records_seen += 1;
        let record_id = record.xref();
        let record_kind = record.kind();

        if !record_id.is_empty() && self.declared.insert(record_id.to_owned()) {
            self.declared_kinds.insert(record_id.to_owned(), record_kind);
        }

        for reference in outgoing_references(record) {
            let usage = UsageLocation {
                record_id: record_id.to_owned(),
                record_kind,
                relation: reference.relation,
                index: reference.index,
            };
            if let Some(usages) = self.referenced.get_mut(reference.target) {
                usages.push(usage);
            } else {
                self.referenced
                    .insert(reference.target.to_owned(), vec![usage]);
            }
        }

        let issues = if let Record::Individual(individual) = record {
            self.date_logic.check_individual(individual)
        } else {
            Vec::new()
        };
        tracing::trace!(record = record_id, issues = issues.len(), "streamed record");
        issues
    }

    /// Stream every record of a document, in document order.
    pub fn process_document(&mut self, doc: &Document) -> Vec<Issue> {
        doc.records()
            .flat_map(|record| self.process_record(record))
            .collect()
    }

    /// Resolve every recorded reference against everything declared so far.
    ///
    /// Produces one issue per usage location of each undeclared identifier
    /// (and, with kind checks on, per usage of a wrongly-typed one). Output
    /// is ordered by target identifier, then by usage order.
    #[must_use]
    pub fn finalize(&self) -> Vec<Issue> {
        let mut targets: Vec<&String> = self.referenced.keys().collect();
        targets.sort();

        let mut issues = Vec::new();
        for target in targets {
            let Some(usages) = self.referenced.get(target) else {
                continue;
            };
            if !self.declared.contains(target) {
                issues.extend(usages.iter().map(|u| {
                    orphan_issue(&u.record_id, u.record_kind, u.relation, target, u.index)
                }));
                continue;
            }
            if !self.check_kinds {
                continue;
            }
            let Some(&actual) = self.declared_kinds.get(target) else {
                continue;
            };
            issues.extend(
                usages
                    .iter()
                    .filter(|u| u.relation.target_kind() != actual)
                    .map(|u| {
                        mismatch_issue(
                            &u.record_id,
                            u.record_kind,
                            u.relation,
                            target,
                            u.index,
                            actual,
                        )
                    }),
            );
        }

        tracing::debug!(
            records = self.records_seen,
            declared = self.declared.len(),
            referenced = self.referenced.len(),
            issues = issues.len(),
            "streaming reference pass finalized"
        );
        issues
    }

    /// Forget everything, keeping allocated capacity for the next stream.
    pub fn reset(&mut self) {
        self.declared.clear();
        self.declared_kinds.clear();
        self.referenced.clear();
        self.records_seen = 0;
    }

    #[must_use]
    pub fn records_seen(&self) -> usize {
        self.records_seen
    }

    #[must_use]
    pub fn declared_count(&self) -> usize {
        self.declared.len()
    }

    /// Number of distinct identifiers referenced so far.
    #[must_use]
    pub fn referenced_count(&self) -> usize {
        self.referenced.len()
    }

    #[must_use]
    pub fn usage_count(&self, xref: &str) -> usize {
        self.referenced.get(xref).map_or(0, Vec::len)
    }

    #[must_use]
    pub fn usages(&self, xref: &str) -> &[UsageLocation] {
        match self.referenced.get(xref) {
            Some(usages) => usages,
            None => &[],
        }
    }

    #[must_use]
    pub fn is_declared(&self, xref: &str) -> bool {
        self.declared.contains(xref)
    }
}
