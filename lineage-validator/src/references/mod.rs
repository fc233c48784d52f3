//! Referential integrity.
//!
//! Two execution modes share one definition of "outgoing reference":
//! - `batch`: resolves every reference against a complete document's index
//! - `streaming`: sees one record at a time and resolves in a final pass
//!
//! Because both walk [`outgoing_references`] and build findings through the
//! same constructors, they report the same `(code, record, related)` triples
//! for any document.

pub mod batch;
pub mod streaming;

use std::borrow::Cow;
use std::fmt;

use lineage::{Record, RecordKind};
use lineage_xref::VOID_POINTER;
use serde::Serialize;

use crate::issue::{Issue, codes};

/// The kind of link a reference encodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Relation {
    #[serde(rename = "FAMC")]
    FamilyChild,
    #[serde(rename = "FAMS")]
    FamilySpouse,
    #[serde(rename = "SOUR")]
    Source,
    #[serde(rename = "HUSB")]
    Husband,
    #[serde(rename = "WIFE")]
    Wife,
    #[serde(rename = "CHIL")]
    Child,
    #[serde(rename = "NOTE")]
    Note,
    #[serde(rename = "ASSO")]
    Association,
    #[serde(rename = "REPO")]
    Repository,
}

impl Relation {
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::FamilyChild => "FAMC",
            Self::FamilySpouse => "FAMS",
            Self::Source => "SOUR",
            Self::Husband => "HUSB",
            Self::Wife => "WIFE",
            Self::Child => "CHIL",
            Self::Note => "NOTE",
            Self::Association => "ASSO",
            Self::Repository => "REPO",
        }
    }

    /// Issue code for a dangling reference of this kind. Relations without a
    /// dedicated code get `ORPHANED_<TAG>`.
    #[must_use]
    pub fn orphan_code(self) -> Cow<'static, str> {
        match self {
            Self::FamilyChild => Cow::Borrowed(codes::ORPHANED_FAMC),
            Self::FamilySpouse => Cow::Borrowed(codes::ORPHANED_FAMS),
            Self::Source => Cow::Borrowed(codes::ORPHANED_SOUR),
            Self::Husband => Cow::Borrowed(codes::ORPHANED_HUSB),
            Self::Wife => Cow::Borrowed(codes::ORPHANED_WIFE),
            Self::Child => Cow::Borrowed(codes::ORPHANED_CHIL),
            Self::Note | Self::Association | Self::Repository => {
                Cow::Owned(format!("ORPHANED_{}", self.tag()))
            }
        }
    }

    /// The record kind a reference of this relation must resolve to.
    #[must_use]
    pub fn target_kind(self) -> RecordKind {
        match self {
            Self::FamilyChild | Self::FamilySpouse => RecordKind::Family,
            Self::Source => RecordKind::Source,
            Self::Husband | Self::Wife | Self::Child | Self::Association => {
                RecordKind::Individual
            }
            Self::Note => RecordKind::Note,
            Self::Repository => RecordKind::Repository,
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Self::FamilyChild => "Child-of family",
            Self::FamilySpouse => "Spouse-of family",
            Self::Source => "Source",
            Self::Husband => "Husband",
            Self::Wife => "Wife",
            Self::Child => "Child",
            Self::Note => "Note",
            Self::Association => "Associated individual",
            Self::Repository => "Repository",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// One outgoing reference of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutgoingRef<'a> {
    pub target: &'a str,
    pub relation: Relation,
    /// Position within the repeated field that holds it.
    pub index: usize,
}

/// Where a reference was made, kept so a later-discovered orphan can be
/// attributed to its origin without retaining the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsageLocation {
    pub record_id: String,
    pub record_kind: RecordKind,
    pub relation: Relation,
    pub index: usize,
}

impl UsageLocation {
    /// Field descriptor, e.g. `"FAM.HUSB"`.
    #[must_use]
    pub fn field(&self) -> String {
        field_descriptor(self.record_kind, self.relation)
    }
}

fn field_descriptor(kind: RecordKind, relation: Relation) -> String {
    format!("{}.{}", kind.tag(), relation.tag())
}

fn is_null_reference(target: &str) -> bool {
    target.is_empty() || target == VOID_POINTER
}

fn push_repeated<'a>(
    out: &mut Vec<OutgoingRef<'a>>,
    targets: &'a [String],
    relation: Relation,
) {
    for (index, target) in targets.iter().enumerate() {
        if !is_null_reference(target) {
            out.push(OutgoingRef {
                target,
                relation,
                index,
            });
        }
    }
}

fn push_single<'a>(out: &mut Vec<OutgoingRef<'a>>, target: Option<&'a str>, relation: Relation) {
    if let Some(target) = target.filter(|t| !is_null_reference(t)) {
        out.push(OutgoingRef {
            target,
            relation,
            index: 0,
        });
    }
}

/// Every non-empty outgoing reference of a record, in field order.
///
/// Empty references and the null pointer are not references at all.
#[must_use]
pub fn outgoing_references(record: Record<'_>) -> Vec<OutgoingRef<'_>> {
    let mut out = Vec::new();
    match record {
        Record::Individual(i) => {
            push_repeated(&mut out, &i.famc, Relation::FamilyChild);
            push_repeated(&mut out, &i.fams, Relation::FamilySpouse);
            push_repeated(&mut out, &i.sources, Relation::Source);
            push_repeated(&mut out, &i.associations, Relation::Association);
        }
        Record::Family(f) => {
            push_single(&mut out, f.husband.as_deref(), Relation::Husband);
            push_single(&mut out, f.wife.as_deref(), Relation::Wife);
            push_repeated(&mut out, &f.children, Relation::Child);
            push_repeated(&mut out, &f.sources, Relation::Source);
        }
        Record::Source(s) => {
            push_single(&mut out, s.repository.as_deref(), Relation::Repository);
        }
        Record::Note(_) | Record::Repository(_) => {}
    }
    push_repeated(&mut out, record.notes(), Relation::Note);
    out
}

fn orphan_issue(
    record_id: &str,
    record_kind: RecordKind,
    relation: Relation,
    target: &str,
    index: usize,
) -> Issue {
    Issue::error(
        relation.orphan_code(),
        format!(
            "{} {target} referenced by {record_id} does not exist",
            relation.describe()
        ),
        record_id,
    )
    .with_related(target)
    .with_detail("field", field_descriptor(record_kind, relation))
    .with_detail("index", index)
}

fn mismatch_issue(
    record_id: &str,
    record_kind: RecordKind,
    relation: Relation,
    target: &str,
    index: usize,
    actual: RecordKind,
) -> Issue {
    Issue::error(
        codes::REFERENCE_TYPE_MISMATCH,
        format!(
            "{} {target} referenced by {record_id} is a {actual} record, expected {}",
            relation.describe(),
            relation.target_kind()
        ),
        record_id,
    )
    .with_related(target)
    .with_detail("field", field_descriptor(record_kind, relation))
    .with_detail("index", index)
    .with_detail("expected", relation.target_kind())
    .with_detail("actual", actual)
}
