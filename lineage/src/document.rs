//! The document: header, records, and the identifier index.

use std::collections::HashMap;

use lineage_xref::FormatVersion;
use serde::{Deserialize, Serialize};

use crate::record::{Family, Individual, Note, Record, RecordKind, Repository, Source};

/// Record id used for findings about the header itself.
pub const HEADER_ID: &str = "HEAD";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Header {
    /// Declared format version (`GEDC.VERS`).
    pub version: Option<String>,
    /// Declared text encoding (`CHAR`).
    pub encoding: Option<String>,
    /// Producing system (`SOUR`).
    pub source_system: Option<String>,
    /// Submitter pointer (`SUBM`).
    pub submitter: Option<String>,
}

impl Header {
    /// Parsed version, or `None` if the header declares none.
    #[must_use]
    pub fn format_version(&self) -> Option<FormatVersion> {
        self.version
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .map(FormatVersion::parse)
    }
}

/// Serialized shape of a document (no index).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct DocumentParts {
    header: Option<Header>,
    individuals: Vec<Individual>,
    families: Vec<Family>,
    sources: Vec<Source>,
    notes: Vec<Note>,
    repositories: Vec<Repository>,
}

/// A parsed document with O(1) identifier lookup.
///
/// The index maps each identifier to its first declaration in
/// [`Document::records`] order; later declarations of the same identifier are
/// remembered in [`Document::duplicate_xrefs`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "DocumentParts", into = "DocumentParts")]
pub struct Document {
    header: Option<Header>,
    individuals: Vec<Individual>,
    families: Vec<Family>,
    sources: Vec<Source>,
    notes: Vec<Note>,
    repositories: Vec<Repository>,
    index: HashMap<String, (RecordKind, usize)>,
    duplicates: Vec<String>,
}

impl From<DocumentParts> for Document {
    fn from(parts: DocumentParts) -> Self {
        let mut doc = Self {
            header: parts.header,
            individuals: parts.individuals,
            families: parts.families,
            sources: parts.sources,
            notes: parts.notes,
            repositories: parts.repositories,
            index: HashMap::new(),
            duplicates: Vec::new(),
        };
        doc.rebuild_index();
        doc
    }
}

impl From<Document> for DocumentParts {
    fn from(doc: Document) -> Self {
        Self {
            header: doc.header,
            individuals: doc.individuals,
            families: doc.families,
            sources: doc.sources,
            notes: doc.notes,
            repositories: doc.repositories,
        }
    }
}

impl Document {
    #[must_use]
    pub fn new(header: Option<Header>) -> Self {
        Self {
            header,
            ..Self::default()
        }
    }

    fn rebuild_index(&mut self) {
        let mut index = HashMap::new();
        let mut duplicates = Vec::new();
        for (position, record) in self.records_with_position() {
            let xref = record.xref();
            if xref.is_empty() {
                continue;
            }
            if index.contains_key(xref) {
                duplicates.push(xref.to_owned());
            } else {
                index.insert(xref.to_owned(), (record.kind(), position));
            }
        }
        if !duplicates.is_empty() {
            tracing::debug!(count = duplicates.len(), "duplicate identifiers in document");
        }
        self.index = index;
        self.duplicates = duplicates;
    }

    fn records_with_position(&self) -> impl Iterator<Item = (usize, Record<'_>)> {
        self.individuals
            .iter()
            .enumerate()
            .map(|(i, r)| (i, Record::Individual(r)))
            .chain(
                self.families
                    .iter()
                    .enumerate()
                    .map(|(i, r)| (i, Record::Family(r))),
            )
            .chain(
                self.sources
                    .iter()
                    .enumerate()
                    .map(|(i, r)| (i, Record::Source(r))),
            )
            .chain(
                self.notes
                    .iter()
                    .enumerate()
                    .map(|(i, r)| (i, Record::Note(r))),
            )
            .chain(
                self.repositories
                    .iter()
                    .enumerate()
                    .map(|(i, r)| (i, Record::Repository(r))),
            )
    }

    /// Index one declaration. The entry that comes first in [`Document::records`]
    /// order wins, whatever order the records were added in.
    fn register(&mut self, kind: RecordKind, xref: &str, position: usize) {
        if xref.is_empty() {
            return;
        }
        match self.index.get_mut(xref) {
            Some(entry) => {
                if kind < entry.0 {
                    *entry = (kind, position);
                }
                self.duplicates.push(xref.to_owned());
            }
            None => {
                self.index.insert(xref.to_owned(), (kind, position));
            }
        }
    }

    pub fn add_individual(&mut self, individual: Individual) {
        self.register(RecordKind::Individual, &individual.xref, self.individuals.len());
        self.individuals.push(individual);
    }

    pub fn add_family(&mut self, family: Family) {
        self.register(RecordKind::Family, &family.xref, self.families.len());
        self.families.push(family);
    }

    pub fn add_source(&mut self, source: Source) {
        self.register(RecordKind::Source, &source.xref, self.sources.len());
        self.sources.push(source);
    }

    pub fn add_note(&mut self, note: Note) {
        self.register(RecordKind::Note, &note.xref, self.notes.len());
        self.notes.push(note);
    }

    pub fn add_repository(&mut self, repository: Repository) {
        self.register(
            RecordKind::Repository,
            &repository.xref,
            self.repositories.len(),
        );
        self.repositories.push(repository);
    }

    #[must_use]
    pub fn with_individual(mut self, individual: Individual) -> Self {
        self.add_individual(individual);
        self
    }

    #[must_use]
    pub fn with_family(mut self, family: Family) -> Self {
        self.add_family(family);
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: Source) -> Self {
        self.add_source(source);
        self
    }

    #[must_use]
    pub fn header(&self) -> Option<&Header> {
        self.header.as_ref()
    }

    #[must_use]
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    #[must_use]
    pub fn families(&self) -> &[Family] {
        &self.families
    }

    #[must_use]
    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    #[must_use]
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    #[must_use]
    pub fn repositories(&self) -> &[Repository] {
        &self.repositories
    }

    /// All records in document order: individuals, families, sources, notes,
    /// repositories.
    pub fn records(&self) -> impl Iterator<Item = Record<'_>> {
        self.records_with_position().map(|(_, r)| r)
    }

    #[must_use]
    pub fn record_count(&self) -> usize {
        self.individuals.len()
            + self.families.len()
            + self.sources.len()
            + self.notes.len()
            + self.repositories.len()
    }

    #[must_use]
    pub fn contains(&self, xref: &str) -> bool {
        self.index.contains_key(xref)
    }

    #[must_use]
    pub fn kind_of(&self, xref: &str) -> Option<RecordKind> {
        self.index.get(xref).map(|(kind, _)| *kind)
    }

    /// Resolve an identifier to its (first) declaring record.
    #[must_use]
    pub fn lookup(&self, xref: &str) -> Option<Record<'_>> {
        let (kind, position) = *self.index.get(xref)?;
        let record = match kind {
            RecordKind::Individual => Record::Individual(self.individuals.get(position)?),
            RecordKind::Family => Record::Family(self.families.get(position)?),
            RecordKind::Source => Record::Source(self.sources.get(position)?),
            RecordKind::Note => Record::Note(self.notes.get(position)?),
            RecordKind::Repository => Record::Repository(self.repositories.get(position)?),
        };
        Some(record)
    }

    #[must_use]
    pub fn individual(&self, xref: &str) -> Option<&Individual> {
        match self.lookup(xref)? {
            Record::Individual(i) => Some(i),
            _ => None,
        }
    }

    #[must_use]
    pub fn family(&self, xref: &str) -> Option<&Family> {
        match self.lookup(xref)? {
            Record::Family(f) => Some(f),
            _ => None,
        }
    }

    /// Identifiers declared more than once, one entry per extra declaration.
    #[must_use]
    pub fn duplicate_xrefs(&self) -> &[String] {
        &self.duplicates
    }
}
