//! Parsed lineage document model.
//!
//! Tokenizing raw files and parsing calendar dates happen upstream; this crate
//! holds the already-parsed shape the validation engine consumes: records
//! linked by cross-reference identifiers, comparable dates, the header, and a
//! flat line view of every record for structural checks.

pub mod date;
pub mod document;
pub mod record;


#[cfg(test)]
mod document_tests;

// Re-export commonly used types
pub use date::{Date, DateError};
pub use document::{Document, HEADER_ID, Header};
pub use lineage_xref::FormatVersion;
pub use record::{
    Event, Family, Individual, Line, Note, PersonalName, Record, RecordKind, Repository, Sex,
    Source, TAG_BIRTH, TAG_DEATH, TAG_MARRIAGE,
};
