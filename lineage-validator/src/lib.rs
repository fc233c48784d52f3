//! # lineage-validator
//!
//! Validation engine for parsed lineage documents: chronology, referential
//! integrity, duplicate individuals, vendor custom tags, format-version
//! compliance and data completeness.
//!
//! Every pass returns [`Issue`] values; nothing a document contains is ever
//! turned into an `Err`. The [`Validator`] facade runs the passes from one
//! [`ValidatorConfig`] and filters the findings by [`Strictness`].
//!
//! ## Quick Start
//!
//! ```rust
//! use lineage::{Document, Family};
//! use lineage_validator::{Validator, codes};
//!
//! let doc = Document::new(None).with_family(Family::new("@F1@").with_husband("@I999@"));
//!
//! let mut validator = Validator::default();
//! let issues = validator.validate(Some(&doc));
//! assert!(issues.iter().any(|i| i.code() == codes::ORPHANED_HUSB));
//! ```
//!
//! For documents too large to hold at once, feed records one by one to a
//! [`StreamingValidator`] and call [`StreamingValidator::finalize`] at the end.

pub mod compliance;
mod config;
mod error;
mod issue;
pub mod output;
mod quality;
pub mod references;
mod report;
pub mod rules;
pub mod tags;
mod validator;

pub use config::{
    DEFAULT_MAX_FATHER_AGE, DEFAULT_MAX_LIFESPAN, DEFAULT_MAX_MOTHER_AGE, DEFAULT_MIN_PARENT_AGE,
    DateLogicConfig, DuplicateConfig, Strictness, TagConfig, ValidatorConfig,
};
pub use error::{TagRegistryError, ValidationError};
pub use issue::{Issue, Severity, codes, filter_by_code, filter_by_severity, sort_by_severity};
pub use quality::{QualityAnalyzer, escalate_tag_violations};
pub use references::Relation;
pub use references::batch::{ReferenceReport, ReferenceValidator, RelationTally};
pub use references::streaming::StreamingValidator;
pub use report::{Category, Coverage, EntityCounts, IssueSummary, QualityReport};
pub use rules::date_logic::DateLogicValidator;
pub use rules::duplicates::{DuplicateDetector, DuplicatePair};
pub use tags::{TagDefinition, TagRegistry, TagValidator, Vendor};
pub use validator::Validator;
