//! Error types for lineage validation.

use serde::Serialize;
use thiserror::Error;

use crate::issue::{Issue, Severity};

/// Failures while building a tag registry.
#[derive(Debug, Error)]
pub enum TagRegistryError {
    /// A tag with this name is already registered.
    #[error("tag {0} is already registered")]
    DuplicateTag(String),

    /// Custom tag names must start with an underscore.
    #[error("custom tag name must start with '_': {0:?}")]
    InvalidName(String),

    /// The value pattern does not compile.
    #[error("invalid value pattern for tag {tag}: {source}")]
    InvalidPattern {
        tag: String,
        #[source]
        source: regex::Error,
    },
}

/// A finding in the legacy error shape.
///
/// Older callers consume plain errors rather than [`Issue`] values; the
/// facade's `validate_legacy` converts the same filtered findings into this
/// type.
#[derive(Debug, Clone, Error, Serialize, PartialEq, Eq)]
#[error("{code}: {message}")]
#[non_exhaustive]
pub struct ValidationError {
    pub severity: Severity,
    pub code: String,
    pub message: String,
    /// The record the finding is about.
    pub record_id: String,
    /// A second record involved, if any.
    pub related_id: Option<String>,
}

impl ValidationError {
    /// Format the error for human-readable output.
    ///
    /// `{record}: [{severity}] {code}: {message}`, with ` (see {related})`
    /// appended when a related record exists.
    #[must_use]
    pub fn format_human_readable(&self) -> String {
        match &self.related_id {
            Some(related) => format!(
                "{}: [{}] {}: {} (see {related})",
                self.record_id, self.severity, self.code, self.message
            ),
            None => format!(
                "{}: [{}] {}: {}",
                self.record_id, self.severity, self.code, self.message
            ),
        }
    }
}

impl From<Issue> for ValidationError {
    fn from(issue: Issue) -> Self {
        Self {
            severity: issue.severity(),
            code: issue.code().to_owned(),
            message: issue.message().to_owned(),
            record_id: issue.record_id().to_owned(),
            related_id: issue.related_id().map(str::to_owned),
        }
    }
}
