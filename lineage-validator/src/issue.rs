//! Findings produced by every validator.
//!
//! An [`Issue`] is a value: once built it is never changed in place. The
//! `with_*` builders consume the issue and return the modified one, so an
//! issue stored in a report cannot be altered through another handle.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity of a finding. Ordered `Error < Warning < Info` for sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "ERROR",
            Self::Warning => "WARNING",
            Self::Info => "INFO",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable machine-readable issue codes.
pub mod codes {
    // Chronology
    pub const DEATH_BEFORE_BIRTH: &str = "DEATH_BEFORE_BIRTH";
    pub const CHILD_BEFORE_PARENT: &str = "CHILD_BEFORE_PARENT";
    pub const MARRIAGE_BEFORE_BIRTH: &str = "MARRIAGE_BEFORE_BIRTH";
    pub const UNREASONABLE_LIFESPAN: &str = "UNREASONABLE_LIFESPAN";
    pub const UNREASONABLE_PARENT_AGE: &str = "UNREASONABLE_PARENT_AGE";

    // References
    pub const ORPHANED_FAMC: &str = "ORPHANED_FAMC";
    pub const ORPHANED_FAMS: &str = "ORPHANED_FAMS";
    pub const ORPHANED_SOUR: &str = "ORPHANED_SOUR";
    pub const ORPHANED_HUSB: &str = "ORPHANED_HUSB";
    pub const ORPHANED_WIFE: &str = "ORPHANED_WIFE";
    pub const ORPHANED_CHIL: &str = "ORPHANED_CHIL";
    pub const REFERENCE_TYPE_MISMATCH: &str = "REFERENCE_TYPE_MISMATCH";

    // Duplicates
    pub const POTENTIAL_DUPLICATE: &str = "POTENTIAL_DUPLICATE";

    // Vendor tags
    pub const INVALID_TAG_PARENT: &str = "INVALID_TAG_PARENT";
    pub const INVALID_TAG_VALUE: &str = "INVALID_TAG_VALUE";
    pub const UNKNOWN_CUSTOM_TAG: &str = "UNKNOWN_CUSTOM_TAG";

    // Header, encoding and identifiers
    pub const MISSING_FORMAT_VERSION: &str = "MISSING_FORMAT_VERSION";
    pub const UNSUPPORTED_FORMAT_VERSION: &str = "UNSUPPORTED_FORMAT_VERSION";
    pub const MISSING_SOURCE_SYSTEM: &str = "MISSING_SOURCE_SYSTEM";
    pub const MISSING_SUBMITTER: &str = "MISSING_SUBMITTER";
    pub const MISSING_ENCODING: &str = "MISSING_ENCODING";
    pub const INVALID_ENCODING: &str = "INVALID_ENCODING";
    pub const NONSTANDARD_ENCODING_NAME: &str = "NONSTANDARD_ENCODING_NAME";
    pub const LEGACY_ENCODING: &str = "LEGACY_ENCODING";
    pub const XREF_TOO_LONG: &str = "XREF_TOO_LONG";
    pub const INVALID_XREF_FORMAT: &str = "INVALID_XREF_FORMAT";
    pub const RESERVED_XREF: &str = "RESERVED_XREF";
    pub const DUPLICATE_XREF: &str = "DUPLICATE_XREF";

    // Completeness
    pub const MISSING_NAME: &str = "MISSING_NAME";
    pub const MISSING_BIRTH_DATE: &str = "MISSING_BIRTH_DATE";
    pub const MISSING_SOURCES: &str = "MISSING_SOURCES";
}

/// A single finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    severity: Severity,
    code: String,
    message: String,
    record_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    related_id: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    details: BTreeMap<String, String>,
}

impl Issue {
    #[must_use]
    pub fn new(
        severity: Severity,
        code: impl Into<String>,
        message: impl Into<String>,
        record_id: impl Into<String>,
    ) -> Self {
        let code = code.into();
        debug_assert!(!code.is_empty(), "issue code must not be empty");
        Self {
            severity,
            code,
            message: message.into(),
            record_id: record_id.into(),
            related_id: None,
            details: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn error(
        code: impl Into<String>,
        message: impl Into<String>,
        record_id: impl Into<String>,
    ) -> Self {
        Self::new(Severity::Error, code, message, record_id)
    }

    #[must_use]
    pub fn warning(
        code: impl Into<String>,
        message: impl Into<String>,
        record_id: impl Into<String>,
    ) -> Self {
        Self::new(Severity::Warning, code, message, record_id)
    }

    #[must_use]
    pub fn info(
        code: impl Into<String>,
        message: impl Into<String>,
        record_id: impl Into<String>,
    ) -> Self {
        Self::new(Severity::Info, code, message, record_id)
    }

    #[must_use]
    pub fn with_related(mut self, related_id: impl Into<String>) -> Self {
        self.related_id = Some(related_id.into());
        self
    }

    #[must_use]
    pub fn with_detail(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.details.insert(key.into(), value.to_string());
        self
    }

    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn record_id(&self) -> &str {
        &self.record_id
    }

    #[must_use]
    pub fn related_id(&self) -> Option<&str> {
        self.related_id.as_deref()
    }

    #[must_use]
    pub fn details(&self) -> &BTreeMap<String, String> {
        &self.details
    }

    #[must_use]
    pub fn detail(&self, key: &str) -> Option<&str> {
        self.details.get(key).map(String::as_str)
    }

    /// `(code, record id, related id)`: what identifies a finding regardless
    /// of its wording or ordering.
    #[must_use]
    pub fn identity(&self) -> (&str, &str, Option<&str>) {
        (&self.code, &self.record_id, self.related_id.as_deref())
    }

    /// Whether the issue concerns `xref`, as primary or related record.
    #[must_use]
    pub fn involves(&self, xref: &str) -> bool {
        self.record_id == xref || self.related_id.as_deref() == Some(xref)
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {} ({}",
            self.severity, self.code, self.message, self.record_id
        )?;
        if let Some(related) = &self.related_id {
            write!(f, " -> {related}")?;
        }
        f.write_str(")")
    }
}

#[must_use]
pub fn filter_by_severity(issues: &[Issue], severity: Severity) -> Vec<Issue> {
    issues
        .iter()
        .filter(|i| i.severity == severity)
        .cloned()
        .collect()
}

#[must_use]
pub fn filter_by_code(issues: &[Issue], code: &str) -> Vec<Issue> {
    issues.iter().filter(|i| i.code == code).cloned().collect()
}

/// Stable sort, most severe first. Equal severities keep discovery order.
pub fn sort_by_severity(issues: &mut [Issue]) {
    issues.sort_by_key(Issue::severity);
}
