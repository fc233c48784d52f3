//! Cross-reference identifier primitives for lineage documents.
//!
//! This crate is the single source of truth for what a well-formed record
//! identifier (`@I1@`, `@F23@`, ...) looks like under each supported format
//! version. It is shared by the document model and the validation engine.

use std::fmt;

use thiserror::Error;

/// Delimiter that opens and closes every identifier.
pub const XREF_DELIMITER: char = '@';

/// Maximum identifier length (including both delimiters) for 5.x documents.
pub const XREF_MAX_LENGTH_5X: usize = 22;

/// The 7.0 null pointer. It may be referenced but never declared.
pub const VOID_POINTER: &str = "@VOID@";

/// Errors from identifier validation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum XrefError {
    /// The identifier is empty or whitespace.
    #[error("identifier is empty")]
    Empty,

    /// The identifier is not wrapped in `@...@` or has no interior.
    #[error("identifier must be enclosed in '@' delimiters")]
    MissingDelimiters,

    /// The identifier exceeds the version's length limit.
    #[error("identifier is {len} characters long (max {max})")]
    TooLong {
        /// Length in characters, delimiters included.
        len: usize,
        /// Limit for the format version.
        max: usize,
    },

    /// A character is not permitted at the given position.
    #[error("invalid character {ch:?} at position {position}")]
    InvalidChar {
        /// The offending character.
        ch: char,
        /// 1-based character position within the full identifier.
        position: usize,
    },

    /// The identifier is reserved and cannot name a record.
    #[error("identifier is reserved")]
    Reserved,
}

/// Declared format version of a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FormatVersion {
    V55,
    V551,
    V555,
    V70,
    /// Anything the engine does not recognize, kept verbatim.
    Unknown(String),
}

impl FormatVersion {
    /// Parse a header version string.
    ///
    /// Any `7.0.x` patch release maps to [`FormatVersion::V70`].
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed {
            "5.5" => Self::V55,
            "5.5.1" => Self::V551,
            "5.5.5" => Self::V555,
            "7.0" => Self::V70,
            v if v.len() > 4
                && v.starts_with("7.0.")
                && v[4..].chars().all(|c| c.is_ascii_digit()) =>
            {
                Self::V70
            }
            other => Self::Unknown(other.to_owned()),
        }
    }

    /// Whether this is one of the 5.x family.
    #[must_use]
    pub fn is_legacy(&self) -> bool {
        matches!(self, Self::V55 | Self::V551 | Self::V555)
    }

    #[must_use]
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V55 => f.write_str("5.5"),
            Self::V551 => f.write_str("5.5.1"),
            Self::V555 => f.write_str("5.5.5"),
            Self::V70 => f.write_str("7.0"),
            Self::Unknown(raw) => f.write_str(raw),
        }
    }
}

/// Character classes allowed inside the delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XrefCharset {
    /// 5.x: leading ASCII alphanumeric, then any printable character except `@`.
    Legacy,
    /// 7.0: `[A-Z0-9_]` only.
    Strict,
}

/// Identifier rules for a format version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XrefRules {
    /// Maximum length including delimiters; `None` means unlimited.
    pub max_length: Option<usize>,
    pub charset: XrefCharset,
    /// Identifiers that may never be declared.
    pub reserved: &'static [&'static str],
}

impl XrefRules {
    /// Rules for the given version. Unknown versions get the 5.5.1 rules.
    #[must_use]
    pub fn for_version(version: &FormatVersion) -> Self {
        match version {
            FormatVersion::V70 => Self {
                max_length: None,
                charset: XrefCharset::Strict,
                reserved: &[VOID_POINTER],
            },
            FormatVersion::V55
            | FormatVersion::V551
            | FormatVersion::V555
            | FormatVersion::Unknown(_) => Self {
                max_length: Some(XREF_MAX_LENGTH_5X),
                charset: XrefCharset::Legacy,
                reserved: &[],
            },
        }
    }
}

/// Return the interior of a delimited identifier, or `None` if it is not one.
#[inline]
#[must_use]
pub fn strip_delimiters(xref: &str) -> Option<&str> {
    let interior = xref
        .strip_prefix(XREF_DELIMITER)?
        .strip_suffix(XREF_DELIMITER)?;
    if interior.is_empty() {
        None
    } else {
        Some(interior)
    }
}

/// Whether a value looks like a pointer (`@...@`).
#[inline]
#[must_use]
pub fn is_pointer(value: &str) -> bool {
    strip_delimiters(value).is_some()
}

/// Validate a declared identifier against a rule set.
///
/// Checks run in order: emptiness, delimiters, reservation, length, then the
/// character set, so an identifier reports its most fundamental problem.
///
/// # Errors
/// Returns [`XrefError`] describing the first rule the identifier breaks.
pub fn validate_xref(xref: &str, rules: &XrefRules) -> Result<(), XrefError> {
    if xref.trim().is_empty() {
        return Err(XrefError::Empty);
    }

    let interior = strip_delimiters(xref).ok_or(XrefError::MissingDelimiters)?;

    if rules.reserved.contains(&xref) {
        return Err(XrefError::Reserved);
    }

    let len = xref.chars().count();
    if let Some(max) = rules.max_length
        && len > max
    {
        return Err(XrefError::TooLong { len, max });
    }

    for (i, ch) in interior.chars().enumerate() {
        // position 1 is the opening delimiter
        let position = i + 2;
        let ok = match rules.charset {
            XrefCharset::Legacy if i == 0 => ch.is_ascii_alphanumeric(),
            XrefCharset::Legacy => ch != XREF_DELIMITER && !ch.is_control(),
            XrefCharset::Strict => ch.is_ascii_uppercase() || ch.is_ascii_digit() || ch == '_',
        };
        if !ok {
            return Err(XrefError::InvalidChar { ch, position });
        }
    }

    Ok(())
}
