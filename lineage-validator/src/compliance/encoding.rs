//! Character-encoding checks against the declared format version.

use lineage::{Document, FormatVersion, HEADER_ID, Header};

use crate::issue::{Issue, codes};

const UTF8: &str = "UTF-8";
const NONSTANDARD_UTF8: &str = "UTF8";

/// Encodings a version permits, upper-case. Empty for unknown versions.
#[must_use]
pub fn allowed_encodings(version: &FormatVersion) -> &'static [&'static str] {
    match version {
        FormatVersion::V55 | FormatVersion::V551 => &["ANSEL", "UTF-8", "UNICODE", "ASCII"],
        FormatVersion::V555 => &["UTF-8", "UNICODE"],
        FormatVersion::V70 => &["UTF-8"],
        FormatVersion::Unknown(_) => &[],
    }
}

#[must_use]
pub fn check_encoding(doc: &Document) -> Vec<Issue> {
    doc.header().map_or_else(Vec::new, check_header_encoding)
}

/// Judge the declared encoding.
///
/// Silent when the version is missing or unknown, or when no encoding is
/// declared (the header check reports that).
#[must_use]
pub fn check_header_encoding(header: &Header) -> Vec<Issue> {
    let Some(version) = header.format_version().filter(FormatVersion::is_known) else {
        return Vec::new();
    };
    let Some(declared) = header.encoding.as_deref().map(str::trim).filter(|e| !e.is_empty())
    else {
        return Vec::new();
    };
    let normalized = declared.to_ascii_uppercase();

    if normalized == NONSTANDARD_UTF8 {
        return vec![
            Issue::warning(
                codes::NONSTANDARD_ENCODING_NAME,
                format!("Encoding {declared} should be written {UTF8}"),
                HEADER_ID,
            )
            .with_detail("encoding", declared),
        ];
    }

    let allowed = allowed_encodings(&version);
    if !allowed.contains(&normalized.as_str()) {
        return vec![
            Issue::error(
                codes::INVALID_ENCODING,
                format!("Encoding {declared} is not permitted in format version {version}"),
                HEADER_ID,
            )
            .with_detail("encoding", declared)
            .with_detail("version", &version)
            .with_detail("allowed", allowed.join(",")),
        ];
    }

    if version.is_legacy() && matches!(normalized.as_str(), "ANSEL" | "ASCII") {
        return vec![
            Issue::info(
                codes::LEGACY_ENCODING,
                format!("Encoding {declared} is a legacy encoding; consider {UTF8}"),
                HEADER_ID,
            )
            .with_detail("encoding", declared),
        ];
    }

    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::Severity;

    fn header(version: &str, encoding: &str) -> Header {
        Header {
            version: Some(version.to_owned()),
            encoding: Some(encoding.to_owned()),
            ..Header::default()
        }
    }

    fn single(version: &str, encoding: &str) -> Option<(String, Severity)> {
        let issues = check_header_encoding(&header(version, encoding));
        assert!(issues.len() <= 1);
        issues
            .first()
            .map(|i| (i.code().to_owned(), i.severity()))
    }

    #[test]
    fn test_permitted_encodings() {
        assert_eq!(single("5.5.1", "UTF-8"), None);
        assert_eq!(single("5.5.1", "unicode"), None);
        assert_eq!(single("5.5.5", "UNICODE"), None);
        assert_eq!(single("7.0", "utf-8"), None);
    }

    #[test]
    fn test_invalid_encoding() {
        assert_eq!(
            single("7.0", "ANSEL"),
            Some((codes::INVALID_ENCODING.to_owned(), Severity::Error))
        );
        assert_eq!(
            single("5.5.5", "ASCII"),
            Some((codes::INVALID_ENCODING.to_owned(), Severity::Error))
        );
        assert_eq!(
            single("5.5", "IBMPC"),
            Some((codes::INVALID_ENCODING.to_owned(), Severity::Error))
        );
    }

    #[test]
    fn test_nonstandard_utf8_name() {
        assert_eq!(
            single("7.0", "utf8"),
            Some((codes::NONSTANDARD_ENCODING_NAME.to_owned(), Severity::Warning))
        );
    }

    #[test]
    fn test_legacy_encoding() {
        assert_eq!(
            single("5.5.1", "ANSEL"),
            Some((codes::LEGACY_ENCODING.to_owned(), Severity::Info))
        );
        assert_eq!(
            single("5.5", "ascii"),
            Some((codes::LEGACY_ENCODING.to_owned(), Severity::Info))
        );
    }

    #[test]
    fn test_unknown_version_has_no_opinion() {
        assert_eq!(single("9.9", "EBCDIC"), None);
        let mut h = header("7.0", "ANSEL");
        h.version = None;
        assert!(check_header_encoding(&h).is_empty());
    }

    #[test]
    fn test_absent_header() {
        assert!(check_encoding(&Document::new(None)).is_empty());
    }
}
