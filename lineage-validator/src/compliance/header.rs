//! Header presence checks.

use lineage::{Document, FormatVersion, HEADER_ID, Header};

use crate::issue::{Issue, codes};

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

/// Check the header for missing or unsupported declarations.
///
/// Returns nothing when the document has no header at all.
#[must_use]
pub fn check_header(doc: &Document) -> Vec<Issue> {
    let Some(header) = doc.header() else {
        return Vec::new();
    };
    check_header_fields(header)
}

#[must_use]
pub fn check_header_fields(header: &Header) -> Vec<Issue> {
    let mut issues = Vec::new();
    let version = header.format_version();

    match &version {
        None => issues.push(Issue::warning(
            codes::MISSING_FORMAT_VERSION,
            "Header does not declare a format version",
            HEADER_ID,
        )),
        Some(FormatVersion::Unknown(raw)) => issues.push(
            Issue::warning(
                codes::UNSUPPORTED_FORMAT_VERSION,
                format!("Format version {raw} is not supported"),
                HEADER_ID,
            )
            .with_detail("version", raw),
        ),
        Some(_) => {}
    }

    if is_blank(header.source_system.as_deref()) {
        issues.push(Issue::warning(
            codes::MISSING_SOURCE_SYSTEM,
            "Header does not name the producing system",
            HEADER_ID,
        ));
    }

    if let Some(version) = &version {
        if matches!(version, FormatVersion::V55 | FormatVersion::V551)
            && is_blank(header.submitter.as_deref())
        {
            issues.push(
                Issue::warning(
                    codes::MISSING_SUBMITTER,
                    format!("Format version {version} requires a submitter"),
                    HEADER_ID,
                )
                .with_detail("version", version),
            );
        }
        if version.is_legacy() && is_blank(header.encoding.as_deref()) {
            issues.push(
                Issue::warning(
                    codes::MISSING_ENCODING,
                    format!("Format version {version} requires a character encoding"),
                    HEADER_ID,
                )
                .with_detail("version", version),
            );
        }
    }

    issues
}
