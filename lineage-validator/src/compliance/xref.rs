//! Identifier shape, length and uniqueness checks.

use std::collections::HashSet;

use lineage::{Document, FormatVersion};
use lineage_xref::{XrefError, XrefRules, validate_xref};

use crate::issue::{Issue, codes};

/// Rules for the document's declared version; 5.5.1 rules when none or
/// an unknown version is declared.
#[must_use]
pub fn rules_for(doc: &Document) -> XrefRules {
    let version = doc
        .header()
        .and_then(lineage::Header::format_version)
        .unwrap_or(FormatVersion::V551);
    XrefRules::for_version(&version)
}

fn xref_issue(xref: &str, err: &XrefError) -> Issue {
    let message = format!("Identifier {xref:?}: {err}");
    match err {
        XrefError::TooLong { len, max } => Issue::error(codes::XREF_TOO_LONG, message, xref)
            .with_detail("length", len)
            .with_detail("max", max),
        XrefError::Reserved => Issue::error(codes::RESERVED_XREF, message, xref),
        XrefError::InvalidChar { ch, position } => {
            Issue::warning(codes::INVALID_XREF_FORMAT, message, xref)
                .with_detail("char", ch)
                .with_detail("position", position)
        }
        XrefError::Empty | XrefError::MissingDelimiters => {
            Issue::warning(codes::INVALID_XREF_FORMAT, message, xref)
        }
    }
}

/// Check every declared identifier once, then report each extra
/// declaration of an identifier as a duplicate.
#[must_use]
pub fn check_xrefs(doc: &Document) -> Vec<Issue> {
    let rules = rules_for(doc);
    let mut seen = HashSet::new();
    let mut issues = Vec::new();

    for record in doc.records() {
        let xref = record.xref();
        if !seen.insert(xref) {
            continue;
        }
        if let Err(err) = validate_xref(xref, &rules) {
            issues.push(xref_issue(xref, &err).with_detail("kind", record.kind()));
        }
    }

    issues.extend(doc.duplicate_xrefs().iter().map(|xref| {
        Issue::error(
            codes::DUPLICATE_XREF,
            format!("Identifier {xref} is declared more than once"),
            xref.as_str(),
        )
    }));
    issues
}
