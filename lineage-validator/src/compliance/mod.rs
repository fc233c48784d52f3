//! Format-version compliance: header declarations, text encoding, and
//! identifier rules.

pub mod encoding;
pub mod header;
pub mod xref;

use lineage::Document;

use crate::issue::Issue;

pub use encoding::{allowed_encodings, check_encoding};
pub use header::check_header;
pub use xref::check_xrefs;

/// Header, encoding and identifier checks, in that order.
#[must_use]
pub fn check_compliance(doc: &Document) -> Vec<Issue> {
    let mut issues = check_header(doc);
    issues.extend(check_encoding(doc));
    issues.extend(check_xrefs(doc));
    tracing::debug!(issues = issues.len(), "compliance pass complete");
    issues
}
