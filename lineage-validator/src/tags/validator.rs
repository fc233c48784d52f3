//! Checks underscore tags in a record's line view against a registry.

use lineage::{Document, Line, Record};

use crate::issue::{Issue, Severity, codes};
use crate::tags::registry::{TagRegistry, TagViolation};

#[derive(Debug, Clone)]
pub struct TagValidator {
    registry: TagRegistry,
    warn_unknown: bool,
}

/// Parent tag of each line, derived from level numbers.
///
/// A level-0 line has no parent (`""`). A line whose level skips ahead of
/// the current nesting also gets `""`.
fn parent_tags(lines: &[Line]) -> Vec<&str> {
    let mut stack: Vec<&str> = Vec::new();
    let mut parents = Vec::with_capacity(lines.len());
    for line in lines {
        let level = usize::from(line.level);
        stack.truncate(level);
        let parent = level
            .checked_sub(1)
            .and_then(|p| stack.get(p))
            .copied()
            .unwrap_or("");
        while stack.len() < level {
            stack.push("");
        }
        stack.push(&line.tag);
        parents.push(parent);
    }
    parents
}

impl TagValidator {
    #[must_use]
    pub fn new(registry: TagRegistry, warn_unknown: bool) -> Self {
        Self {
            registry,
            warn_unknown,
        }
    }

    #[must_use]
    pub fn registry(&self) -> &TagRegistry {
        &self.registry
    }

    /// Check every underscore tag in `lines`.
    ///
    /// Standard tags are not examined. Registered tags are checked for
    /// placement and value; unregistered ones are reported as unknown.
    #[must_use]
    pub fn validate_lines(&self, record_id: &str, lines: &[Line]) -> Vec<Issue> {
        let mut issues = Vec::new();
        for (line, parent) in lines.iter().zip(parent_tags(lines)) {
            if !line.tag.starts_with('_') {
                continue;
            }
            let issue = if self.registry.contains(&line.tag) {
                match self.registry.validate(&line.tag, parent, &line.value) {
                    Some(violation) => violation_issue(record_id, &violation),
                    None => continue,
                }
            } else {
                let severity = if self.warn_unknown {
                    Severity::Warning
                } else {
                    Severity::Info
                };
                Issue::new(
                    severity,
                    codes::UNKNOWN_CUSTOM_TAG,
                    format!("Custom tag {} is not registered", line.tag),
                    record_id,
                )
            };
            issues.push(
                issue
                    .with_detail("tag", &line.tag)
                    .with_detail("parent", parent)
                    .with_detail("line", line.line_number),
            );
        }
        issues
    }

    #[must_use]
    pub fn validate_record(&self, record: Record<'_>) -> Vec<Issue> {
        self.validate_lines(record.xref(), record.lines())
    }

    #[must_use]
    pub fn validate_document(&self, doc: &Document) -> Vec<Issue> {
        let issues: Vec<Issue> = doc
            .records()
            .flat_map(|record| self.validate_record(record))
            .collect();
        tracing::debug!(
            registered = self.registry.len(),
            issues = issues.len(),
            "tag pass complete"
        );
        issues
    }
}

fn violation_issue(record_id: &str, violation: &TagViolation) -> Issue {
    match violation {
        TagViolation::InvalidParent { allowed, .. } => Issue::warning(
            codes::INVALID_TAG_PARENT,
            violation.to_string(),
            record_id,
        )
        .with_detail("allowed", allowed.join(",")),
        TagViolation::InvalidValue { value, .. } => Issue::warning(
            codes::INVALID_TAG_VALUE,
            violation.to_string(),
            record_id,
        )
        .with_detail("value", value),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::tags::Vendor;
    use lineage::Individual;

    fn person(lines: Vec<Line>) -> Individual {
        let mut person = Individual::new("@I1@");
        person.lines = lines;
        person
    }

    #[test]
    fn test_parent_tags() {
        let lines = vec![
            Line::new(0, "INDI", "", 1),
            Line::new(1, "BIRT", "", 2),
            Line::new(2, "DATE", "1850", 3),
            Line::new(1, "_FSFTID", "KWCJ-QN7", 4),
            Line::new(3, "_ODD", "", 5),
        ];
        assert_eq!(parent_tags(&lines), vec!["", "INDI", "BIRT", "INDI", ""]);
    }

    #[test]
    fn test_valid_vendor_tag_is_silent() {
        let validator = TagValidator::new(TagRegistry::for_vendor(Vendor::FamilySearch), false);
        let person = person(vec![
            Line::new(0, "INDI", "", 1),
            Line::new(1, "NAME", "John /Smith/", 2),
            Line::new(1, "_FSFTID", "KWCJ-QN7", 3),
        ]);
        assert!(validator.validate_record(Record::Individual(&person)).is_empty());
    }

    #[test]
    fn test_invalid_parent_and_value() {
        let validator = TagValidator::new(TagRegistry::for_vendor(Vendor::FamilySearch), false);
        let person = person(vec![
            Line::new(0, "INDI", "", 1),
            Line::new(1, "BIRT", "", 2),
            Line::new(2, "_FSFTID", "KWCJ-QN7", 3),
            Line::new(1, "_FSFTID", "nope", 4),
        ]);
        let issues = validator.validate_record(Record::Individual(&person));
        assert_eq!(issues.len(), 2);

        assert_eq!(issues[0].code(), codes::INVALID_TAG_PARENT);
        assert_eq!(issues[0].severity(), Severity::Warning);
        assert_eq!(issues[0].detail("parent"), Some("BIRT"));
        assert_eq!(issues[0].detail("line"), Some("3"));

        assert_eq!(issues[1].code(), codes::INVALID_TAG_VALUE);
        assert_eq!(issues[1].detail("value"), Some("nope"));
    }

    #[test]
    fn test_unknown_tag_severity() {
        let person = person(vec![
            Line::new(0, "INDI", "", 1),
            Line::new(1, "_MYSTERY", "x", 2),
        ]);

        let quiet = TagValidator::new(TagRegistry::new(), false);
        let issues = quiet.validate_record(Record::Individual(&person));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code(), codes::UNKNOWN_CUSTOM_TAG);
        assert_eq!(issues[0].severity(), Severity::Info);

        let loud = TagValidator::new(TagRegistry::new(), true);
        let issues = loud.validate_record(Record::Individual(&person));
        assert_eq!(issues[0].severity(), Severity::Warning);
        assert_eq!(issues[0].detail("tag"), Some("_MYSTERY"));
    }

    #[test]
    fn test_standard_tags_ignored() {
        let validator = TagValidator::new(TagRegistry::new(), true);
        let person = person(vec![
            Line::new(0, "INDI", "", 1),
            Line::new(1, "NOTE", "@N1@", 2),
        ]);
        assert!(validator.validate_record(Record::Individual(&person)).is_empty());
    }
}
