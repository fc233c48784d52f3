//! Integration tests for streaming reference validation.

use lineage::{Date, Document, Family, Individual, Note, Record, Repository, Source};
use lineage_validator::{Issue, ReferenceValidator, StreamingValidator, codes};

type Triple = (String, String, Option<String>);

fn triples(issues: &[Issue]) -> Vec<Triple> {
    let mut out: Vec<Triple> = issues
        .iter()
        .map(|i| {
            (
                i.code().to_owned(),
                i.record_id().to_owned(),
                i.related_id().map(str::to_owned),
            )
        })
        .collect();
    out.sort();
    out
}

fn streamed(doc: &Document) -> Vec<Issue> {
    let mut streaming = StreamingValidator::default();
    let _ = streaming.process_document(doc);
    streaming.finalize()
}

fn assert_equivalent(doc: &Document) {
    let batch = ReferenceValidator::new().validate(doc);
    let stream = streamed(doc);
    assert_eq!(triples(&batch), triples(&stream));
}

fn tangled() -> Document {
    let mut person = Individual::new("@I1@")
        .child_of("@F1@")
        .spouse_in("@F2@")
        .citing("@S1@")
        .citing("@S404@")
        .citing("@S404@");
    person.notes.push("@N1@".to_owned());
    person.notes.push("@N404@".to_owned());
    person.associations.push("@I404@".to_owned());

    let mut source = Source::new("@S1@", "Parish register");
    source.repository = Some("@R404@".to_owned());

    let mut repository = Repository {
        xref: "@R1@".to_owned(),
        name: "Archive".to_owned(),
        ..Repository::default()
    };
    repository.notes.push("@N1@".to_owned());

    let mut doc = Document::new(None)
        .with_individual(person)
        .with_individual(Individual::new("@I2@").child_of("@S1@"))
        .with_family(
            Family::new("@F1@")
                .with_husband("@I2@")
                .with_wife("@I999@")
                .with_child("@I1@")
                .with_child("")
                .with_child("@I998@"),
        )
        .with_source(source);
    doc.add_note(Note {
        xref: "@N1@".to_owned(),
        text: "See also".to_owned(),
        ..Note::default()
    });
    doc.add_repository(repository);
    doc
}

#[test]
fn test_equivalence_on_tangled_document() {
    let doc = tangled();
    assert_equivalent(&doc);

    let stream = streamed(&doc);
    let codes_found: Vec<&str> = stream.iter().map(Issue::code).collect();
    assert!(codes_found.contains(&codes::ORPHANED_FAMS));
    assert!(codes_found.contains(&codes::ORPHANED_WIFE));
    assert!(codes_found.contains(&codes::ORPHANED_CHIL));
    assert!(codes_found.contains(&codes::REFERENCE_TYPE_MISMATCH));
    assert!(codes_found.contains(&"ORPHANED_NOTE"));
    assert!(codes_found.contains(&"ORPHANED_ASSO"));
    assert!(codes_found.contains(&"ORPHANED_REPO"));
    assert_eq!(
        stream
            .iter()
            .filter(|i| i.related_id() == Some("@S404@"))
            .count(),
        2
    );
}

#[test]
fn test_equivalence_on_clean_and_empty_documents() {
    assert_equivalent(&Document::new(None));

    let clean = Document::new(None)
        .with_individual(Individual::new("@I1@").spouse_in("@F1@"))
        .with_individual(Individual::new("@I2@").spouse_in("@F1@"))
        .with_family(Family::new("@F1@").with_husband("@I1@").with_wife("@I2@"));
    assert_equivalent(&clean);
    assert!(streamed(&clean).is_empty());
}

#[test]
fn test_equivalence_with_duplicate_declarations() {
    let doc = Document::new(None)
        .with_individual(Individual::new("@X1@").child_of("@X1@"))
        .with_family(Family::new("@X1@").with_child("@X1@"));
    assert_equivalent(&doc);
}

#[test]
fn test_equivalence_when_later_kind_is_added_first() {
    let doc = Document::new(None)
        .with_family(Family::new("@X1@"))
        .with_individual(Individual::new("@X1@"))
        .with_individual(Individual::new("@I2@").child_of("@X1@"));
    assert_equivalent(&doc);

    let batch = ReferenceValidator::new().validate(&doc);
    assert_eq!(batch.len(), 1);
    assert_eq!(batch[0].code(), codes::REFERENCE_TYPE_MISMATCH);
    assert_eq!(batch[0].related_id(), Some("@X1@"));

    let json = serde_json::to_string(&doc).unwrap_or_else(|e| panic!("{e}"));
    let reloaded: Document = serde_json::from_str(&json).unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(
        triples(&ReferenceValidator::new().validate(&reloaded)),
        triples(&batch)
    );
}

#[test]
fn test_record_order_does_not_matter() {
    let doc = tangled();
    let mut forward = StreamingValidator::default();
    let mut backward = StreamingValidator::default();
    let records: Vec<Record<'_>> = doc.records().collect();
    for record in &records {
        let _ = forward.process_record(*record);
    }
    for record in records.iter().rev() {
        let _ = backward.process_record(*record);
    }
    assert_eq!(triples(&forward.finalize()), triples(&backward.finalize()));
}

#[test]
fn test_fan_out_is_one_identifier() {
    let mut streaming = StreamingValidator::default();
    for n in 0..1000 {
        let person = Individual::new(&format!("@I{n}@")).citing("@S1@");
        let _ = streaming.process_record(Record::Individual(&person));
    }
    assert_eq!(streaming.referenced_count(), 1);
    assert_eq!(streaming.usage_count("@S1@"), 1000);

    let issues = streaming.finalize();
    assert_eq!(issues.len(), 1000);
    assert!(issues.iter().all(|i| i.code() == codes::ORPHANED_SOUR));
}

#[test]
fn test_reset_between_files() {
    let mut streaming = StreamingValidator::default();
    let _ = streaming.process_document(&tangled());
    assert!(!streaming.finalize().is_empty());

    streaming.reset();
    let clean = Document::new(None)
        .with_individual(Individual::new("@I1@").citing("@S1@"))
        .with_source(Source::new("@S1@", "Census"));
    let immediate = streaming.process_document(&clean);
    assert!(immediate.is_empty());
    assert!(streaming.finalize().is_empty());
    assert_eq!(streaming.records_seen(), 2);
}

#[test]
fn test_immediate_checks_match_date_rules() {
    let person = Individual::new("@I1@")
        .with_birth(Date::from_year(1800))
        .with_death(Date::from_year(1950));
    let mut streaming = StreamingValidator::default();
    let issues = streaming.process_record(Record::Individual(&person));
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].code(), codes::UNREASONABLE_LIFESPAN);
}
