#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::document::{Document, Header};
    use crate::record::{Family, Individual, PersonalName, Record, RecordKind, Sex, Source};
    use crate::{Date, FormatVersion};
    use serde_json::json;

    fn sample() -> Document {
        Document::new(None)
            .with_individual(
                Individual::new("@I1@")
                    .with_name("John /Doe/")
                    .with_sex(Sex::Male)
                    .spouse_in("@F1@"),
            )
            .with_individual(Individual::new("@I2@").with_name("Jane /Roe/"))
            .with_family(Family::new("@F1@").with_husband("@I1@").with_wife("@I2@"))
            .with_source(Source::new("@S1@", "Parish register"))
    }

    #[test]
    fn test_lookup_by_identifier() {
        let doc = sample();
        assert!(doc.contains("@I1@"));
        assert_eq!(doc.kind_of("@F1@"), Some(RecordKind::Family));
        assert_eq!(doc.kind_of("@S1@"), Some(RecordKind::Source));
        assert!(doc.lookup("@X9@").is_none());

        let Some(Record::Individual(john)) = doc.lookup("@I1@") else {
            panic!("expected individual");
        };
        assert_eq!(john.sex, Sex::Male);
    }

    #[test]
    fn test_typed_accessors_reject_wrong_kind() {
        let doc = sample();
        assert!(doc.individual("@I2@").is_some());
        assert!(doc.individual("@F1@").is_none());
        assert!(doc.family("@F1@").is_some());
        assert!(doc.family("@S1@").is_none());
    }

    #[test]
    fn test_records_in_document_order() {
        let doc = sample();
        let order: Vec<&str> = doc.records().map(|r| r.xref()).collect();
        assert_eq!(order, vec!["@I1@", "@I2@", "@F1@", "@S1@"]);
        assert_eq!(doc.record_count(), 4);
    }

    #[test]
    fn test_first_declaration_wins() {
        let doc = Document::new(None)
            .with_individual(Individual::new("@I1@").with_name("First /One/"))
            .with_source(Source::new("@I1@", "Clashing source"));

        assert_eq!(doc.kind_of("@I1@"), Some(RecordKind::Individual));
        assert_eq!(doc.duplicate_xrefs(), ["@I1@".to_owned()]);
    }

    #[test]
    fn test_first_declaration_follows_document_order() {
        let built = Document::new(None)
            .with_family(Family::new("@X1@"))
            .with_individual(Individual::new("@X1@"));

        assert_eq!(built.kind_of("@X1@"), Some(RecordKind::Individual));
        assert_eq!(built.duplicate_xrefs(), ["@X1@".to_owned()]);

        let json = serde_json::to_string(&built).unwrap();
        let reloaded: Document = serde_json::from_str(&json).unwrap();
        assert_eq!(reloaded.kind_of("@X1@"), Some(RecordKind::Individual));
        assert!(reloaded.individual("@X1@").is_some());
        assert!(built.individual("@X1@").is_some());
    }

    #[test]
    fn test_empty_identifier_not_indexed() {
        let doc = Document::new(None).with_individual(Individual::new(""));
        assert!(!doc.contains(""));
        assert!(doc.duplicate_xrefs().is_empty());
    }

    #[test]
    fn test_deserialize_builds_index() {
        let value = json!({
            "header": {"version": "5.5.1", "encoding": "UTF-8"},
            "individuals": [
                {"xref": "@I1@", "names": [{"full": "Ann /Lee/"}], "sex": "F",
                 "events": [{"tag": "BIRT", "date": {"year": 1900}}]}
            ],
            "families": [{"xref": "@F1@", "wife": "@I1@"}]
        });
        let doc: Document = serde_json::from_value(value).unwrap();

        assert_eq!(doc.kind_of("@I1@"), Some(RecordKind::Individual));
        assert_eq!(doc.kind_of("@F1@"), Some(RecordKind::Family));
        let ann = doc.individual("@I1@").unwrap();
        assert_eq!(ann.sex, Sex::Female);
        assert_eq!(ann.birth_year(), Some(1900));
        assert_eq!(
            doc.header().and_then(Header::format_version),
            Some(FormatVersion::V551)
        );
    }

    #[test]
    fn test_serialize_round_trip_keeps_lookup() {
        let doc = sample();
        let text = serde_json::to_string(&doc).unwrap();
        let back: Document = serde_json::from_str(&text).unwrap();
        assert_eq!(back.record_count(), 4);
        assert!(back.family("@F1@").is_some());
    }

    #[test]
    fn test_blank_header_version_is_absent() {
        let header = Header {
            version: Some("  ".to_owned()),
            ..Header::default()
        };
        assert_eq!(header.format_version(), None);
    }

    #[test]
    fn test_name_parsing() {
        let combined = PersonalName::new("John Paul /Doe/ Jr");
        assert_eq!(combined.given_name(), "John Paul");
        assert_eq!(combined.surname(), Some("Doe"));

        let no_slashes = PersonalName::new("Madonna");
        assert_eq!(no_slashes.given_name(), "Madonna");
        assert_eq!(no_slashes.surname(), None);

        let structured = PersonalName {
            full: "J /D/".to_owned(),
            given: Some("Johann".to_owned()),
            surname: Some("Dietrich".to_owned()),
        };
        assert_eq!(structured.given_name(), "Johann");
        assert_eq!(structured.surname(), Some("Dietrich"));

        assert!(PersonalName::default().is_empty());
        assert!(!combined.is_empty());
    }

    #[test]
    fn test_event_accessors() {
        let person = Individual::new("@I1@")
            .with_birth(Date::from_year(1900))
            .with_death(Date::new(1970, 2, 0));
        assert_eq!(person.birth_date(), Some(Date::from_year(1900)));
        assert_eq!(person.death_date().map(|d| d.month), Some(2));

        let undated = Individual::new("@I2@").with_birth(Date::default());
        assert_eq!(undated.birth_year(), None);

        let family = Family::new("@F1@")
            .with_husband("")
            .with_wife("@I1@")
            .with_marriage(Date::from_year(1925));
        assert_eq!(family.parents().collect::<Vec<_>>(), vec!["@I1@"]);
        assert_eq!(family.marriage_date(), Some(Date::from_year(1925)));
    }
}
