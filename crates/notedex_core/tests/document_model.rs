use chrono::{TimeZone, Utc};
use notedex_core::{Document, DocumentValidationError};

#[test]
fn new_document_is_live() {
    let created = Utc.with_ymd_and_hms(2014, 1, 3, 0, 0, 0).unwrap();
    let mut doc = Document::new(" n1 ", created, ["Work"], "Remember the milk").unwrap();

    assert_eq!(doc.id, "n1");
    assert!(doc.is_active());
    doc.tombstone();
    assert!(doc.deleted);
    assert!(!doc.is_active());
}

#[test]
fn serialization_uses_record_field_names() {
    let created = Utc.with_ymd_and_hms(2014, 1, 3, 0, 0, 0).unwrap();
    let doc = Document::new("n1", created, ["Work", "home"], "Remember the milk").unwrap();

    let json = serde_json::to_value(&doc).unwrap();
    assert_eq!(json["id"], "n1");
    assert_eq!(json["created"], "2014-01-03T00:00:00Z");
    assert_eq!(json["tags"], serde_json::json!(["home", "work"]));
    assert_eq!(json["content"], "Remember the milk");
    assert_eq!(json["deleted"], false);

    let decoded: Document = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, doc);
}

#[test]
fn blank_id_is_rejected() {
    let created = Utc.with_ymd_and_hms(2014, 1, 3, 0, 0, 0).unwrap();
    let err = Document::new("", created, Vec::<&str>::new(), "x").unwrap_err();
    assert_eq!(err, DocumentValidationError::EmptyId);
}
