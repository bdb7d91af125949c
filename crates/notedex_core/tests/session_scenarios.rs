use chrono::{TimeZone, Utc};
use notedex_core::{DeleteOutcome, Document, NoteServiceError, NoteSession, SearchError};

fn note(id: &str, day: u32, tags: &[&str], body: &str) -> Document {
    let created = Utc.with_ymd_and_hms(2014, 1, day, 0, 0, 0).unwrap();
    Document::new(id, created, tags, body).unwrap()
}

fn seeded() -> NoteSession {
    let mut session = NoteSession::new();
    session.create(note("n1", 3, &["work"], "Remember the milk"));
    session.create(note("n2", 5, &["personal"], "Buy eggs and milk"));
    session
}

#[test]
fn create_search_delete_scenario() {
    let mut session = seeded();

    assert_eq!(session.search("milk").unwrap(), vec!["n1", "n2"]);
    assert_eq!(session.search("tag:work").unwrap(), vec!["n1"]);
    assert_eq!(session.search("created:20140104").unwrap(), vec!["n2"]);
    assert_eq!(session.search("mi*").unwrap(), vec!["n1", "n2"]);

    assert_eq!(session.delete("n1").unwrap(), DeleteOutcome::Deleted);
    assert_eq!(session.search("milk").unwrap(), vec!["n2"]);
    assert!(session.search("tag:work").unwrap().is_empty());
}

#[test]
fn update_reindexes_document() {
    let mut session = seeded();
    session.update(note("n2", 5, &["personal"], "Buy bread"));

    assert_eq!(session.search("milk").unwrap(), vec!["n1"]);
    assert!(session.search("eggs").unwrap().is_empty());
    assert_eq!(session.search("bread").unwrap(), vec!["n2"]);
    assert_eq!(session.search("tag:personal").unwrap(), vec!["n2"]);
    assert!(session.get("n2").unwrap().is_active());
}

#[test]
fn update_of_unknown_id_creates_it() {
    let mut session = seeded();
    session.update(note("n3", 7, &[], "fresh milk"));
    assert_eq!(session.search("milk").unwrap(), vec!["n1", "n2", "n3"]);
}

#[test]
fn delete_reports_unknown_and_repeated_ids() {
    let mut session = seeded();
    assert_eq!(
        session.delete("ghost").unwrap_err(),
        NoteServiceError::NotFound("ghost".to_string())
    );
    assert_eq!(session.delete("n2").unwrap(), DeleteOutcome::Deleted);
    assert_eq!(session.delete("n2").unwrap(), DeleteOutcome::AlreadyDeleted);
}

#[test]
fn date_filter_excludes_deleted_documents() {
    let mut session = seeded();
    session.delete("n2").unwrap();
    assert!(session.search("created:20140104").unwrap().is_empty());
    assert_eq!(session.search("created:20140103").unwrap(), vec!["n1"]);
}

#[test]
fn terms_combine_with_and_across_fields() {
    let session = seeded();
    assert_eq!(session.search("milk tag:personal").unwrap(), vec!["n2"]);
    assert_eq!(session.search("tag:per* created:20140101 eggs").unwrap(), vec!["n2"]);
    assert!(session.search("milk tag:work eggs").unwrap().is_empty());
    assert_eq!(session.search("MILK Tag:WORK").unwrap(), vec!["n1"]);
}

#[test]
fn empty_terms_match_nothing_and_bad_dates_are_errors() {
    let session = seeded();
    assert!(session.search("tag:").unwrap().is_empty());
    assert!(session.search("milk *").unwrap().is_empty());
    assert!(session.search("").unwrap().is_empty());
    assert!(matches!(
        session.search("created:2014-01-04"),
        Err(NoteServiceError::Search(SearchError::InvalidDate { .. }))
    ));
}

#[test]
fn recreating_live_id_replaces_index_entries() {
    let mut session = seeded();
    session.create(note("n1", 3, &["work"], "Call the bank"));

    assert_eq!(session.search("milk").unwrap(), vec!["n2"]);
    assert_eq!(session.search("bank").unwrap(), vec!["n1"]);
    assert_eq!(session.search("tag:work").unwrap(), vec!["n1"]);
}

#[test]
fn equal_timestamps_keep_creation_order() {
    let mut session = NoteSession::new();
    session.create(note("zeta", 3, &[], "shared word"));
    session.create(note("alpha", 3, &[], "shared word"));
    assert_eq!(session.search("shared").unwrap(), vec!["zeta", "alpha"]);
}

#[test]
fn sessions_are_independent() {
    let first = seeded();
    let second = NoteSession::new();
    assert_eq!(first.stats().live_documents, 2);
    assert!(second.search("milk").unwrap().is_empty());
    assert_eq!(second.stats().documents, 0);
}

#[test]
fn stats_track_tombstones_without_reclaiming_nodes() {
    let mut session = seeded();
    let before = session.stats();
    session.delete("n1").unwrap();
    let after = session.stats();

    assert_eq!(after.documents, 2);
    assert_eq!(after.live_documents, 1);
    assert_eq!(after.content_nodes, before.content_nodes);
    assert_eq!(after.tag_nodes, before.tag_nodes);
}
