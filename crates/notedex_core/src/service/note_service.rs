//! Note session service.
//!
//! # Responsibility
//! - Own the document store and the content/tag trees for one session.
//! - Provide create/update/delete/search use-cases over them.
//! - Emit metadata-only diagnostic events for every mutation and query.
//!
//! # Invariants
//! - Every live document's body tokens and tags are indexed under its id.
//! - Deleted documents are tombstoned in both trees and never returned.
//! - Sessions are independent; no state is shared between instances.

use crate::index::ternary::TernaryTree;
use crate::index::tokenize::tokenize;
use crate::model::document::{Document, DocumentId};
use crate::search::evaluator::QueryEvaluator;
use crate::search::query::SearchError;
use crate::store::document_store::{DocumentStore, StoreError};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Service error for note use-cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteServiceError {
    /// Target document does not exist in this session.
    NotFound(DocumentId),
    /// Query could not be evaluated.
    Search(SearchError),
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "note not found: {id}"),
            Self::Search(err) => write!(f, "{err}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Search(err) => Some(err),
            Self::NotFound(_) => None,
        }
    }
}

impl From<StoreError> for NoteServiceError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound(id) => Self::NotFound(id),
        }
    }
}

impl From<SearchError> for NoteServiceError {
    fn from(value: SearchError) -> Self {
        Self::Search(value)
    }
}

pub type NoteServiceResult<T> = Result<T, NoteServiceError>;

/// Size snapshot of one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Stored records, including tombstoned ones.
    pub documents: usize,
    pub live_documents: usize,
    pub content_nodes: usize,
    pub tag_nodes: usize,
}

/// Outcome of a delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Document was live and is now tombstoned.
    Deleted,
    /// Document was already tombstoned; nothing changed.
    AlreadyDeleted,
}

/// One search session: document store plus content and tag indexes.
#[derive(Debug, Default)]
pub struct NoteSession {
    store: DocumentStore,
    content: TernaryTree,
    tags: TernaryTree,
}

impl NoteSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores and indexes `doc`.
    ///
    /// A live document with the same id is replaced; its index entries are
    /// tombstoned first so stale words stop matching.
    pub fn create(&mut self, doc: Document) {
        let started_at = Instant::now();
        if self.store.get(&doc.id).is_some_and(Document::is_active) {
            warn!(
                "event=note_create module=service status=replace id={}",
                doc.id
            );
            self.tombstone_indexes(&doc.id);
        }

        let id = doc.id.clone();
        let mut words = 0;
        for tag in &doc.tags {
            self.tags.insert(tag, &id);
        }
        for token in tokenize(&doc.body) {
            self.content.insert(&token, &id);
            words += 1;
        }
        let tag_count = doc.tags.len();
        self.store.put(doc);

        info!(
            "event=note_create module=service status=ok id={} tags={} words={} duration_us={}",
            id,
            tag_count,
            words,
            started_at.elapsed().as_micros()
        );
    }

    /// Replaces the document with `doc.id` by `doc`.
    ///
    /// A missing previous document is not an error; the new one is created.
    pub fn update(&mut self, doc: Document) {
        if let Err(err) = self.delete(&doc.id) {
            debug!(
                "event=note_update module=service status=no_previous id={} error={}",
                doc.id, err
            );
        }
        self.create(doc);
    }

    /// Tombstones the document `id` in the store and both trees.
    ///
    /// # Errors
    /// - [`NoteServiceError::NotFound`] when `id` was never created.
    pub fn delete(&mut self, id: &str) -> NoteServiceResult<DeleteOutcome> {
        let started_at = Instant::now();
        let changed = match self.store.mark_deleted(id) {
            Ok(changed) => changed,
            Err(err) => {
                warn!(
                    "event=note_delete module=service status=error id={} error_code=not_found",
                    id
                );
                return Err(err.into());
            }
        };
        if !changed {
            debug!("event=note_delete module=service status=noop id={}", id);
            return Ok(DeleteOutcome::AlreadyDeleted);
        }

        let removed = self.tombstone_indexes(id);
        info!(
            "event=note_delete module=service status=ok id={} removed_entries={} duration_us={}",
            id,
            removed,
            started_at.elapsed().as_micros()
        );
        Ok(DeleteOutcome::Deleted)
    }

    /// Evaluates `query` and returns matching ids ordered by creation time.
    ///
    /// # Errors
    /// - [`NoteServiceError::Search`] for malformed `created:` terms.
    pub fn search(&self, query: &str) -> NoteServiceResult<Vec<DocumentId>> {
        let started_at = Instant::now();
        let result = self.evaluator().search(query);
        match &result {
            Ok(hits) => debug!(
                "event=note_search module=service status=ok hits={} duration_us={}",
                hits.len(),
                started_at.elapsed().as_micros()
            ),
            Err(err) => warn!(
                "event=note_search module=service status=error error={}",
                err
            ),
        }
        result.map_err(NoteServiceError::from)
    }

    /// Read-only evaluator over this session's indexes.
    pub fn evaluator(&self) -> QueryEvaluator<'_> {
        QueryEvaluator::new(&self.store, &self.content, &self.tags)
    }

    /// Gets one document by id, including tombstoned ones.
    pub fn get(&self, id: &str) -> Option<&Document> {
        self.store.get(id)
    }

    pub fn content_index(&self) -> &TernaryTree {
        &self.content
    }

    pub fn tag_index(&self) -> &TernaryTree {
        &self.tags
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            documents: self.store.len(),
            live_documents: self.store.live_count(),
            content_nodes: self.content.node_count(),
            tag_nodes: self.tags.node_count(),
        }
    }

    fn tombstone_indexes(&mut self, id: &str) -> usize {
        self.content.tombstone(id) + self.tags.tombstone(id)
    }
}
