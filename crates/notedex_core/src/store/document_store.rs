//! Document store keyed by document id.
//!
//! # Responsibility
//! - Act as the system of record for note documents.
//! - Answer date-range and deletion-state queries that bypass the indexes.
//! - Provide the stable creation-time ordering used for result presentation.
//!
//! # Invariants
//! - `put` is last-write-wins and assigns a fresh insertion sequence.
//! - `mark_deleted` never reverts a tombstone.

use crate::model::document::{Document, DocumentId};
use chrono::{DateTime, Utc};
use std::collections::{BTreeSet, HashMap};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Store-level error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Target id is not present in the store.
    NotFound(DocumentId),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "document not found: {id}"),
        }
    }
}

impl Error for StoreError {}

#[derive(Debug, Clone)]
struct StoredDocument {
    sequence: u64,
    document: Document,
}

/// In-memory mapping from id to document record.
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: HashMap<DocumentId, StoredDocument>,
    next_sequence: u64,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the record keyed by `doc.id`.
    ///
    /// Returns the replaced record, if any.
    pub fn put(&mut self, doc: Document) -> Option<Document> {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.documents
            .insert(
                doc.id.clone(),
                StoredDocument {
                    sequence,
                    document: doc,
                },
            )
            .map(|previous| previous.document)
    }

    pub fn get(&self, id: &str) -> Option<&Document> {
        self.documents.get(id).map(|stored| &stored.document)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.documents.contains_key(id)
    }

    /// Total records, including tombstoned ones.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Records not yet tombstoned.
    pub fn live_count(&self) -> usize {
        self.documents
            .values()
            .filter(|stored| stored.document.is_active())
            .count()
    }

    /// Sets the tombstone flag on `id`.
    ///
    /// Returns `Ok(true)` when the flag changed and `Ok(false)` when the
    /// document was already deleted.
    ///
    /// # Errors
    /// - [`StoreError::NotFound`] when `id` is absent.
    pub fn mark_deleted(&mut self, id: &str) -> StoreResult<bool> {
        let stored = self
            .documents
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if stored.document.deleted {
            return Ok(false);
        }
        stored.document.tombstone();
        Ok(true)
    }

    /// Ids of live documents created at or after `cutoff`.
    pub fn query_by_date(&self, cutoff: DateTime<Utc>) -> BTreeSet<DocumentId> {
        self.documents
            .values()
            .map(|stored| &stored.document)
            .filter(|doc| doc.is_active() && doc.created >= cutoff)
            .map(|doc| doc.id.clone())
            .collect()
    }

    /// Insertion sequence of the current record for `id`.
    pub fn sequence_of(&self, id: &str) -> Option<u64> {
        self.documents.get(id).map(|stored| stored.sequence)
    }

    /// Orders ids by `created` ascending, ties by insertion sequence.
    ///
    /// Ids without a record are dropped.
    pub fn sort_by_created<I>(&self, ids: I) -> Vec<DocumentId>
    where
        I: IntoIterator<Item = DocumentId>,
    {
        let mut keyed: Vec<(DateTime<Utc>, u64, DocumentId)> = ids
            .into_iter()
            .filter_map(|id| {
                let stored = self.documents.get(&id)?;
                Some((stored.document.created, stored.sequence, id))
            })
            .collect();
        keyed.sort();
        keyed.into_iter().map(|(_, _, id)| id).collect()
    }
}
