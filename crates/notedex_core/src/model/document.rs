//! Note document domain model.
//!
//! # Responsibility
//! - Define the canonical note record indexed by the search engine.
//! - Provide lifecycle helpers for tombstone semantics.
//!
//! # Invariants
//! - `id` is non-blank and never changes for the lifetime of a record.
//! - `tags` are trimmed, lowercase and deduplicated.
//! - `deleted` only ever transitions `false -> true`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Externally assigned document identifier.
///
/// Kept as a type alias; identifiers are opaque tokens supplied by callers.
pub type DocumentId = String;

/// Validation error for document construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentValidationError {
    /// Identifier is empty or whitespace only.
    EmptyId,
}

impl Display for DocumentValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "document id cannot be empty"),
        }
    }
}

impl Error for DocumentValidationError {}

/// Canonical note record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Primary key into the document store.
    pub id: DocumentId,
    /// Creation timestamp used for date filters and result ordering.
    pub created: DateTime<Utc>,
    /// Normalized tag set, fixed at creation.
    pub tags: BTreeSet<String>,
    /// Raw body text. Serialized as `content` to match the note record format.
    #[serde(rename = "content")]
    pub body: String,
    /// Tombstone flag.
    pub deleted: bool,
}

impl Document {
    /// Creates a live document with normalized tags.
    ///
    /// # Errors
    /// - [`DocumentValidationError::EmptyId`] when `id` is blank.
    pub fn new<I, S>(
        id: impl Into<String>,
        created: DateTime<Utc>,
        tags: I,
        body: impl Into<String>,
    ) -> Result<Self, DocumentValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let id = id.into().trim().to_string();
        if id.is_empty() {
            return Err(DocumentValidationError::EmptyId);
        }

        Ok(Self {
            id,
            created,
            tags: normalize_tags(tags),
            body: body.into(),
            deleted: false,
        })
    }

    /// Marks this document as deleted.
    pub fn tombstone(&mut self) {
        self.deleted = true;
    }

    /// Returns whether this document is visible to queries.
    pub fn is_active(&self) -> bool {
        !self.deleted
    }
}

/// Normalizes one tag value. Blank tags yield `None`.
pub fn normalize_tag(tag: &str) -> Option<String> {
    let trimmed = tag.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Normalizes and deduplicates tag values.
pub fn normalize_tags<I, S>(tags: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter()
        .filter_map(|tag| normalize_tag(tag.as_ref()))
        .collect()
}
