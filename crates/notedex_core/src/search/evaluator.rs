//! Multi-term query evaluation over the content/tag trees and document store.
//!
//! # Responsibility
//! - Resolve each classified term to a document id set.
//! - Combine term results with AND semantics, in term order.
//! - Order final results by creation time for presentation.
//!
//! # Invariants
//! - Evaluation never mutates the trees or the store.
//! - Tombstoned documents never appear: tree terms rely on the sweep,
//!   date terms check the `deleted` flag directly.

use crate::index::ternary::TernaryTree;
use crate::model::document::DocumentId;
use crate::search::query::{parse_query, QueryTerm, SearchResult, TermMatch};
use crate::store::document_store::DocumentStore;
use log::debug;
use std::collections::BTreeSet;

/// Read-only view over one session's indexes.
pub struct QueryEvaluator<'a> {
    store: &'a DocumentStore,
    content: &'a TernaryTree,
    tags: &'a TernaryTree,
}

impl<'a> QueryEvaluator<'a> {
    pub fn new(store: &'a DocumentStore, content: &'a TernaryTree, tags: &'a TernaryTree) -> Self {
        Self {
            store,
            content,
            tags,
        }
    }

    /// Resolves one term to the ids of documents it matches.
    pub fn resolve(&self, term: &QueryTerm) -> BTreeSet<DocumentId> {
        match term {
            QueryTerm::Tag(matcher) => resolve_in_tree(self.tags, matcher),
            QueryTerm::Content(matcher) => resolve_in_tree(self.content, matcher),
            QueryTerm::CreatedSince(cutoff) => self.store.query_by_date(*cutoff),
        }
    }

    /// Evaluates `text` as an AND of its terms.
    ///
    /// Returns an empty set for blank queries and for queries containing an
    /// empty term such as a bare `tag:`.
    ///
    /// # Errors
    /// - [`crate::search::query::SearchError::InvalidDate`] for a malformed
    ///   `created:` term.
    pub fn evaluate(&self, text: &str) -> SearchResult<BTreeSet<DocumentId>> {
        let parsed = parse_query(text)?;
        if parsed.is_unsatisfiable() {
            debug!(
                "event=query_eval module=search status=empty terms={} empty_terms={}",
                parsed.terms.len(),
                parsed.empty_terms.len()
            );
            return Ok(BTreeSet::new());
        }

        let mut terms = parsed.terms.iter();
        let mut matched = match terms.next() {
            Some(first) => self.resolve(first),
            None => return Ok(BTreeSet::new()),
        };
        for term in terms {
            if matched.is_empty() {
                break;
            }
            let next = self.resolve(term);
            matched.retain(|id| next.contains(id));
        }

        debug!(
            "event=query_eval module=search status=ok terms={} hits={}",
            parsed.terms.len(),
            matched.len()
        );
        Ok(matched)
    }

    /// Evaluates `text` and orders hits by creation time ascending.
    pub fn search(&self, text: &str) -> SearchResult<Vec<DocumentId>> {
        let matched = self.evaluate(text)?;
        Ok(self.store.sort_by_created(matched))
    }
}

fn resolve_in_tree(tree: &TernaryTree, matcher: &TermMatch) -> BTreeSet<DocumentId> {
    match matcher {
        TermMatch::Exact(word) => tree.ids_exact(word),
        TermMatch::Prefix(prefix) => tree.ids_with_prefix(prefix),
    }
}
