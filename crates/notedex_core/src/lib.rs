//! Core domain logic for notedex.
//! This crate is the single source of truth for indexing and query invariants.

pub mod index;
pub mod logging;
pub mod model;
pub mod protocol;
pub mod search;
pub mod service;
pub mod store;

pub use index::ternary::{TernaryNode, TernaryTree};
pub use index::tokenize::tokenize;
pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::document::{Document, DocumentId, DocumentValidationError};
pub use protocol::command::{run_session, Command, ProtocolError, ProtocolResult, RunSummary};
pub use protocol::record::{parse_note_record, RecordError};
pub use search::evaluator::QueryEvaluator;
pub use search::query::{parse_query, parse_term, QueryTerm, SearchError, SearchResult, TermMatch};
pub use service::note_service::{DeleteOutcome, NoteServiceError, NoteSession, SessionStats};
pub use store::document_store::{DocumentStore, StoreError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
