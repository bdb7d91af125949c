//! Document storage.
//!
//! # Responsibility
//! - Hold every document record for the lifetime of a session.
//!
//! # Invariants
//! - Deleted documents stay in the store with `deleted = true`.

pub mod document_store;
