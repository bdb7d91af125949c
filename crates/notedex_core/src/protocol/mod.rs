//! Text protocol adapters around the core session.
//!
//! # Responsibility
//! - Parse `<note>` records into documents.
//! - Run the line-oriented command loop and format SEARCH output.
//!
//! # Invariants
//! - Malformed input surfaces as typed errors; it never panics.

pub mod command;
pub mod record;
