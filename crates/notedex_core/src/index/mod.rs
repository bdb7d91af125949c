//! In-memory word and tag indexes.
//!
//! # Responsibility
//! - Tokenize note bodies into normalized index terms.
//! - Provide the ternary search tree used for exact and prefix lookups.
//!
//! # Invariants
//! - Index terms are lowercase before insertion.
//! - Deletion is tombstone-only; tree nodes are never reclaimed.

pub mod ternary;
pub mod tokenize;
