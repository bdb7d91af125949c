//! Note domain model.
//!
//! # Responsibility
//! - Define the canonical document record indexed by the engine.
//!
//! # Invariants
//! - Every document is identified by a stable, externally assigned id.
//! - Deletion is represented by tombstones, not erasure.

pub mod document;
