//! Query parsing and evaluation.
//!
//! # Responsibility
//! - Classify query terms (`tag:`, `created:`, prefix, exact word).
//! - Evaluate multi-term queries against one session's indexes.

pub mod evaluator;
pub mod query;
