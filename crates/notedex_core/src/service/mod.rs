//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store and index mutations into note lifecycle operations.
//! - Keep protocol/CLI layers decoupled from index details.

pub mod note_service;
