//! Book domain model.
//!
//! # Responsibility
//! - Define the canonical record stored in the `books` table.
//! - Define validated create input and merge-style patch input.
//!
//! # Invariants
//! - Every persisted book is identified by a storage-assigned positive id.
//! - Deletion is a hard delete; there is no tombstone state.

pub mod book;
