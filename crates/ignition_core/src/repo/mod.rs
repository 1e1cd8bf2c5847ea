//! Repository layer over the shared key-value store.
//!
//! # Responsibility
//! - Define use-case oriented persistence contracts.
//! - Keep every read-modify-write merge of the shared collections in one place.
//!
//! # Invariants
//! - Board/card writes only ever replace records of the workspace being saved.
//! - Malformed stored data degrades to empty, never to an error.

pub mod slice_repo;
pub mod workspace_repo;
