//! Entity model for workspaces, boards and cards.
//!
//! # Responsibility
//! - Define plain records and their persisted wire shape.
//! - Validate user-entered fields before they reach a working set.
//!
//! # Invariants
//! - Records carry no behavior beyond construction and validation.
//! - Boards and cards are scoped by the string form of `Workspace::id`.

pub mod board;
pub mod card;
pub mod timestamp;
pub mod validation;
pub mod workspace;
