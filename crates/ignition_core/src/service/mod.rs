//! Use-case services consumed by the presentation layer.
//!
//! # Responsibility
//! - Validate user intent before it reaches the working set or the store.
//! - Keep presentation-only state (drag sessions) apart from entity state.

pub mod drag_drop;
pub mod workspace_service;
pub mod workspace_session;
