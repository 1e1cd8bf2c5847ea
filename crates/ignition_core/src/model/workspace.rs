//! Workspace domain model.
//!
//! # Responsibility
//! - Define the top-level container record.
//! - Own the single stringification used to scope boards/cards to a workspace.
//!
//! # Invariants
//! - `id` is unique among stored workspaces and never reused while the record exists.
//! - `order` is advisory display order only.

use serde::{Deserialize, Serialize};

/// Numeric workspace identifier.
pub type WorkspaceId = i64;

/// Top-level container for an ordered set of boards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    pub id: WorkspaceId,
    pub name: String,
    #[serde(default)]
    pub order: i64,
}

impl Workspace {
    /// Returns the `workspaceId` filter key used by this workspace's boards/cards.
    pub fn key(&self) -> String {
        workspace_key(self.id)
    }
}

/// Converts a workspace id into the string key stored on boards and cards.
///
/// Every read and write path goes through this function so the numeric id
/// and the stored string never drift apart.
pub fn workspace_key(id: WorkspaceId) -> String {
    id.to_string()
}
