//! Workspace catalog and selected-workspace persistence.
//!
//! # Invariants
//! - `Workspaces` is rewritten as a whole; it has a single owner.
//! - An absent or unparseable selection record means "nothing selected".

use crate::model::workspace::{Workspace, WorkspaceId};
use crate::store::collection::{
    encode_records, read_records, write_raw_records, SELECTED_WORKSPACE_KEY, WORKSPACES_KEY,
};
use crate::store::{KeyValueStore, StoreResult};
use log::warn;

/// Repository interface for the workspace catalog.
pub trait WorkspaceRepository {
    /// Loads all stored workspaces in stored order.
    fn list_workspaces(&self) -> StoreResult<Vec<Workspace>>;
    /// Replaces the stored workspace collection.
    fn save_workspaces(&self, workspaces: &[Workspace]) -> StoreResult<()>;
    /// Loads the persisted selection, if any.
    fn selected_workspace(&self) -> StoreResult<Option<WorkspaceId>>;
    /// Persists or clears the selection.
    fn set_selected_workspace(&self, id: Option<WorkspaceId>) -> StoreResult<()>;
}

/// `WorkspaceRepository` backed by a shared key-value store.
pub struct StoreWorkspaceRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> StoreWorkspaceRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S: KeyValueStore> WorkspaceRepository for StoreWorkspaceRepository<S> {
    fn list_workspaces(&self) -> StoreResult<Vec<Workspace>> {
        read_records(&self.store, WORKSPACES_KEY)
    }

    fn save_workspaces(&self, workspaces: &[Workspace]) -> StoreResult<()> {
        write_raw_records(&self.store, WORKSPACES_KEY, &encode_records(workspaces)?)
    }

    fn selected_workspace(&self) -> StoreResult<Option<WorkspaceId>> {
        let Some(text) = self.store.get(SELECTED_WORKSPACE_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str::<Option<WorkspaceId>>(&text) {
            Ok(value) => Ok(value),
            Err(err) => {
                warn!(
                    "event=store_decode module=repo status=degraded key={SELECTED_WORKSPACE_KEY} error={err}"
                );
                Ok(None)
            }
        }
    }

    fn set_selected_workspace(&self, id: Option<WorkspaceId>) -> StoreResult<()> {
        match id {
            Some(id) => self
                .store
                .set(SELECTED_WORKSPACE_KEY, &serde_json::to_string(&id)?),
            None => self.store.remove(SELECTED_WORKSPACE_KEY),
        }
    }
}
