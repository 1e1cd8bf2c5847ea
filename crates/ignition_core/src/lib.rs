//! Core domain logic for Ignition boards.
//! This crate owns the workspace/board/card invariants and their persistence.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod sequence;
pub mod service;
pub mod store;
pub mod sync;
pub mod tree;

pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::board::{Board, BoardId, BoardPatch};
pub use model::card::{Card, CardId, CardPatch, CardStatus};
pub use model::validation::{ModelValidationError, MAX_CUSTOM_STATUSES};
pub use model::workspace::{workspace_key, Workspace, WorkspaceId};
pub use repo::slice_repo::{CascadeReport, SliceRepository, StoreSliceRepository, WorkspaceSlice};
pub use repo::workspace_repo::{StoreWorkspaceRepository, WorkspaceRepository};
pub use sequence::board_sequencer::BoardSequencer;
pub use service::drag_drop::{DragDropCoordinator, DragItem, DropOutcome, DropTarget, RejectReason};
pub use service::workspace_service::{
    WorkspaceService, WorkspaceServiceError, WorkspaceServiceResult,
};
pub use service::workspace_session::{
    SessionError, SessionResult, WorkspaceImpact, WorkspaceSession,
};
pub use store::{KeyValueStore, MemoryStore, SqliteStore, StoreError, StoreResult};
pub use sync::persistence_sync::{PersistenceSync, SaveOutcome, SyncPhase};
pub use tree::card_tree::CardTree;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
