//! Load/save guard between a workspace working set and the shared store.
//!
//! # Responsibility
//! - Track which workspace is loaded and whether its load has settled.
//! - Skip saves while a load is in progress or for a workspace that is no
//!   longer the loaded one.
//! - Run the workspace cascade delete outside the save path.
//!
//! # Invariants
//! - `Loading` is entered before the store is read and left only by
//!   `settle()`, after the caller has applied the loaded slice.
//! - `save` never writes while `phase != Ready`.
//! - A failed load leaves the guard `Idle` with no workspace.

use crate::model::board::Board;
use crate::model::card::Card;
use crate::repo::slice_repo::{CascadeReport, SliceRepository, WorkspaceSlice};
use crate::store::StoreResult;
use log::{debug, error, info};
use std::time::Instant;

/// Lifecycle of the workspace-scoped session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    /// No workspace loaded.
    Idle,
    /// Store read done or in progress; working set not yet settled.
    Loading,
    /// Working set settled; saves are allowed.
    Ready,
}

/// Result of one save attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Merged collections were written.
    Saved,
    /// A load is in progress; nothing was written.
    SkippedWhileLoading,
    /// No workspace is loaded; nothing was written.
    SkippedIdle,
    /// The save targets a workspace other than the loaded one.
    SkippedStaleWorkspace,
}

/// Phase-guarded persistence for one workspace-scoped session.
pub struct PersistenceSync<R: SliceRepository> {
    repo: R,
    phase: SyncPhase,
    workspace_key: Option<String>,
}

impl<R: SliceRepository> PersistenceSync<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            phase: SyncPhase::Idle,
            workspace_key: None,
        }
    }

    pub fn phase(&self) -> SyncPhase {
        self.phase
    }

    /// Key of the loaded (or loading) workspace.
    pub fn workspace_key(&self) -> Option<&str> {
        self.workspace_key.as_deref()
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Enters `Loading` for `workspace_key` and reads its slice.
    ///
    /// The caller applies the returned slice and then calls `settle()`.
    pub fn begin_load(&mut self, workspace_key: &str) -> StoreResult<WorkspaceSlice> {
        let started_at = Instant::now();
        self.phase = SyncPhase::Loading;
        self.workspace_key = Some(workspace_key.to_string());

        match self.repo.load_slice(workspace_key) {
            Ok(slice) => {
                info!(
                    "event=workspace_load module=sync status=ok workspace={workspace_key} boards={} cards={} duration_ms={}",
                    slice.boards.len(),
                    slice.cards.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(slice)
            }
            Err(err) => {
                error!(
                    "event=workspace_load module=sync status=error workspace={workspace_key} error={err}"
                );
                self.reset();
                Err(err)
            }
        }
    }

    /// Leaves `Loading` once the loaded slice has been applied.
    pub fn settle(&mut self) {
        if self.phase == SyncPhase::Loading {
            self.phase = SyncPhase::Ready;
        }
    }

    /// Forgets the loaded workspace without writing anything.
    pub fn reset(&mut self) {
        self.phase = SyncPhase::Idle;
        self.workspace_key = None;
    }

    /// Filter-then-merge save of `workspace_key`'s slice.
    pub fn save(
        &self,
        workspace_key: &str,
        boards: &[Board],
        cards: &[Card],
    ) -> StoreResult<SaveOutcome> {
        let skipped = match self.phase {
            SyncPhase::Loading => Some(SaveOutcome::SkippedWhileLoading),
            SyncPhase::Idle => Some(SaveOutcome::SkippedIdle),
            SyncPhase::Ready if self.workspace_key.as_deref() != Some(workspace_key) => {
                Some(SaveOutcome::SkippedStaleWorkspace)
            }
            SyncPhase::Ready => None,
        };
        if let Some(outcome) = skipped {
            debug!(
                "event=save_skipped module=sync status=ok workspace={workspace_key} reason={outcome:?}"
            );
            return Ok(outcome);
        }

        let started_at = Instant::now();
        self.repo.save_slice(workspace_key, boards, cards)?;
        debug!(
            "event=workspace_save module=sync status=ok workspace={workspace_key} boards={} cards={} duration_ms={}",
            boards.len(),
            cards.len(),
            started_at.elapsed().as_millis()
        );
        Ok(SaveOutcome::Saved)
    }

    /// Removes every stored record of `workspace_key`, bypassing `save`.
    ///
    /// When that workspace is the loaded one the guard returns to `Idle`, so
    /// no later save can resurrect its records.
    pub fn delete_workspace_cascade(&mut self, workspace_key: &str) -> StoreResult<CascadeReport> {
        if self.workspace_key.as_deref() == Some(workspace_key) {
            self.reset();
        }
        self.repo.delete_workspace_records(workspace_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::slice_repo::StoreSliceRepository;
    use crate::store::MemoryStore;

    #[test]
    fn save_is_skipped_until_load_settles() {
        let store = MemoryStore::new();
        let mut sync = PersistenceSync::new(StoreSliceRepository::new(&store));
        let board = Board::new("1", "Todo").unwrap();

        assert_eq!(
            sync.save("1", &[board.clone()], &[]).unwrap(),
            SaveOutcome::SkippedIdle
        );

        let slice = sync.begin_load("1").unwrap();
        assert!(slice.is_empty());
        assert_eq!(sync.phase(), SyncPhase::Loading);
        assert_eq!(
            sync.save("1", &[board.clone()], &[]).unwrap(),
            SaveOutcome::SkippedWhileLoading
        );
        assert!(store.is_empty());

        sync.settle();
        assert_eq!(sync.phase(), SyncPhase::Ready);
        assert_eq!(
            sync.save("1", &[board], &[]).unwrap(),
            SaveOutcome::Saved
        );
        assert!(!store.is_empty());
    }

    #[test]
    fn save_for_other_workspace_is_stale() {
        let store = MemoryStore::new();
        let mut sync = PersistenceSync::new(StoreSliceRepository::new(&store));
        sync.begin_load("2").unwrap();
        sync.settle();
        assert_eq!(
            sync.save("1", &[], &[]).unwrap(),
            SaveOutcome::SkippedStaleWorkspace
        );
    }

    #[test]
    fn cascade_of_loaded_workspace_returns_to_idle() {
        let store = MemoryStore::new();
        let mut sync = PersistenceSync::new(StoreSliceRepository::new(&store));
        sync.begin_load("1").unwrap();
        sync.settle();
        sync.save("1", &[Board::new("1", "Todo").unwrap()], &[])
            .unwrap();

        let report = sync.delete_workspace_cascade("1").unwrap();
        assert_eq!(report.boards_removed, 1);
        assert_eq!(sync.phase(), SyncPhase::Idle);
        assert_eq!(sync.workspace_key(), None);
    }
}
