//! Workspace-scoped board/card persistence over shared flat collections.
//!
//! # Responsibility
//! - Load one workspace's boards and cards out of `AllBoards` / `AllCards`.
//! - Save one workspace's slice back with a filter-then-merge write.
//! - Remove every record of a deleted workspace.
//!
//! # Invariants
//! - Records of other workspaces are carried over verbatim on every write,
//!   including records this build cannot decode.
//! - Records of the saved workspace that never decoded (so were never
//!   loaded) are carried over verbatim too; only a workspace delete drops them.
//! - Loaded boards are sorted by `order` ascending; loaded cards keep their
//!   stored relative order.
//! - This is the only write path for `AllBoards` / `AllCards`. Concurrent
//!   writers on one store are unsupported and may lose updates.

use crate::model::board::Board;
use crate::model::card::Card;
use crate::store::collection::{
    decode_records, decodes_as, encode_records, read_raw_records, record_id,
    record_workspace_key, write_raw_records, ALL_BOARDS_KEY, ALL_CARDS_KEY,
};
use crate::store::{KeyValueStore, StoreResult};
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashSet;

/// One workspace's boards and cards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkspaceSlice {
    /// Sorted by `order` ascending.
    pub boards: Vec<Board>,
    /// Stored relative order.
    pub cards: Vec<Card>,
}

impl WorkspaceSlice {
    pub fn is_empty(&self) -> bool {
        self.boards.is_empty() && self.cards.is_empty()
    }
}

/// Counts reported by a workspace cascade delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CascadeReport {
    pub boards_removed: usize,
    pub cards_removed: usize,
}

/// Repository interface for workspace-scoped board/card records.
pub trait SliceRepository {
    /// Loads the boards/cards whose `workspaceId` equals `workspace_key`.
    fn load_slice(&self, workspace_key: &str) -> StoreResult<WorkspaceSlice>;
    /// Replaces the stored records of `workspace_key` with the given slice.
    ///
    /// Own records that do not decode are kept.
    fn save_slice(&self, workspace_key: &str, boards: &[Board], cards: &[Card])
        -> StoreResult<()>;
    /// Removes every stored record of `workspace_key`.
    fn delete_workspace_records(&self, workspace_key: &str) -> StoreResult<CascadeReport>;
}

/// `SliceRepository` backed by a shared key-value store.
pub struct StoreSliceRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> StoreSliceRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Replaces `workspace_key`'s records under `key` with `fresh`.
    ///
    /// With `keep_undecodable`, own records that do not decode as `T` stay in
    /// place unless `fresh` carries the same id. Returns the removed count.
    fn merge_collection<T: DeserializeOwned>(
        &self,
        key: &str,
        workspace_key: &str,
        fresh: Vec<Value>,
        keep_undecodable: bool,
    ) -> StoreResult<usize> {
        let fresh_ids: HashSet<String> = fresh
            .iter()
            .filter_map(record_id)
            .map(str::to_string)
            .collect();

        let mut records = read_raw_records(&self.store, key)?;
        let before = records.len();
        let mut preserved = 0usize;
        records.retain(|record| {
            if record_workspace_key(record) != Some(workspace_key) {
                return true;
            }
            let keep = keep_undecodable
                && !decodes_as::<T>(record)
                && record_id(record).map_or(true, |id| !fresh_ids.contains(id));
            if keep {
                preserved += 1;
            }
            keep
        });
        let removed = before - records.len();

        if preserved > 0 {
            warn!(
                "event=workspace_save module=repo status=preserved key={key} workspace={workspace_key} undecodable={preserved}"
            );
        }
        records.extend(fresh);
        write_raw_records(&self.store, key, &records)?;
        Ok(removed)
    }
}

impl<S: KeyValueStore> SliceRepository for StoreSliceRepository<S> {
    fn load_slice(&self, workspace_key: &str) -> StoreResult<WorkspaceSlice> {
        let mut boards: Vec<Board> = decode_records(
            ALL_BOARDS_KEY,
            read_raw_records(&self.store, ALL_BOARDS_KEY)?,
        );
        boards.retain(|board| board.workspace_id == workspace_key);
        boards.sort_by_key(|board| board.order);

        let mut cards: Vec<Card> = decode_records(
            ALL_CARDS_KEY,
            read_raw_records(&self.store, ALL_CARDS_KEY)?,
        );
        cards.retain(|card| card.workspace_id == workspace_key);

        Ok(WorkspaceSlice { boards, cards })
    }

    fn save_slice(
        &self,
        workspace_key: &str,
        boards: &[Board],
        cards: &[Card],
    ) -> StoreResult<()> {
        let foreign_boards = boards
            .iter()
            .filter(|board| board.workspace_id != workspace_key)
            .count();
        let foreign_cards = cards
            .iter()
            .filter(|card| card.workspace_id != workspace_key)
            .count();
        if foreign_boards > 0 || foreign_cards > 0 {
            warn!(
                "event=workspace_save module=repo status=filtered workspace={workspace_key} foreign_boards={foreign_boards} foreign_cards={foreign_cards}"
            );
        }

        let own_boards: Vec<&Board> = boards
            .iter()
            .filter(|board| board.workspace_id == workspace_key)
            .collect();
        let own_cards: Vec<&Card> = cards
            .iter()
            .filter(|card| card.workspace_id == workspace_key)
            .collect();

        self.merge_collection::<Board>(
            ALL_BOARDS_KEY,
            workspace_key,
            encode_records(&own_boards)?,
            true,
        )?;
        self.merge_collection::<Card>(
            ALL_CARDS_KEY,
            workspace_key,
            encode_records(&own_cards)?,
            true,
        )?;
        Ok(())
    }

    fn delete_workspace_records(&self, workspace_key: &str) -> StoreResult<CascadeReport> {
        let boards_removed =
            self.merge_collection::<Board>(ALL_BOARDS_KEY, workspace_key, Vec::new(), false)?;
        let cards_removed =
            self.merge_collection::<Card>(ALL_CARDS_KEY, workspace_key, Vec::new(), false)?;
        info!(
            "event=workspace_cascade_delete module=repo status=ok workspace={workspace_key} boards_removed={boards_removed} cards_removed={cards_removed}"
        );
        Ok(CascadeReport {
            boards_removed,
            cards_removed,
        })
    }
}
