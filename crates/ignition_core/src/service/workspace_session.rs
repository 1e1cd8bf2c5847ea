//! Workspace-scoped working set and its mutation entry points.
//!
//! # Responsibility
//! - Hold one workspace's boards and cards in memory.
//! - Expose create/update/delete/reorder/reparent/move operations that keep
//!   the forest and dense-rank invariants.
//! - Autosave every successful mutation through `PersistenceSync`.
//!
//! # Invariants
//! - Rejected operations (validation failure, cycle veto) leave the working
//!   set unchanged.
//! - A mutation whose store write fails leaves the working set unchanged;
//!   the change is applied to a copy and adopted only once saved.
//! - Descendants always share their root's board after a move-to-board.
//! - Switching workspaces flushes the outgoing slice before the new load.

use crate::model::board::{Board, BoardId, BoardPatch};
use crate::model::card::{Card, CardId, CardPatch};
use crate::model::validation::ModelValidationError;
use crate::model::workspace::{workspace_key, WorkspaceId};
use crate::repo::slice_repo::{CascadeReport, SliceRepository};
use crate::sequence::board_sequencer::BoardSequencer;
use crate::store::StoreError;
use crate::sync::persistence_sync::{PersistenceSync, SaveOutcome, SyncPhase};
use crate::tree::card_tree::CardTree;
use log::{debug, info};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type SessionResult<T> = Result<T, SessionError>;

/// Errors from workspace session operations.
#[derive(Debug)]
pub enum SessionError {
    /// Field validation failed; nothing was changed.
    Validation(ModelValidationError),
    /// Operation needs a loaded workspace.
    NoWorkspaceLoaded,
    /// Board id is not part of the loaded workspace.
    BoardNotFound(BoardId),
    /// Card id is not part of the loaded workspace.
    CardNotFound(CardId),
    /// Store transport failure.
    Store(StoreError),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NoWorkspaceLoaded => write!(f, "no workspace is loaded"),
            Self::BoardNotFound(id) => write!(f, "board not found: {id}"),
            Self::CardNotFound(id) => write!(f, "card not found: {id}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ModelValidationError> for SessionError {
    fn from(value: ModelValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for SessionError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Board/card counts of one workspace, for delete confirmation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkspaceImpact {
    pub boards: usize,
    pub cards: usize,
}

impl WorkspaceImpact {
    pub fn is_empty(&self) -> bool {
        self.boards == 0 && self.cards == 0
    }
}

/// In-memory working set of one workspace, persisted through `R`.
pub struct WorkspaceSession<R: SliceRepository> {
    sync: PersistenceSync<R>,
    workspace_id: Option<WorkspaceId>,
    boards: BoardSequencer,
    cards: Vec<Card>,
    dirty: bool,
}

impl<R: SliceRepository> WorkspaceSession<R> {
    pub fn new(repo: R) -> Self {
        Self {
            sync: PersistenceSync::new(repo),
            workspace_id: None,
            boards: BoardSequencer::new(),
            cards: Vec::new(),
            dirty: false,
        }
    }

    pub fn phase(&self) -> SyncPhase {
        self.sync.phase()
    }

    pub fn workspace_id(&self) -> Option<WorkspaceId> {
        self.workspace_id
    }

    /// `workspaceId` filter key of the loaded workspace.
    pub fn workspace_key(&self) -> Option<String> {
        self.workspace_id.map(workspace_key)
    }

    /// Whether the working set has changes not yet written.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Loads `workspace_id`, flushing the outgoing workspace first.
    pub fn load(&mut self, workspace_id: WorkspaceId) -> SessionResult<()> {
        self.flush()?;

        let key = workspace_key(workspace_id);
        let slice = match self.sync.begin_load(&key) {
            Ok(slice) => slice,
            Err(err) => {
                self.workspace_id = None;
                self.boards = BoardSequencer::new();
                self.cards.clear();
                self.dirty = false;
                return Err(err.into());
            }
        };
        self.boards = BoardSequencer::from_boards(slice.boards);
        self.cards = slice.cards;
        self.workspace_id = Some(workspace_id);
        self.dirty = false;
        self.sync.settle();
        Ok(())
    }

    /// Loads `workspace_id` unless it is already the settled workspace.
    pub fn switch_workspace(&mut self, workspace_id: WorkspaceId) -> SessionResult<()> {
        if self.workspace_id == Some(workspace_id) && self.phase() == SyncPhase::Ready {
            return Ok(());
        }
        self.load(workspace_id)
    }

    /// Writes pending changes of the loaded workspace, if any.
    pub fn flush(&mut self) -> SessionResult<Option<SaveOutcome>> {
        let Some(key) = self.workspace_key().filter(|_| self.dirty) else {
            return Ok(None);
        };
        let outcome = self.sync.save(&key, self.boards.boards(), &self.cards)?;
        if outcome == SaveOutcome::Saved {
            self.dirty = false;
        }
        Ok(Some(outcome))
    }

    /// Removes every stored record of `workspace_id`.
    ///
    /// A loaded working set of that workspace is discarded unsaved.
    pub fn delete_workspace_cascade(
        &mut self,
        workspace_id: WorkspaceId,
    ) -> SessionResult<CascadeReport> {
        if self.workspace_id == Some(workspace_id) {
            self.workspace_id = None;
            self.boards = BoardSequencer::new();
            self.cards.clear();
            self.dirty = false;
        }
        Ok(self
            .sync
            .delete_workspace_cascade(&workspace_key(workspace_id))?)
    }

    /// Board/card counts of `workspace_id`, read from memory when loaded.
    pub fn workspace_impact(&self, workspace_id: WorkspaceId) -> SessionResult<WorkspaceImpact> {
        if self.workspace_id == Some(workspace_id) {
            return Ok(WorkspaceImpact {
                boards: self.boards.len(),
                cards: self.cards.len(),
            });
        }
        let slice = self.sync.repo().load_slice(&workspace_key(workspace_id))?;
        Ok(WorkspaceImpact {
            boards: slice.boards.len(),
            cards: slice.cards.len(),
        })
    }

    /// Boards in rank order.
    pub fn boards(&self) -> &[Board] {
        self.boards.boards()
    }

    /// Cards in working-set order.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn board(&self, board_id: &str) -> Option<&Board> {
        self.boards.get(board_id)
    }

    pub fn card(&self, card_id: &str) -> Option<&Card> {
        self.cards.iter().find(|card| card.id == card_id)
    }

    /// Root-level cards of one board in working-set order.
    pub fn cards_on_board(&self, board_id: &str) -> Vec<&Card> {
        self.cards
            .iter()
            .filter(|card| card.board_id == board_id && card.is_root())
            .collect()
    }

    /// Direct children of one card in working-set order.
    pub fn children_of(&self, card_id: &str) -> Vec<&Card> {
        self.cards
            .iter()
            .filter(|card| card.parent_id.as_deref() == Some(card_id))
            .collect()
    }

    /// Number of descendants a `delete_card` would remove besides the card.
    pub fn card_delete_impact(&self, card_id: &str) -> SessionResult<usize> {
        self.require_card(card_id)?;
        Ok(CardTree::new(&self.cards).descendant_count(card_id))
    }

    /// Number of cards a `delete_board` would remove.
    pub fn board_delete_impact(&self, board_id: &str) -> SessionResult<usize> {
        self.require_board(board_id)?;
        Ok(self.board_delete_set(board_id).len())
    }

    /// Returns whether reparenting `card_id` under `new_parent_id` is vetoed.
    pub fn would_create_cycle(&self, card_id: &str, new_parent_id: &str) -> bool {
        CardTree::new(&self.cards).would_create_cycle(card_id, new_parent_id)
    }

    /// Creates a board at the last rank.
    pub fn create_board(&mut self, title: &str) -> SessionResult<Board> {
        let key = self.require_loaded()?;
        let board = Board::new(key, title)?;
        self.commit(|boards, _| boards.append(board).clone())
    }

    /// Updates title/description/color of one board.
    pub fn update_board(&mut self, board_id: &str, patch: &BoardPatch) -> SessionResult<Board> {
        let current = self.require_board(board_id)?;
        let next = patch.apply_to(current)?;
        if &next == current {
            return Ok(next);
        }
        let stored = next.clone();
        self.commit(move |boards, _| {
            boards.replace(stored);
        })?;
        Ok(next)
    }

    /// Deletes one board with every card on it and their descendants.
    ///
    /// Returns the number of cards removed.
    pub fn delete_board(&mut self, board_id: &str) -> SessionResult<usize> {
        self.require_board(board_id)?;
        let doomed = self.board_delete_set(board_id);
        self.commit(|boards, cards| {
            cards.retain(|card| !doomed.contains(&card.id));
            boards.remove(board_id);
        })?;
        info!(
            "event=board_delete module=session status=ok cards_removed={}",
            doomed.len()
        );
        Ok(doomed.len())
    }

    /// Moves `board_id` to `target_board_id`'s position.
    ///
    /// Returns `false` when dropping a board onto itself.
    pub fn reorder_board(&mut self, board_id: &str, target_board_id: &str) -> SessionResult<bool> {
        self.require_board(board_id)?;
        self.require_board(target_board_id)?;
        if board_id == target_board_id {
            return Ok(false);
        }
        self.commit(|boards, _| boards.reorder(board_id, target_board_id))
    }

    /// Creates a root-level card on `board_id`.
    pub fn create_card(
        &mut self,
        board_id: &str,
        title: &str,
        details: &str,
    ) -> SessionResult<Card> {
        let key = self.require_loaded()?;
        self.require_board(board_id)?;
        let card = Card::new(key, board_id, title, details)?;
        let stored = card.clone();
        self.commit(move |_, cards| cards.push(stored))?;
        Ok(card)
    }

    /// Creates a card nested under `parent_id`, on the parent's board.
    pub fn create_sub_card(
        &mut self,
        parent_id: &str,
        title: &str,
        details: &str,
    ) -> SessionResult<Card> {
        let key = self.require_loaded()?;
        let parent = self.require_card(parent_id)?;
        let mut card = Card::new(key, parent.board_id.clone(), title, details)?;
        card.parent_id = Some(parent.id.clone());
        let stored = card.clone();
        self.commit(move |_, cards| cards.push(stored))?;
        Ok(card)
    }

    /// Applies a field patch to one card.
    pub fn update_card(&mut self, card_id: &str, patch: &CardPatch) -> SessionResult<Card> {
        let index = self.card_index(card_id)?;
        let next = patch.apply_to(&self.cards[index])?;
        if next == self.cards[index] {
            return Ok(next);
        }
        let stored = next.clone();
        self.commit(move |_, cards| cards[index] = stored)?;
        Ok(next)
    }

    /// Flips `is_minimized` and returns the new value.
    pub fn toggle_minimized(&mut self, card_id: &str) -> SessionResult<bool> {
        let index = self.card_index(card_id)?;
        let value = !self.cards[index].is_minimized;
        self.commit(|_, cards| cards[index].is_minimized = value)?;
        Ok(value)
    }

    /// Adds one custom status label to a card.
    pub fn add_custom_status(&mut self, card_id: &str, label: &str) -> SessionResult<Card> {
        let index = self.card_index(card_id)?;
        let mut next = self.cards[index].clone();
        next.add_custom_status(label)?;
        let stored = next.clone();
        self.commit(move |_, cards| cards[index] = stored)?;
        Ok(next)
    }

    /// Removes one custom status label. Returns `false` when it was absent.
    pub fn remove_custom_status(&mut self, card_id: &str, label: &str) -> SessionResult<bool> {
        let index = self.card_index(card_id)?;
        let mut next = self.cards[index].clone();
        if !next.remove_custom_status(label) {
            return Ok(false);
        }
        self.commit(move |_, cards| cards[index] = next)?;
        Ok(true)
    }

    /// Deletes one card and all of its descendants.
    ///
    /// Returns the number of cards removed, the card itself included.
    pub fn delete_card(&mut self, card_id: &str) -> SessionResult<usize> {
        self.require_card(card_id)?;
        let doomed = CardTree::new(&self.cards).cascade_delete_set(card_id);
        self.commit(|_, cards| cards.retain(|card| !doomed.contains(&card.id)))?;
        Ok(doomed.len())
    }

    /// Nests `card_id` under `new_parent_id`, keeping its board.
    ///
    /// Returns `false` without mutation when the move would create a cycle
    /// or the card already has that parent.
    pub fn reparent_card(&mut self, card_id: &str, new_parent_id: &str) -> SessionResult<bool> {
        let index = self.card_index(card_id)?;
        self.require_card(new_parent_id)?;

        if self.would_create_cycle(card_id, new_parent_id) {
            debug!("event=card_reparent module=session status=rejected reason=cycle");
            return Ok(false);
        }
        if self.cards[index].parent_id.as_deref() == Some(new_parent_id) {
            return Ok(false);
        }

        let parent_id = new_parent_id.to_string();
        self.commit(move |_, cards| cards[index].parent_id = Some(parent_id))?;
        Ok(true)
    }

    /// Moves `card_id` to the root of `board_id`, carrying its descendants.
    ///
    /// Descendants keep their `parent_id` links. Returns `false` when nothing
    /// changed.
    pub fn move_card_to_board(&mut self, card_id: &str, board_id: &str) -> SessionResult<bool> {
        let index = self.card_index(card_id)?;
        self.require_board(board_id)?;

        let subtree: HashSet<CardId> = CardTree::new(&self.cards)
            .descendants_of(card_id)
            .into_iter()
            .collect();

        let root = &self.cards[index];
        let root_moves = root.parent_id.is_some() || root.board_id != board_id;
        let subtree_moves = self
            .cards
            .iter()
            .any(|card| subtree.contains(&card.id) && card.board_id != board_id);
        if !root_moves && !subtree_moves {
            return Ok(false);
        }

        self.commit(|_, cards| {
            let root = &mut cards[index];
            root.parent_id = None;
            root.board_id = board_id.to_string();
            for card in cards.iter_mut().filter(|card| subtree.contains(&card.id)) {
                card.board_id = board_id.to_string();
            }
        })?;
        Ok(true)
    }

    /// Lifts `card_id` to the root of its current board.
    pub fn detach_card(&mut self, card_id: &str) -> SessionResult<bool> {
        let board_id = self.require_card(card_id)?.board_id.clone();
        self.move_card_to_board(card_id, &board_id)
    }

    fn require_loaded(&self) -> SessionResult<String> {
        match (self.workspace_id, self.phase()) {
            (Some(id), SyncPhase::Ready) => Ok(workspace_key(id)),
            _ => Err(SessionError::NoWorkspaceLoaded),
        }
    }

    fn require_board(&self, board_id: &str) -> SessionResult<&Board> {
        self.require_loaded()?;
        self.boards
            .get(board_id)
            .ok_or_else(|| SessionError::BoardNotFound(board_id.to_string()))
    }

    fn require_card(&self, card_id: &str) -> SessionResult<&Card> {
        let index = self.card_index(card_id)?;
        Ok(&self.cards[index])
    }

    fn card_index(&self, card_id: &str) -> SessionResult<usize> {
        self.require_loaded()?;
        self.cards
            .iter()
            .position(|card| card.id == card_id)
            .ok_or_else(|| SessionError::CardNotFound(card_id.to_string()))
    }

    fn board_delete_set(&self, board_id: &str) -> HashSet<CardId> {
        let tree = CardTree::new(&self.cards);
        let mut doomed = HashSet::new();
        for card in self.cards.iter().filter(|card| card.board_id == board_id) {
            if doomed.contains(&card.id) {
                continue;
            }
            doomed.extend(tree.cascade_delete_set(&card.id));
        }
        doomed
    }

    /// Applies `mutate` to a copy of the working set and adopts the copy
    /// only after the store accepted it.
    fn commit<T>(
        &mut self,
        mutate: impl FnOnce(&mut BoardSequencer, &mut Vec<Card>) -> T,
    ) -> SessionResult<T> {
        let key = self.require_loaded()?;
        let mut boards = self.boards.clone();
        let mut cards = self.cards.clone();
        let value = mutate(&mut boards, &mut cards);

        let outcome = self.sync.save(&key, boards.boards(), &cards)?;
        self.boards = boards;
        self.cards = cards;
        self.dirty = outcome != SaveOutcome::Saved;
        Ok(value)
    }
}
