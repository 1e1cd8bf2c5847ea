//! Dense 1-based ranking of a workspace's boards.
//!
//! # Responsibility
//! - Own the ordered board list of one workspace.
//! - Re-rank after every structural change (append, remove, reorder).
//!
//! # Invariants
//! - After any public mutation, `order` values are exactly `1..=len` and
//!   match each board's position.
//! - Reorder uses splice semantics: the moved board lands at the target's
//!   original index; the others keep their relative order.

use crate::model::board::Board;

/// Ordered board list with dense ranks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardSequencer {
    boards: Vec<Board>,
}

impl BoardSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a sequence from stored boards.
    ///
    /// Boards are stably sorted by their stored `order`, then re-ranked, so
    /// gaps or duplicates in stored data are repaired on load.
    pub fn from_boards(mut boards: Vec<Board>) -> Self {
        boards.sort_by_key(|board| board.order);
        let mut sequencer = Self { boards };
        sequencer.densify();
        sequencer
    }

    pub fn boards(&self) -> &[Board] {
        &self.boards
    }

    pub fn len(&self) -> usize {
        self.boards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boards.is_empty()
    }

    pub fn get(&self, board_id: &str) -> Option<&Board> {
        self.boards.iter().find(|board| board.id == board_id)
    }

    pub fn position(&self, board_id: &str) -> Option<usize> {
        self.boards.iter().position(|board| board.id == board_id)
    }

    /// Appends `board` as the last rank (`order = count + 1`).
    pub fn append(&mut self, mut board: Board) -> &Board {
        board.order = self.boards.len() as i64 + 1;
        self.boards.push(board);
        &self.boards[self.boards.len() - 1]
    }

    /// Replaces the stored board with the same id, keeping its rank.
    ///
    /// Returns `false` when no board has that id.
    pub fn replace(&mut self, mut board: Board) -> bool {
        let Some(index) = self.position(&board.id) else {
            return false;
        };
        board.order = self.boards[index].order;
        self.boards[index] = board;
        true
    }

    /// Moves `board_id` to `target_board_id`'s original position.
    ///
    /// Returns `false` (no mutation) when the ids are equal or either is unknown.
    pub fn reorder(&mut self, board_id: &str, target_board_id: &str) -> bool {
        if board_id == target_board_id {
            return false;
        }
        let (Some(from), Some(to)) = (self.position(board_id), self.position(target_board_id))
        else {
            return false;
        };

        let moved = self.boards.remove(from);
        let to = to.min(self.boards.len());
        self.boards.insert(to, moved);
        self.densify();
        true
    }

    /// Removes `board_id` and re-ranks the rest.
    pub fn remove(&mut self, board_id: &str) -> Option<Board> {
        let index = self.position(board_id)?;
        let removed = self.boards.remove(index);
        self.densify();
        Some(removed)
    }

    /// Returns whether ranks are exactly `1..=len` in position order.
    pub fn is_dense(&self) -> bool {
        self.boards
            .iter()
            .enumerate()
            .all(|(index, board)| board.order == index as i64 + 1)
    }

    fn densify(&mut self) {
        for (index, board) in self.boards.iter_mut().enumerate() {
            board.order = index as i64 + 1;
        }
    }
}
