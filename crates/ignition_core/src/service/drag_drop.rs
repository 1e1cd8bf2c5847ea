//! Drag-and-drop gesture interpretation.
//!
//! # Responsibility
//! - Hold the transient "currently dragging" state of one UI session.
//! - Map a drop onto exactly one of: board reorder, card reparent, card
//!   move-to-board.
//!
//! # Invariants
//! - Drag state is never persisted and is cleared by every drop or drag end.
//! - A rejected drop performs no mutation.
//! - The drop target is given explicitly; nothing is inferred from coordinates.

use crate::model::board::BoardId;
use crate::model::card::CardId;
use crate::repo::slice_repo::SliceRepository;
use crate::service::workspace_session::{SessionError, SessionResult, WorkspaceSession};
use log::debug;

/// What the user picked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragItem {
    Board(BoardId),
    Card(CardId),
}

/// Where the user let go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    /// Background area of a board, not on any card.
    Board(BoardId),
    /// Directly on a card.
    Card(CardId),
}

/// Why a drop was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Item dropped onto itself.
    SelfDrop,
    /// Reparenting would put a card under itself or its descendant.
    WouldCreateCycle,
    /// Dragged item or target no longer exists.
    NotFound,
}

/// Result of interpreting one drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    BoardReordered,
    CardReparented,
    CardMovedToBoard,
    Rejected(RejectReason),
    /// No drag in progress, unsupported combination, or nothing changed.
    Ignored,
}

/// Two-phase drag protocol: `drag_start`, then `drop_on` or `drag_end`.
#[derive(Debug, Default)]
pub struct DragDropCoordinator {
    dragged: Option<DragItem>,
}

impl DragDropCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the picked-up item, replacing any stale one.
    pub fn drag_start(&mut self, item: DragItem) {
        self.dragged = Some(item);
    }

    /// Clears drag state without a drop (cancel, or drop outside any target).
    pub fn drag_end(&mut self) {
        self.dragged = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.dragged.is_some()
    }

    pub fn dragged(&self) -> Option<&DragItem> {
        self.dragged.as_ref()
    }

    /// Consumes the drag state and applies the matching operation to `session`.
    pub fn drop_on<R: SliceRepository>(
        &mut self,
        target: DropTarget,
        session: &mut WorkspaceSession<R>,
    ) -> SessionResult<DropOutcome> {
        let Some(item) = self.dragged.take() else {
            return Ok(DropOutcome::Ignored);
        };

        let outcome = match (item, target) {
            (DragItem::Board(board_id), DropTarget::Board(target_id)) => {
                if board_id == target_id {
                    Ok(DropOutcome::Rejected(RejectReason::SelfDrop))
                } else {
                    session
                        .reorder_board(&board_id, &target_id)
                        .map(|changed| changed_or_ignored(changed, DropOutcome::BoardReordered))
                }
            }
            (DragItem::Board(_), DropTarget::Card(_)) => Ok(DropOutcome::Ignored),
            (DragItem::Card(card_id), DropTarget::Card(target_id)) => {
                if session.would_create_cycle(&card_id, &target_id) {
                    Ok(DropOutcome::Rejected(RejectReason::WouldCreateCycle))
                } else {
                    session
                        .reparent_card(&card_id, &target_id)
                        .map(|changed| changed_or_ignored(changed, DropOutcome::CardReparented))
                }
            }
            (DragItem::Card(card_id), DropTarget::Board(board_id)) => session
                .move_card_to_board(&card_id, &board_id)
                .map(|changed| changed_or_ignored(changed, DropOutcome::CardMovedToBoard)),
        };

        let outcome = match outcome {
            Err(SessionError::BoardNotFound(_)) | Err(SessionError::CardNotFound(_)) => {
                Ok(DropOutcome::Rejected(RejectReason::NotFound))
            }
            other => other,
        };
        if let Ok(value) = &outcome {
            debug!("event=drag_drop module=drag status=ok outcome={value:?}");
        }
        outcome
    }
}

fn changed_or_ignored(changed: bool, outcome: DropOutcome) -> DropOutcome {
    if changed {
        outcome
    } else {
        DropOutcome::Ignored
    }
}
