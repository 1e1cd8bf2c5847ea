//! Board domain model.
//!
//! # Invariants
//! - A board belongs to exactly one workspace (`workspace_id`).
//! - `order` is a dense 1-based rank inside its workspace, maintained by
//!   `sequence::BoardSequencer`.

use crate::model::validation::{normalize_color, normalize_title, ModelValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// String board identifier (`board-<uuid>` for boards created by this crate).
pub type BoardId = String;

/// An ordered column of cards within a workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: BoardId,
    pub workspace_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub order: i64,
    #[serde(default)]
    pub color: String,
}

impl Board {
    /// Creates an unranked board with a generated id.
    ///
    /// `order` starts at 0; the sequencer assigns the real rank on append.
    pub fn new(
        workspace_id: impl Into<String>,
        title: &str,
    ) -> Result<Self, ModelValidationError> {
        Ok(Self {
            id: format!("board-{}", Uuid::new_v4()),
            workspace_id: workspace_id.into(),
            title: normalize_title(title)?,
            description: String::new(),
            order: 0,
            color: String::new(),
        })
    }
}

/// Partial update for user-editable board fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
}

impl BoardPatch {
    /// Applies the patch to a copy of `board`, validating every provided field.
    ///
    /// The original is left untouched when validation fails.
    pub fn apply_to(&self, board: &Board) -> Result<Board, ModelValidationError> {
        let mut next = board.clone();
        if let Some(title) = &self.title {
            next.title = normalize_title(title)?;
        }
        if let Some(description) = &self.description {
            next.description = description.clone();
        }
        if let Some(color) = &self.color {
            next.color = normalize_color(color)?;
        }
        Ok(next)
    }
}
