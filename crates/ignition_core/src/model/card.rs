//! Card domain model.
//!
//! # Responsibility
//! - Define the task unit record and its wire shape.
//! - Provide validated construction and partial updates.
//!
//! # Invariants
//! - `workspace_id` never changes after creation.
//! - `board_id` and `parent_id` change only through move/reparent operations,
//!   never through `CardPatch`.
//! - `custom_statuses` holds at most five labels.
//! - `due_date = None` serializes as `null` and reads back as `None`.
//! - Dates are written as RFC 3339 and read through `model::timestamp`.

use crate::model::board::BoardId;
use crate::model::timestamp;
use crate::model::validation::{normalize_custom_statuses, normalize_title, ModelValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// String card identifier (`card-<uuid>` for cards created by this crate).
pub type CardId = String;

/// Primary status of a card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardStatus {
    Todo,
    Doing,
    Done,
    Blocked,
    /// No status chosen. Stored as an empty string.
    #[default]
    #[serde(rename = "", alias = "none")]
    None,
}

/// A task unit living on one board, optionally nested under a parent card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,
    pub board_id: BoardId,
    pub workspace_id: String,
    pub title: String,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub parent_id: Option<CardId>,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub date_created: DateTime<Utc>,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: CardStatus,
    #[serde(default)]
    pub custom_statuses: Vec<String>,
    #[serde(default)]
    pub is_minimized: bool,
}

impl Card {
    /// Creates a root-level card on `board_id` with a generated id.
    pub fn new(
        workspace_id: impl Into<String>,
        board_id: impl Into<BoardId>,
        title: &str,
        details: impl Into<String>,
    ) -> Result<Self, ModelValidationError> {
        Ok(Self {
            id: format!("card-{}", Uuid::new_v4()),
            board_id: board_id.into(),
            workspace_id: workspace_id.into(),
            title: normalize_title(title)?,
            details: details.into(),
            parent_id: None,
            date_created: Utc::now(),
            due_date: None,
            status: CardStatus::None,
            custom_statuses: Vec::new(),
            is_minimized: false,
        })
    }

    /// Returns whether this card sits at the root of its board.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Adds one custom status label.
    pub fn add_custom_status(&mut self, label: &str) -> Result<(), ModelValidationError> {
        let mut next = self.custom_statuses.clone();
        next.push(label.to_string());
        self.custom_statuses = normalize_custom_statuses(&next)?;
        Ok(())
    }

    /// Removes one custom status label. Returns whether it was present.
    pub fn remove_custom_status(&mut self, label: &str) -> bool {
        let before = self.custom_statuses.len();
        self.custom_statuses.retain(|existing| existing != label.trim());
        before != self.custom_statuses.len()
    }
}

/// Partial update for user-editable card fields.
///
/// `due_date: Some(None)` clears the due date; `None` leaves it unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardPatch {
    pub title: Option<String>,
    pub details: Option<String>,
    pub status: Option<CardStatus>,
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub custom_statuses: Option<Vec<String>>,
    pub is_minimized: Option<bool>,
}

impl CardPatch {
    /// Applies the patch to a copy of `card`, validating every provided field.
    pub fn apply_to(&self, card: &Card) -> Result<Card, ModelValidationError> {
        let mut next = card.clone();
        if let Some(title) = &self.title {
            next.title = normalize_title(title)?;
        }
        if let Some(details) = &self.details {
            next.details = details.clone();
        }
        if let Some(status) = self.status {
            next.status = status;
        }
        if let Some(due_date) = self.due_date {
            next.due_date = due_date;
        }
        if let Some(custom_statuses) = &self.custom_statuses {
            next.custom_statuses = normalize_custom_statuses(custom_statuses)?;
        }
        if let Some(is_minimized) = self.is_minimized {
            next.is_minimized = is_minimized;
        }
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn new_card_defaults() {
        let card = Card::new("1", "board-a", " Task1 ", "").unwrap();
        assert!(card.id.starts_with("card-"));
        assert_eq!(card.title, "Task1");
        assert!(card.is_root());
        assert_eq!(card.status, CardStatus::None);
        assert!(card.custom_statuses.is_empty());
        assert!(!card.is_minimized);
        assert_eq!(card.due_date, None);
    }

    #[test]
    fn new_card_rejects_blank_title() {
        let err = Card::new("1", "board-a", "   ", "details").unwrap_err();
        assert_eq!(err, ModelValidationError::BlankTitle);
    }

    #[test]
    fn status_wire_values() {
        assert_eq!(serde_json::to_value(CardStatus::Doing).unwrap(), "doing");
        assert_eq!(serde_json::to_value(CardStatus::None).unwrap(), "");
        let parsed: CardStatus = serde_json::from_value("none".into()).unwrap();
        assert_eq!(parsed, CardStatus::None);
    }

    #[test]
    fn card_wire_shape_uses_text_dates_and_null_due() {
        let mut card = Card::new("3", "board-a", "Ship", "").unwrap();
        card.date_created = Utc.with_ymd_and_hms(2026, 2, 13, 10, 0, 0).unwrap();

        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json["workspaceId"], "3");
        assert_eq!(json["boardId"], "board-a");
        assert!(json["parentId"].is_null());
        assert!(json["dueDate"].is_null());
        assert_eq!(json["dateCreated"], "2026-02-13T10:00:00Z");
        assert_eq!(json["isMinimized"], false);

        let decoded: Card = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, card);
    }

    #[test]
    fn card_reads_sparse_records() {
        let json = serde_json::json!({
            "id": "card-1",
            "boardId": "board-1",
            "workspaceId": "1",
            "title": "Legacy",
            "dateCreated": "2025-01-01T00:00:00Z",
            "status": ""
        });
        let card: Card = serde_json::from_value(json).unwrap();
        assert_eq!(card.details, "");
        assert_eq!(card.parent_id, None);
        assert_eq!(card.due_date, None);
        assert!(card.custom_statuses.is_empty());
    }

    #[test]
    fn card_reads_date_to_string_timestamps() {
        let json = serde_json::json!({
            "id": "1739440800000",
            "boardId": "1739440700000",
            "workspaceId": "1",
            "title": "Old card",
            "details": "",
            "parentId": null,
            "dateCreated": "Fri Feb 13 2026 10:00:00 GMT+0000 (Coordinated Universal Time)",
            "status": "todo"
        });
        let card: Card = serde_json::from_value(json).unwrap();
        assert_eq!(
            card.date_created,
            Utc.with_ymd_and_hms(2026, 2, 13, 10, 0, 0).unwrap()
        );
        assert_eq!(card.due_date, None);

        let reencoded = serde_json::to_value(&card).unwrap();
        assert_eq!(reencoded["dateCreated"], "2026-02-13T10:00:00Z");
    }

    #[test]
    fn custom_status_helpers_respect_limit() {
        let mut card = Card::new("1", "board-a", "Task", "").unwrap();
        for label in ["a", "b", "c", "d", "e"] {
            card.add_custom_status(label).unwrap();
        }
        assert!(matches!(
            card.add_custom_status("f"),
            Err(ModelValidationError::TooManyCustomStatuses { count: 6 })
        ));
        assert_eq!(card.custom_statuses.len(), 5);
        assert!(card.remove_custom_status("c"));
        assert!(!card.remove_custom_status("c"));
    }

    #[test]
    fn patch_clears_due_date_and_keeps_structure_fields() {
        let mut card = Card::new("1", "board-a", "Task", "").unwrap();
        card.due_date = Some(Utc.with_ymd_and_hms(2026, 5, 1, 0, 0, 0).unwrap());
        card.parent_id = Some("card-parent".to_string());

        let patch = CardPatch {
            due_date: Some(None),
            status: Some(CardStatus::Blocked),
            ..CardPatch::default()
        };
        let next = patch.apply_to(&card).unwrap();
        assert_eq!(next.due_date, None);
        assert_eq!(next.status, CardStatus::Blocked);
        assert_eq!(next.parent_id.as_deref(), Some("card-parent"));
        assert_eq!(next.board_id, "board-a");
    }
}
