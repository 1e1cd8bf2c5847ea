//! Field-level validation shared by workspace/board/card writes.
//!
//! # Responsibility
//! - Normalize user-entered titles and labels before they reach the model.
//! - Reject values that would break entity invariants.
//!
//! # Invariants
//! - Stored titles are trimmed and never blank.
//! - Stored colors are empty or `#RGB` / `#RRGGBB`.
//! - A card carries at most `MAX_CUSTOM_STATUSES` distinct, non-blank labels.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Upper bound for `Card::custom_statuses`.
pub const MAX_CUSTOM_STATUSES: usize = 5;

static HEX_COLOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("valid hex color regex")
});

/// Validation failures for entity writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelValidationError {
    /// Title or name is empty after trim.
    BlankTitle,
    /// Board color is neither empty nor a hex color.
    InvalidColor(String),
    /// More custom statuses than allowed.
    TooManyCustomStatuses { count: usize },
    /// Custom status label is empty after trim.
    BlankCustomStatus,
    /// Custom status label appears twice.
    DuplicateCustomStatus(String),
}

impl Display for ModelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTitle => write!(f, "title must not be blank"),
            Self::InvalidColor(value) => write!(f, "invalid board color `{value}`"),
            Self::TooManyCustomStatuses { count } => write!(
                f,
                "card allows at most {MAX_CUSTOM_STATUSES} custom statuses, got {count}"
            ),
            Self::BlankCustomStatus => write!(f, "custom status must not be blank"),
            Self::DuplicateCustomStatus(value) => {
                write!(f, "custom status `{value}` is already present")
            }
        }
    }
}

impl Error for ModelValidationError {}

/// Trims a title and rejects blank input.
pub fn normalize_title(value: &str) -> Result<String, ModelValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ModelValidationError::BlankTitle);
    }
    Ok(trimmed.to_string())
}

/// Accepts an empty color or a `#RGB` / `#RRGGBB` hex string.
pub fn normalize_color(value: &str) -> Result<String, ModelValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(String::new());
    }
    if !HEX_COLOR_RE.is_match(trimmed) {
        return Err(ModelValidationError::InvalidColor(trimmed.to_string()));
    }
    Ok(trimmed.to_ascii_lowercase())
}

/// Trims every label and enforces the count/blank/duplicate rules.
pub fn normalize_custom_statuses(
    values: &[String],
) -> Result<Vec<String>, ModelValidationError> {
    if values.len() > MAX_CUSTOM_STATUSES {
        return Err(ModelValidationError::TooManyCustomStatuses {
            count: values.len(),
        });
    }

    let mut normalized: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ModelValidationError::BlankCustomStatus);
        }
        if normalized.iter().any(|existing| existing == trimmed) {
            return Err(ModelValidationError::DuplicateCustomStatus(
                trimmed.to_string(),
            ));
        }
        normalized.push(trimmed.to_string());
    }
    Ok(normalized)
}
