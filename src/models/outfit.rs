use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Occasion, WardrobeItem};
use crate::error::AppError;

/// One generated recommendation: a top, a bottom and shoes, in that order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outfit {
    /// UUID v7, so ids sort by generation time
    pub id: Uuid,
    pub occasion: Option<Occasion>,
    pub items: Vec<WardrobeItem>,
    pub created_at: DateTime<Utc>,
}

impl Outfit {
    pub(crate) fn new(items: Vec<WardrobeItem>, occasion: Option<Occasion>) -> Self {
        Self {
            id: Uuid::now_v7(),
            occasion,
            items,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Prev,
    Next,
}

/// The outfit under the history cursor and where it sits in the history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryView {
    pub outfit: Outfit,
    /// Zero-based cursor position
    pub index: usize,
    pub total: usize,
}

/// A wear that could not be logged while accepting an outfit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WearFailure {
    pub item_id: Uuid,
    pub error: String,
}

/// Why no follow-up outfit could be generated after an accept
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationFailure {
    pub code: String,
    pub error: String,
}

impl From<&AppError> for GenerationFailure {
    fn from(err: &AppError) -> Self {
        Self {
            code: err.code().to_string(),
            error: err.to_string(),
        }
    }
}

/// Result of accepting the current outfit.
///
/// Once any wear is logged the accept counts as done, even if no new outfit
/// could be generated. In that case `next` is empty and `next_error` says why;
/// the cursor stays on the accepted outfit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcceptOutcome {
    /// Items whose wear was logged, with their updated statistics
    pub worn: Vec<WardrobeItem>,
    pub failed: Vec<WearFailure>,
    /// The freshly generated outfit now under the cursor
    pub next: Option<HistoryView>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_error: Option<GenerationFailure>,
}
