//! Board transition records.

use crate::model::item::{Category, ItemId};
use serde::{Deserialize, Serialize};

/// Why an item went back to the uncategorized list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnCause {
    /// Caller invoked `deactivate` (directly or via selection).
    Manual,
    /// Pending reversal timer matured.
    Timeout,
}

impl ReturnCause {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Timeout => "timeout",
        }
    }
}

/// One applied board transition.
///
/// Serialized with a `type` tag so surfaces can persist or display a replayable
/// history of one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BoardAction {
    MoveToCategory { item_id: ItemId, category: Category },
    ReturnItem { item_id: ItemId, cause: ReturnCause },
}

impl BoardAction {
    pub fn item_id(&self) -> &str {
        match self {
            Self::MoveToCategory { item_id, .. } | Self::ReturnItem { item_id, .. } => item_id,
        }
    }
}
