//! Board item domain model.
//!
//! # Responsibility
//! - Define the canonical record rendered by every board surface.
//! - Keep category assignment fixed for the lifetime of an item.
//!
//! # Invariants
//! - `id` is stable and unique within one catalog.
//! - `category` never changes after construction.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Stable identifier for one board item.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type ItemId = String;

/// Destination bucket an item moves into when activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Category A.
    Fruit,
    /// Category B.
    Vegetable,
}

impl Category {
    /// Stable string id used in logs and FFI payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fruit => "fruit",
            Self::Vegetable => "vegetable",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One selectable entry on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    /// Display label.
    pub name: String,
    pub category: Category,
}

impl Item {
    /// Creates an item with a caller-provided stable ID.
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>, category: Category) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
        }
    }

    /// Creates an item whose ID equals its display name.
    pub fn named(name: impl Into<String>, category: Category) -> Self {
        let name = name.into();
        Self::new(name.clone(), name, category)
    }
}
