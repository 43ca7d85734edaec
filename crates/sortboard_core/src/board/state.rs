//! Board collections and the pure transition reducer.
//!
//! # Responsibility
//! - Own the `uncategorized`, `fruits` and `vegetables` collections.
//! - Apply and replay `BoardAction` transitions deterministically.
//!
//! # Invariants
//! - Re-added items are appended at the end, guarded by a presence check.
//! - `apply` either fully applies one transition or leaves state untouched.

use crate::board::action::{BoardAction, ReturnCause};
use crate::board::{BoardError, BoardResult};
use crate::model::catalog::ItemCatalog;
use crate::model::item::{Category, Item};
use std::collections::HashMap;

/// Collection currently holding one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemLocation {
    Uncategorized,
    Categorized(Category),
}

impl ItemLocation {
    /// Stable string id used in logs and FFI payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Uncategorized => "uncategorized",
            Self::Categorized(Category::Fruit) => "fruit",
            Self::Categorized(Category::Vegetable) => "vegetable",
        }
    }

    pub fn is_uncategorized(self) -> bool {
        self == Self::Uncategorized
    }
}

/// Three disjoint ordered collections over one fixed catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardState {
    catalog: ItemCatalog,
    uncategorized: Vec<Item>,
    fruits: Vec<Item>,
    vegetables: Vec<Item>,
}

impl BoardState {
    /// Starts with every catalog item uncategorized, in catalog order.
    pub fn new(catalog: ItemCatalog) -> Self {
        let uncategorized = catalog.items().to_vec();
        Self {
            catalog,
            uncategorized,
            fruits: Vec::new(),
            vegetables: Vec::new(),
        }
    }

    /// Rebuilds state by applying `actions` in order to a fresh board.
    ///
    /// # Errors
    /// - Returns `UnknownItem` or `InconsistentState` from the first action
    ///   that cannot be applied.
    pub fn replay<'a>(
        catalog: ItemCatalog,
        actions: impl IntoIterator<Item = &'a BoardAction>,
    ) -> BoardResult<Self> {
        let mut state = Self::new(catalog);
        for action in actions {
            state.apply(action)?;
        }
        Ok(state)
    }

    pub fn catalog(&self) -> &ItemCatalog {
        &self.catalog
    }

    pub fn uncategorized(&self) -> &[Item] {
        &self.uncategorized
    }

    pub fn fruits(&self) -> &[Item] {
        &self.fruits
    }

    pub fn vegetables(&self) -> &[Item] {
        &self.vegetables
    }

    pub fn bucket(&self, category: Category) -> &[Item] {
        match category {
            Category::Fruit => &self.fruits,
            Category::Vegetable => &self.vegetables,
        }
    }

    /// Resolves an id against the catalog.
    pub fn item(&self, id: &str) -> BoardResult<&Item> {
        self.catalog
            .get(id)
            .ok_or_else(|| BoardError::UnknownItem(id.to_string()))
    }

    /// Returns which collection currently holds `id`.
    ///
    /// # Errors
    /// - `UnknownItem` when `id` is outside the catalog.
    /// - `InconsistentState` when a known item is in no collection.
    pub fn location_of(&self, id: &str) -> BoardResult<ItemLocation> {
        self.item(id)?;
        if contains(&self.uncategorized, id) {
            return Ok(ItemLocation::Uncategorized);
        }
        for category in [Category::Fruit, Category::Vegetable] {
            if contains(self.bucket(category), id) {
                return Ok(ItemLocation::Categorized(category));
            }
        }
        Err(BoardError::InconsistentState(format!(
            "item `{id}` is missing from every collection"
        )))
    }

    /// Applies one transition. Returns whether any collection changed.
    ///
    /// # Errors
    /// - `UnknownItem` when the action names an id outside the catalog.
    /// - `InconsistentState` when the action's category disagrees with the
    ///   catalog entry.
    pub fn apply(&mut self, action: &BoardAction) -> BoardResult<bool> {
        let item = self.item(action.item_id())?.clone();
        match action {
            BoardAction::MoveToCategory { category, .. } => {
                if *category != item.category {
                    return Err(BoardError::InconsistentState(format!(
                        "item `{}` has category `{}`, action requested `{}`",
                        item.id, item.category, category
                    )));
                }
                Ok(self.move_to_category(&item))
            }
            BoardAction::ReturnItem { .. } => Ok(self.return_item(&item)),
        }
    }

    /// Checks that every catalog item sits in exactly one collection once.
    pub fn verify(&self) -> BoardResult<()> {
        let mut counts: HashMap<&str, usize> = HashMap::with_capacity(self.catalog.len());
        for item in self
            .uncategorized
            .iter()
            .chain(self.fruits.iter())
            .chain(self.vegetables.iter())
        {
            if !self.catalog.contains(&item.id) {
                return Err(BoardError::InconsistentState(format!(
                    "collection holds unknown item `{}`",
                    item.id
                )));
            }
            *counts.entry(item.id.as_str()).or_default() += 1;
        }
        if let Some(misplaced) = self.fruits.iter().find(|i| i.category != Category::Fruit) {
            return Err(BoardError::InconsistentState(format!(
                "item `{}` sits in the fruit collection",
                misplaced.id
            )));
        }
        if let Some(misplaced) = self
            .vegetables
            .iter()
            .find(|i| i.category != Category::Vegetable)
        {
            return Err(BoardError::InconsistentState(format!(
                "item `{}` sits in the vegetable collection",
                misplaced.id
            )));
        }
        for item in self.catalog.items() {
            match counts.get(item.id.as_str()).copied().unwrap_or(0) {
                1 => {}
                n => {
                    return Err(BoardError::InconsistentState(format!(
                        "item `{}` appears {n} times across collections",
                        item.id
                    )))
                }
            }
        }
        Ok(())
    }

    fn move_to_category(&mut self, item: &Item) -> bool {
        let removed = remove(&mut self.uncategorized, &item.id);
        let bucket = self.bucket_mut(item.category);
        let added = if contains(bucket, &item.id) {
            false
        } else {
            bucket.push(item.clone());
            true
        };
        removed || added
    }

    fn return_item(&mut self, item: &Item) -> bool {
        let from_fruits = remove(&mut self.fruits, &item.id);
        let from_vegetables = remove(&mut self.vegetables, &item.id);
        let added = if contains(&self.uncategorized, &item.id) {
            false
        } else {
            self.uncategorized.push(item.clone());
            true
        };
        from_fruits || from_vegetables || added
    }

    fn bucket_mut(&mut self, category: Category) -> &mut Vec<Item> {
        match category {
            Category::Fruit => &mut self.fruits,
            Category::Vegetable => &mut self.vegetables,
        }
    }
}

/// Convenience constructor for return actions.
pub(crate) fn return_action(item_id: &str, cause: ReturnCause) -> BoardAction {
    BoardAction::ReturnItem {
        item_id: item_id.to_string(),
        cause,
    }
}

fn contains(items: &[Item], id: &str) -> bool {
    items.iter().any(|item| item.id == id)
}

fn remove(items: &mut Vec<Item>, id: &str) -> bool {
    let before = items.len();
    items.retain(|item| item.id != id);
    items.len() != before
}
