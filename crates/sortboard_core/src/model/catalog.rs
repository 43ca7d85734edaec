//! Fixed item universe for one board session.
//!
//! # Responsibility
//! - Validate the item set before any engine is built on top of it.
//! - Provide the built-in produce catalog used by FFI and CLI surfaces.
//!
//! # Invariants
//! - IDs are non-blank and unique.
//! - Catalog order is preserved and used as the initial `uncategorized` order.

use crate::model::item::{Category, Item, ItemId};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

const PRODUCE: &[(&str, Category)] = &[
    ("Apple", Category::Fruit),
    ("Broccoli", Category::Vegetable),
    ("Mushroom", Category::Vegetable),
    ("Banana", Category::Fruit),
    ("Tomato", Category::Vegetable),
    ("Orange", Category::Fruit),
    ("Mango", Category::Fruit),
    ("Pineapple", Category::Fruit),
    ("Cucumber", Category::Vegetable),
    ("Watermelon", Category::Fruit),
    ("Carrot", Category::Vegetable),
];

/// Catalog validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    Empty,
    BlankItemId,
    BlankItemName(ItemId),
    DuplicateItemId(ItemId),
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "catalog must contain at least one item"),
            Self::BlankItemId => write!(f, "item id cannot be blank"),
            Self::BlankItemName(id) => write!(f, "item name cannot be blank: {id}"),
            Self::DuplicateItemId(id) => write!(f, "item id already registered: {id}"),
        }
    }
}

impl Error for CatalogError {}

/// Ordered, duplicate-free set of items known to a board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemCatalog {
    items: Vec<Item>,
}

impl ItemCatalog {
    /// Builds a catalog after validating every entry.
    ///
    /// # Errors
    /// - `Empty` when no items are supplied.
    /// - `BlankItemId` / `BlankItemName` for whitespace-only fields.
    /// - `DuplicateItemId` when two entries share one id.
    pub fn new(items: Vec<Item>) -> Result<Self, CatalogError> {
        if items.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if item.id.trim().is_empty() {
                return Err(CatalogError::BlankItemId);
            }
            if item.name.trim().is_empty() {
                return Err(CatalogError::BlankItemName(item.id.clone()));
            }
            if !seen.insert(item.id.as_str()) {
                return Err(CatalogError::DuplicateItemId(item.id.clone()));
            }
        }

        Ok(Self { items })
    }

    /// Built-in fruit/vegetable catalog.
    pub fn produce() -> Self {
        Self {
            items: PRODUCE
                .iter()
                .map(|(name, category)| Item::named(*name, *category))
                .collect(),
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{CatalogError, ItemCatalog};
    use crate::model::item::{Category, Item};

    #[test]
    fn produce_catalog_has_eleven_unique_items() {
        let catalog = ItemCatalog::produce();
        assert_eq!(catalog.len(), 11);
        assert_eq!(catalog.items()[0].id, "Apple");
        assert_eq!(catalog.items()[10].id, "Carrot");
        assert_eq!(
            catalog.get("Mushroom").map(|item| item.category),
            Some(Category::Vegetable)
        );
        ItemCatalog::new(catalog.items().to_vec()).expect("built-in catalog should validate");
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = ItemCatalog::new(vec![
            Item::named("Apple", Category::Fruit),
            Item::new("Apple", "Green apple", Category::Fruit),
        ])
        .expect_err("duplicate ids must be rejected");
        assert_eq!(err, CatalogError::DuplicateItemId("Apple".to_string()));
    }

    #[test]
    fn rejects_blank_fields_and_empty_input() {
        assert_eq!(ItemCatalog::new(vec![]), Err(CatalogError::Empty));
        assert_eq!(
            ItemCatalog::new(vec![Item::new("  ", "Blank", Category::Fruit)]),
            Err(CatalogError::BlankItemId)
        );
        assert_eq!(
            ItemCatalog::new(vec![Item::new("kale", " ", Category::Vegetable)]),
            Err(CatalogError::BlankItemName("kale".to_string()))
        );
    }
}
