//! Menu catalog.
//!
//! The catalog is the source of `(name, price)` pairs that get added to a
//! cart. Front-ends refer to items by their URL-safe `handle`, so a client
//! never supplies a price of its own.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::types::Price;

/// Errors that can occur when building a [`Catalog`].
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The menu file could not be parsed.
    #[error("invalid menu JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two items share a handle.
    #[error("duplicate menu handle: {0}")]
    DuplicateHandle(String),

    /// An item has a blank handle or name.
    #[error("menu item {0:?} is missing a handle or name")]
    IncompleteItem(String),
}

/// One dish or drink on the menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    /// URL-safe identifier, unique within the catalog.
    pub handle: String,
    /// Display name; also the name the item carries in the cart.
    pub name: String,
    /// Unit price.
    pub price: Price,
    /// Menu section heading.
    #[serde(default = "default_category")]
    pub category: String,
    /// Short blurb shown under the name.
    #[serde(default)]
    pub description: Option<String>,
}

fn default_category() -> String {
    "Menu".to_string()
}

/// An ordered list of menu items with unique handles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    items: Vec<MenuItem>,
}

impl Catalog {
    /// Build a catalog, validating handles and names.
    ///
    /// # Errors
    ///
    /// Returns an error if a handle is repeated or an item has a blank handle
    /// or name.
    pub fn new(items: Vec<MenuItem>) -> Result<Self, CatalogError> {
        let mut handles = HashSet::with_capacity(items.len());
        for item in &items {
            if item.handle.trim().is_empty() || item.name.trim().is_empty() {
                return Err(CatalogError::IncompleteItem(item.handle.clone()));
            }
            if !handles.insert(item.handle.as_str()) {
                return Err(CatalogError::DuplicateHandle(item.handle.clone()));
            }
        }
        Ok(Self { items })
    }

    /// Parse a catalog from a JSON array of menu items.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or fails validation.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let items: Vec<MenuItem> = serde_json::from_str(json)?;
        Self::new(items)
    }

    /// The menu that ships with Warung.
    #[must_use]
    pub fn builtin() -> Self {
        let item = |handle: &str, name: &str, price: u64, category: &str, description: &str| {
            MenuItem {
                handle: handle.to_string(),
                name: name.to_string(),
                price: Price::new(price),
                category: category.to_string(),
                description: Some(description.to_string()),
            }
        };

        Self {
            items: vec![
                item(
                    "burger",
                    "Burger",
                    25_000,
                    "Makanan",
                    "Beef patty, cheese, lettuce and our house sauce.",
                ),
                item(
                    "double-burger",
                    "Double Burger",
                    38_000,
                    "Makanan",
                    "Two patties, double cheese.",
                ),
                item(
                    "chicken-burger",
                    "Chicken Burger",
                    27_000,
                    "Makanan",
                    "Crispy fried chicken fillet with mayo.",
                ),
                item(
                    "hot-dog",
                    "Hot Dog",
                    20_000,
                    "Makanan",
                    "Grilled sausage, mustard and onions.",
                ),
                item(
                    "fried-chicken",
                    "Fried Chicken",
                    22_000,
                    "Makanan",
                    "Two pieces, crispy and spicy.",
                ),
                item(
                    "fries",
                    "French Fries",
                    12_000,
                    "Camilan",
                    "Golden fries with a pinch of salt.",
                ),
                item(
                    "nuggets",
                    "Chicken Nuggets",
                    15_000,
                    "Camilan",
                    "Six pieces with chilli sauce.",
                ),
                item("soda", "Soda", 8_000, "Minuman", "Ice-cold cola."),
                item(
                    "iced-tea",
                    "Es Teh",
                    6_000,
                    "Minuman",
                    "Sweet iced jasmine tea.",
                ),
                item(
                    "milkshake",
                    "Milkshake",
                    18_000,
                    "Minuman",
                    "Vanilla, chocolate or strawberry.",
                ),
            ],
        }
    }

    /// All items in menu order.
    #[must_use]
    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    /// Find an item by handle.
    #[must_use]
    pub fn get(&self, handle: &str) -> Option<&MenuItem> {
        self.items.iter().find(|item| item.handle == handle)
    }

    /// Items grouped by category, keeping first-appearance order of both
    /// categories and items.
    #[must_use]
    pub fn by_category(&self) -> Vec<(&str, Vec<&MenuItem>)> {
        let mut groups: Vec<(&str, Vec<&MenuItem>)> = Vec::new();
        for item in &self.items {
            match groups.iter_mut().find(|(name, _)| *name == item.category) {
                Some((_, items)) => items.push(item),
                None => groups.push((item.category.as_str(), vec![item])),
            }
        }
        groups
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_is_valid() {
        let builtin = Catalog::builtin();
        let revalidated = Catalog::new(builtin.items().to_vec()).unwrap();
        assert_eq!(revalidated, builtin);
        assert_eq!(builtin.get("burger").unwrap().price, Price::new(25_000));
        assert_eq!(builtin.get("soda").unwrap().price, Price::new(8_000));
    }

    #[test]
    fn test_from_json() {
        let catalog = Catalog::from_json(
            r#"[
                {"handle": "nasi-goreng", "name": "Nasi Goreng", "price": 20000, "category": "Makanan"},
                {"handle": "kopi", "name": "Kopi", "price": 7000}
            ]"#,
        )
        .unwrap();
        assert_eq!(catalog.items().len(), 2);
        assert_eq!(catalog.get("kopi").unwrap().category, "Menu");
        assert!(catalog.get("kopi").unwrap().description.is_none());
    }

    #[test]
    fn test_rejects_duplicate_handle() {
        let result = Catalog::from_json(
            r#"[
                {"handle": "kopi", "name": "Kopi", "price": 7000},
                {"handle": "kopi", "name": "Kopi Susu", "price": 9000}
            ]"#,
        );
        assert!(matches!(result, Err(CatalogError::DuplicateHandle(h)) if h == "kopi"));
    }

    #[test]
    fn test_rejects_negative_price() {
        let result = Catalog::from_json(r#"[{"handle": "kopi", "name": "Kopi", "price": -1}]"#);
        assert!(matches!(result, Err(CatalogError::Parse(_))));
    }

    #[test]
    fn test_rejects_blank_name() {
        let result = Catalog::from_json(r#"[{"handle": "kopi", "name": " ", "price": 1}]"#);
        assert!(matches!(result, Err(CatalogError::IncompleteItem(_))));
    }

    #[test]
    fn test_by_category_keeps_order() {
        let catalog = Catalog::builtin();
        let categories: Vec<&str> = catalog.by_category().iter().map(|(c, _)| *c).collect();
        assert_eq!(categories, vec!["Makanan", "Camilan", "Minuman"]);
    }
}
