//! Shopping cart: line items, the cart store and its storage surface.
//!
//! A [`Cart`] is an ordered list of [`LineItem`]s. It is only ever mutated
//! through a [`CartStore`], which keeps three things in step:
//!
//! 1. the in-memory cart,
//! 2. the persisted copy under a single storage key, and
//! 3. registered [`CartObserver`]s (render callbacks).
//!
//! # Invariants
//!
//! - Line item ids are unique within a cart
//! - Every line item has `quantity >= 1`
//! - `total` is always recomputed, never stored
//!
//! # Persisted format
//!
//! ```json
//! [{"id": 1712345678901, "name": "Burger", "price": 25000, "quantity": 2}]
//! ```
//!
//! `unitPrice` is accepted in place of `price` when reading.

#[cfg(feature = "fs")]
pub mod fs;
pub mod ids;
pub mod storage;
mod store;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::types::{LineItemId, Price};

#[cfg(feature = "fs")]
pub use fs::FileStorage;
pub use ids::{ClockIds, IdSource, SequentialIds};
pub use storage::{CartStorage, MemoryStorage, StorageError};
pub use store::{CART_KEY, CartError, CartObserver, CartStore, Change};

/// A single line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Unique within the cart; survives renames and duplicate names.
    pub id: LineItemId,
    /// Display name, as supplied by the catalog.
    pub name: String,
    /// Price of one unit.
    #[serde(rename = "price", alias = "unitPrice")]
    pub unit_price: Price,
    /// Always at least 1 while the item is in a cart.
    pub quantity: u32,
}

impl LineItem {
    /// Price of this line (`unit_price * quantity`).
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

/// An ordered collection of line items.
///
/// Read-only from the outside; see [`CartStore`] for mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Line items in display order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Look up a line item by id.
    #[must_use]
    pub fn get(&self, id: LineItemId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Sum of `unit_price * quantity` over all items.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(LineItem::subtotal).sum()
    }

    /// Total number of units across all lines (the cart badge count).
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Largest id currently in the cart.
    #[must_use]
    pub fn max_id(&self) -> Option<LineItemId> {
        self.items.iter().map(|item| item.id).max()
    }

    pub(crate) fn position(&self, id: LineItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    pub(crate) fn items_mut(&mut self) -> &mut Vec<LineItem> {
        &mut self.items
    }

    /// Build a cart from untrusted records, dropping any that break the
    /// invariants. Returns the cart and the number of dropped records.
    pub(crate) fn from_records(records: Vec<LineItem>) -> (Self, usize) {
        let total = records.len();
        let mut seen = HashSet::with_capacity(total);
        let items: Vec<LineItem> = records
            .into_iter()
            .filter(|item| item.quantity > 0 && !item.name.trim().is_empty())
            .filter(|item| seen.insert(item.id))
            .collect();
        let dropped = total - items.len();
        (Self { items }, dropped)
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
