//! The cart store: the only way a cart is mutated.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use super::ids::{ClockIds, IdSource};
use super::storage::{CartStorage, StorageError};
use super::{Cart, LineItem};
use crate::types::{LineItemId, Price};

/// Storage key the cart is persisted under.
pub const CART_KEY: &str = "cart";

/// Errors returned by mutating [`CartStore`] operations.
///
/// A failed operation leaves the in-memory cart, the persisted copy and the
/// observers exactly as they were.
#[derive(Debug, thiserror::Error)]
pub enum CartError {
    /// Attempted to add an item without a name.
    #[error("invalid item: name cannot be empty")]
    InvalidItem,

    /// The cart could not be encoded for storage.
    #[error("failed to encode cart: {0}")]
    Encode(#[from] serde_json::Error),

    /// The storage backend rejected the write.
    #[error("failed to persist cart: {0}")]
    Storage(#[from] StorageError),
}

/// What a mutating operation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// A new line was appended with quantity 1.
    Added(LineItemId),
    /// An existing line now has the given quantity.
    QuantityChanged { id: LineItemId, quantity: u32 },
    /// The line was removed.
    Removed(LineItemId),
    /// The cart was emptied.
    Cleared,
    /// No line has this id; nothing was written and nobody was notified.
    NotFound(LineItemId),
}

impl Change {
    /// Returns true if the operation changed (and persisted) the cart.
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        !matches!(self, Self::NotFound(_))
    }
}

/// Render callback invoked after every applied mutation and every load.
pub trait CartObserver: Send + Sync {
    /// Called with the cart as it now stands (and as it is persisted).
    fn cart_changed(&self, cart: &Cart);
}

impl<F> CartObserver for F
where
    F: Fn(&Cart) + Send + Sync,
{
    fn cart_changed(&self, cart: &Cart) {
        self(cart);
    }
}

/// Owns the authoritative cart and keeps storage and observers in sync.
///
/// Every mutation runs to completion in three steps: compute the new cart,
/// write it to storage, then commit it in memory and notify observers once.
///
/// ```
/// use std::sync::Arc;
/// use warung_core::{CartStore, Price};
/// use warung_core::cart::MemoryStorage;
///
/// let mut store = CartStore::new(Arc::new(MemoryStorage::new()));
/// store.add("Burger", Price::new(25_000)).unwrap();
/// store.add("Burger", Price::new(25_000)).unwrap();
///
/// assert_eq!(store.items().len(), 1);
/// assert_eq!(store.items()[0].quantity, 2);
/// assert_eq!(store.total(), Price::new(50_000));
/// ```
pub struct CartStore {
    cart: Cart,
    storage: Arc<dyn CartStorage>,
    key: String,
    ids: Box<dyn IdSource>,
    observers: Vec<Box<dyn CartObserver>>,
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("cart", &self.cart)
            .field("key", &self.key)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Create a store with an empty in-memory cart.
    ///
    /// Call [`load`](Self::load) to hydrate from storage.
    #[must_use]
    pub fn new(storage: Arc<dyn CartStorage>) -> Self {
        Self {
            cart: Cart::new(),
            storage,
            key: CART_KEY.to_owned(),
            ids: Box::new(ClockIds::new()),
            observers: Vec::new(),
        }
    }

    /// Create a store and hydrate it from storage.
    #[must_use]
    pub fn open(storage: Arc<dyn CartStorage>) -> Self {
        let mut store = Self::new(storage);
        store.load();
        store
    }

    /// Persist under a different storage key.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Replace the id source (clock-based by default).
    #[must_use]
    pub fn with_id_source(mut self, ids: impl IdSource + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    /// Register a render callback.
    pub fn subscribe(&mut self, observer: impl CartObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// The storage key in use.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The current cart.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Line items in display order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        self.cart.items()
    }

    /// Sum of `unit_price * quantity` over all items.
    #[must_use]
    pub fn total(&self) -> Price {
        self.cart.total()
    }

    /// Replace the in-memory cart with the persisted one.
    ///
    /// Absent, unreadable or malformed data yields an empty cart; records
    /// that break the cart invariants are dropped. Nothing here is reported
    /// to the caller beyond a log line. Observers are notified afterwards,
    /// which makes this also the handler for "storage changed elsewhere".
    pub fn load(&mut self) {
        self.cart = self.read_persisted();
        debug!(key = %self.key, lines = self.cart.len(), "cart loaded");
        self.notify();
    }

    /// Re-read storage and, if the persisted cart differs from the one in
    /// memory, adopt it and notify observers. Returns whether it differed.
    ///
    /// Call this when the storage layer signals a change made by another
    /// context (another tab, process or front-end).
    pub fn refresh(&mut self) -> bool {
        let persisted = self.read_persisted();
        if persisted == self.cart {
            return false;
        }
        self.cart = persisted;
        debug!(key = %self.key, lines = self.cart.len(), "cart changed externally, reloaded");
        self.notify();
        true
    }

    fn read_persisted(&self) -> Cart {
        let raw = match self.storage.read(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Cart::new(),
            Err(e) => {
                warn!(key = %self.key, error = %e, "failed to read persisted cart, starting empty");
                return Cart::new();
            }
        };

        let values = match serde_json::from_str::<Vec<serde_json::Value>>(&raw) {
            Ok(values) => values,
            Err(e) => {
                warn!(key = %self.key, error = %e, "persisted cart is malformed, starting empty");
                return Cart::new();
            }
        };

        let total = values.len();
        let records: Vec<LineItem> = values
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<LineItem>(value) {
                Ok(record) => Some(record),
                Err(e) => {
                    debug!(key = %self.key, error = %e, "skipping unreadable cart record");
                    None
                }
            })
            .collect();
        let (cart, _) = Cart::from_records(records);

        let dropped = total - cart.len();
        if dropped > 0 {
            warn!(key = %self.key, dropped, "dropped invalid cart records");
        }
        cart
    }

    /// Add one unit of `name`.
    ///
    /// An existing line with the same name gets its quantity bumped;
    /// otherwise a new line with a fresh id and quantity 1 is appended.
    ///
    /// # Errors
    ///
    /// Returns `InvalidItem` for a blank name, or a storage error if the
    /// new cart could not be persisted.
    pub fn add(&mut self, name: &str, unit_price: Price) -> Result<Change, CartError> {
        if name.trim().is_empty() {
            return Err(CartError::InvalidItem);
        }

        let mut next = self.cart.clone();
        let existing = next.items_mut().iter_mut().find(|item| item.name == name);
        let change = if let Some(item) = existing {
            item.quantity = item.quantity.saturating_add(1);
            Change::QuantityChanged {
                id: item.id,
                quantity: item.quantity,
            }
        } else {
            let id = self.fresh_id();
            next.items_mut().push(LineItem {
                id,
                name: name.to_owned(),
                unit_price,
                quantity: 1,
            });
            Change::Added(id)
        };

        self.commit(next, change)
    }

    /// Set the quantity of a line. Zero or below removes it.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the new cart could not be persisted.
    pub fn set_quantity(&mut self, id: LineItemId, quantity: i64) -> Result<Change, CartError> {
        if quantity <= 0 {
            return self.remove(id);
        }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        self.update_quantity(id, |_| quantity)
    }

    /// Add one unit to a line.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the new cart could not be persisted.
    pub fn increment(&mut self, id: LineItemId) -> Result<Change, CartError> {
        self.update_quantity(id, |quantity| quantity.saturating_add(1))
    }

    /// Take one unit off a line, removing it when it reaches zero.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the new cart could not be persisted.
    pub fn decrement(&mut self, id: LineItemId) -> Result<Change, CartError> {
        self.update_quantity(id, |quantity| quantity.saturating_sub(1))
    }

    /// Remove a line.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the new cart could not be persisted.
    pub fn remove(&mut self, id: LineItemId) -> Result<Change, CartError> {
        let Some(index) = self.cart.position(id) else {
            return Ok(self.not_found(id));
        };

        let mut next = self.cart.clone();
        next.items_mut().remove(index);
        self.commit(next, Change::Removed(id))
    }

    /// Empty the cart and erase the persisted copy. Safe to call repeatedly.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the persisted copy could not be removed.
    pub fn clear(&mut self) -> Result<Change, CartError> {
        self.storage.remove(&self.key)?;
        self.cart = Cart::new();
        debug!(key = %self.key, "cart cleared");
        self.notify();
        Ok(Change::Cleared)
    }

    fn update_quantity(
        &mut self,
        id: LineItemId,
        apply: impl FnOnce(u32) -> u32,
    ) -> Result<Change, CartError> {
        let Some(index) = self.cart.position(id) else {
            return Ok(self.not_found(id));
        };

        let mut next = self.cart.clone();
        let items = next.items_mut();
        let quantity = match items.get_mut(index) {
            Some(item) => {
                item.quantity = apply(item.quantity);
                item.quantity
            }
            None => return Ok(self.not_found(id)),
        };

        if quantity == 0 {
            items.remove(index);
            return self.commit(next, Change::Removed(id));
        }
        self.commit(next, Change::QuantityChanged { id, quantity })
    }

    /// Next id, unused by any line in the cart.
    ///
    /// Normally this is above every id in the cart. Once `i64::MAX` is taken
    /// the highest free id below it is used instead.
    fn fresh_id(&mut self) -> LineItemId {
        let candidate = self.ids.next_id();
        let Some(max) = self.cart.max_id() else {
            return candidate;
        };
        if candidate > max {
            return candidate;
        }
        if let Some(above) = max.as_i64().checked_add(1) {
            return LineItemId::new(above);
        }
        (i64::MIN..i64::MAX)
            .rev()
            .map(LineItemId::new)
            .find(|id| self.cart.position(*id).is_none())
            .unwrap_or(candidate)
    }

    fn not_found(&self, id: LineItemId) -> Change {
        debug!(key = %self.key, %id, "cart line not found");
        Change::NotFound(id)
    }

    fn commit(&mut self, next: Cart, change: Change) -> Result<Change, CartError> {
        let encoded = serde_json::to_string(&next)?;
        self.storage.write(&self.key, &encoded)?;
        self.cart = next;
        debug!(key = %self.key, ?change, total = %self.cart.total(), "cart updated");
        self.notify();
        Ok(change)
    }

    fn notify(&self) {
        for observer in &self.observers {
            observer.cart_changed(&self.cart);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::cart::{MemoryStorage, SequentialIds};

    fn store_with(storage: &MemoryStorage) -> CartStore {
        CartStore::new(Arc::new(storage.clone())).with_id_source(SequentialIds::default())
    }

    fn counting_store(storage: &MemoryStorage) -> (CartStore, Arc<AtomicUsize>) {
        let mut store = store_with(storage);
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        store.subscribe(move |_: &Cart| {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        (store, count)
    }

    /// Storage that accepts reads but refuses every write.
    struct ReadOnlyStorage(MemoryStorage);

    impl CartStorage for ReadOnlyStorage {
        fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.0.read(key)
        }

        fn write(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("read-only".to_string()))
        }

        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("read-only".to_string()))
        }
    }

    #[test]
    fn test_add_same_item_merges() {
        let storage = MemoryStorage::new();
        let mut store = store_with(&storage);

        let first = store.add("Burger", Price::new(25_000)).unwrap();
        let second = store.add("Burger", Price::new(25_000)).unwrap();

        let id = store.items()[0].id;
        assert_eq!(first, Change::Added(id));
        assert_eq!(second, Change::QuantityChanged { id, quantity: 2 });
        assert_eq!(store.items().len(), 1);
        assert_eq!(store.total(), Price::new(50_000));
    }

    #[test]
    fn test_add_rejects_blank_name() {
        let storage = MemoryStorage::new();
        let (mut store, notified) = counting_store(&storage);

        assert!(matches!(
            store.add("  ", Price::new(1_000)),
            Err(CartError::InvalidItem)
        ));
        assert!(store.items().is_empty());
        assert!(storage.read(CART_KEY).unwrap().is_none());
        assert_eq!(notified.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_decrement_to_zero_removes() {
        let storage = MemoryStorage::new();
        let mut store = store_with(&storage);
        store.add("Soda", Price::new(8_000)).unwrap();
        let id = store.items()[0].id;

        assert_eq!(store.decrement(id).unwrap(), Change::Removed(id));
        assert!(store.items().is_empty());
        assert_eq!(store.total(), Price::ZERO);
    }

    #[test]
    fn test_increment_and_decrement() {
        let storage = MemoryStorage::new();
        let mut store = store_with(&storage);
        store.add("Fries", Price::new(12_000)).unwrap();
        let id = store.items()[0].id;

        store.increment(id).unwrap();
        store.increment(id).unwrap();
        assert_eq!(
            store.decrement(id).unwrap(),
            Change::QuantityChanged { id, quantity: 2 }
        );
        assert_eq!(store.total(), Price::new(24_000));
    }

    #[test]
    fn test_set_quantity() {
        let storage = MemoryStorage::new();
        let mut store = store_with(&storage);
        store.add("Burger", Price::new(25_000)).unwrap();
        let id = store.items()[0].id;

        store.set_quantity(id, 40).unwrap();
        assert_eq!(store.items()[0].quantity, 40);

        assert_eq!(store.set_quantity(id, -3).unwrap(), Change::Removed(id));
        assert!(store.items().is_empty());
    }

    #[test]
    fn test_set_quantity_saturates() {
        let storage = MemoryStorage::new();
        let mut store = store_with(&storage);
        store.add("Burger", Price::new(1)).unwrap();
        let id = store.items()[0].id;

        store.set_quantity(id, i64::MAX).unwrap();
        assert_eq!(store.items()[0].quantity, u32::MAX);
    }

    #[test]
    fn test_unknown_id_is_noop() {
        let storage = MemoryStorage::new();
        let (mut store, notified) = counting_store(&storage);
        store.add("Burger", Price::new(25_000)).unwrap();
        let before = storage.read(CART_KEY).unwrap();
        let calls = notified.load(Ordering::SeqCst);

        let missing = LineItemId::new(999);
        assert_eq!(store.increment(missing).unwrap(), Change::NotFound(missing));
        assert_eq!(store.decrement(missing).unwrap(), Change::NotFound(missing));
        assert_eq!(store.remove(missing).unwrap(), Change::NotFound(missing));
        assert_eq!(store.set_quantity(missing, 3).unwrap(), Change::NotFound(missing));
        assert!(!Change::NotFound(missing).is_applied());

        assert_eq!(storage.read(CART_KEY).unwrap(), before);
        assert_eq!(notified.load(Ordering::SeqCst), calls);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let storage = MemoryStorage::new();
        let mut store = store_with(&storage);
        store.add("Burger", Price::new(25_000)).unwrap();

        assert_eq!(store.clear().unwrap(), Change::Cleared);
        assert!(store.items().is_empty());
        assert!(storage.read(CART_KEY).unwrap().is_none());

        assert_eq!(store.clear().unwrap(), Change::Cleared);
        assert!(store.items().is_empty());
    }

    #[test]
    fn test_one_notification_per_mutation() {
        let storage = MemoryStorage::new();
        let (mut store, notified) = counting_store(&storage);

        store.add("Burger", Price::new(25_000)).unwrap();
        let id = store.items()[0].id;
        store.increment(id).unwrap();
        store.set_quantity(id, 5).unwrap();
        store.remove(id).unwrap();
        store.clear().unwrap();

        assert_eq!(notified.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn test_observer_sees_persisted_state() {
        let storage = MemoryStorage::new();
        let mut store = store_with(&storage);
        let observed = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&observed);
        let probe = storage.clone();
        store.subscribe(move |cart: &Cart| {
            let persisted = probe.read(CART_KEY).unwrap();
            let expected = serde_json::to_string(cart).unwrap();
            sink.lock().unwrap().push(persisted == Some(expected));
        });

        store.add("Burger", Price::new(25_000)).unwrap();
        store.add("Soda", Price::new(8_000)).unwrap();

        assert_eq!(*observed.lock().unwrap(), vec![true, true]);
    }

    #[test]
    fn test_persistence_roundtrip() {
        let storage = MemoryStorage::new();
        let mut store = store_with(&storage);
        store.add("Burger", Price::new(25_000)).unwrap();
        store.add("Soda", Price::new(8_000)).unwrap();
        store.add("Burger", Price::new(25_000)).unwrap();

        let reloaded = CartStore::open(Arc::new(storage.clone()));
        assert_eq!(reloaded.items(), store.items());
        assert_eq!(reloaded.total(), Price::new(58_000));
    }

    #[test]
    fn test_load_corrupt_storage_yields_empty_cart() {
        let storage = MemoryStorage::new();
        storage.write(CART_KEY, "{not json").unwrap();

        let (mut store, notified) = counting_store(&storage);
        store.load();

        assert!(store.items().is_empty());
        assert_eq!(store.total(), Price::ZERO);
        assert_eq!(notified.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_load_reads_original_wire_format() {
        let storage = MemoryStorage::new();
        storage
            .write(
                CART_KEY,
                r#"[{"id":1700000000000,"name":"Burger","price":25000,"quantity":2}]"#,
            )
            .unwrap();

        let store = CartStore::open(Arc::new(storage));
        assert_eq!(store.items()[0].id, LineItemId::new(1_700_000_000_000));
        assert_eq!(store.total(), Price::new(50_000));
    }

    #[test]
    fn test_fresh_ids_skip_hydrated_ids() {
        let storage = MemoryStorage::new();
        storage
            .write(
                CART_KEY,
                r#"[{"id":5,"name":"Burger","price":25000,"quantity":1}]"#,
            )
            .unwrap();

        let mut store = store_with(&storage);
        store.load();
        store.add("Soda", Price::new(8_000)).unwrap();

        assert_eq!(store.items()[1].id, LineItemId::new(6));
    }

    #[test]
    fn test_fresh_id_below_exhausted_max() {
        let storage = MemoryStorage::new();
        storage
            .write(
                CART_KEY,
                &format!(
                    r#"[{{"id":{},"name":"Burger","price":25000,"quantity":1}},
                        {{"id":{},"name":"Fries","price":12000,"quantity":1}}]"#,
                    i64::MAX,
                    i64::MAX - 1
                ),
            )
            .unwrap();

        let mut store = store_with(&storage);
        store.load();
        store.add("Soda", Price::new(8_000)).unwrap();

        let ids: Vec<LineItemId> = store.items().iter().map(|item| item.id).collect();
        assert_eq!(ids.len(), 3);
        assert_eq!(ids[2], LineItemId::new(i64::MAX - 2));
    }

    #[test]
    fn test_load_keeps_valid_records_beside_bad_ones() {
        let storage = MemoryStorage::new();
        storage
            .write(
                CART_KEY,
                r#"[
                    {"id": 1, "name": "Burger", "price": 25000, "quantity": 2},
                    {"id": 2, "name": "Soda", "price": 8000, "quantity": -1},
                    {"id": 3, "name": "Fries", "price": -5, "quantity": 1},
                    {"id": "4", "name": "Tea", "price": 5000, "quantity": 1},
                    "not a record",
                    {"id": 5, "name": "Iced Tea", "unitPrice": 7000, "quantity": 1}
                ]"#,
            )
            .unwrap();

        let mut store = store_with(&storage);
        store.load();

        let names: Vec<&str> = store.items().iter().map(|item| item.name.as_str()).collect();
        assert_eq!(names, vec!["Burger", "Iced Tea"]);
        assert_eq!(store.total(), Price::new(57_000));
    }

    #[test]
    fn test_failed_write_leaves_cart_unchanged() {
        let inner = MemoryStorage::new();
        let mut seeded = store_with(&inner);
        seeded.add("Burger", Price::new(25_000)).unwrap();
        let id = seeded.items()[0].id;

        let mut store = CartStore::open(Arc::new(ReadOnlyStorage(inner.clone())));
        let notified = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&notified);
        store.subscribe(move |_: &Cart| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        assert!(matches!(store.increment(id), Err(CartError::Storage(_))));
        assert!(matches!(
            store.add("Soda", Price::new(8_000)),
            Err(CartError::Storage(_))
        ));
        assert!(matches!(store.clear(), Err(CartError::Storage(_))));

        assert_eq!(store.items(), seeded.items());
        assert_eq!(notified.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_two_stores_resync_through_load() {
        let storage = MemoryStorage::new();
        let mut tab_a = store_with(&storage);
        let mut tab_b = store_with(&storage);

        tab_a.add("Burger", Price::new(25_000)).unwrap();
        assert!(tab_b.items().is_empty());

        tab_b.load();
        assert_eq!(tab_b.items(), tab_a.items());
    }

    #[test]
    fn test_refresh_only_notifies_on_external_change() {
        let storage = MemoryStorage::new();
        let mut tab_a = store_with(&storage);
        let (mut tab_b, notified) = counting_store(&storage);

        assert!(!tab_b.refresh());
        assert_eq!(notified.load(Ordering::SeqCst), 0);

        tab_a.add("Burger", Price::new(25_000)).unwrap();
        assert!(tab_b.refresh());
        assert_eq!(tab_b.items(), tab_a.items());
        assert_eq!(notified.load(Ordering::SeqCst), 1);

        assert!(!tab_b.refresh());
        assert_eq!(notified.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_invariants_hold_over_operation_sequence() {
        let storage = MemoryStorage::new();
        let mut store = store_with(&storage);
        let menu = [("Burger", 25_000), ("Soda", 8_000), ("Fries", 12_000)];

        for step in 0_usize..200 {
            let (name, price) = menu[step % menu.len()];
            match step % 7 {
                0 | 1 | 4 => {
                    store.add(name, Price::new(price)).unwrap();
                }
                2 => {
                    if let Some(item) = store.items().first() {
                        let id = item.id;
                        store.decrement(id).unwrap();
                    }
                }
                3 => {
                    if let Some(item) = store.items().last() {
                        let id = item.id;
                        store.remove(id).unwrap();
                    }
                }
                5 => {
                    if let Some(item) = store.items().first() {
                        let id = item.id;
                        let quantity = i64::try_from(step % 4).unwrap() - 1;
                        store.set_quantity(id, quantity).unwrap();
                    }
                }
                _ => {
                    if step % 50 == 6 {
                        store.clear().unwrap();
                    }
                }
            }

            let ids: HashSet<LineItemId> = store.items().iter().map(|i| i.id).collect();
            assert_eq!(ids.len(), store.items().len());
            assert!(store.items().iter().all(|i| i.quantity >= 1));
            let expected: u64 = store
                .items()
                .iter()
                .map(|i| i.unit_price.amount() * u64::from(i.quantity))
                .sum();
            assert_eq!(store.total(), Price::new(expected));
        }
    }
}
