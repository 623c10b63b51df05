//! Cart state container.
//!
//! [`CartItems`] is the in-memory list of `(product, quantity)` entries.
//! [`ShoppingCart`] binds it to a [`Storage`] backend: it rehydrates from the
//! backend when created and writes the full list back after every mutation.
//!
//! Quantities are `NonZeroU32`, so an entry can never sit at zero: decreasing
//! an entry with quantity 1 removes it.
//!
//! # Persisted layout
//!
//! ```text
//! shopping-cart = [{"id":1,"quantity":2},{"id":5,"quantity":1}]
//! ```

use std::num::NonZeroU32;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::storage::{self, Storage};
use crate::types::{Catalog, ProductId};
use crate::visibility::CartVisibility;

/// Storage key the cart is persisted under.
pub const CART_STORAGE_KEY: &str = "shopping-cart";

/// One product's quantity record in the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    pub id: ProductId,
    pub quantity: NonZeroU32,
}

/// Ordered list of cart entries, at most one per product.
///
/// Serializes as a plain JSON array of entries. Duplicate ids in decoded
/// input are merged by summing their quantities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<CartEntry>", into = "Vec<CartEntry>")]
pub struct CartItems {
    entries: Vec<CartEntry>,
}

impl CartItems {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Quantity of `id` in the cart, or 0 if absent.
    #[must_use]
    pub fn get_quantity(&self, id: ProductId) -> u32 {
        self.find(id).map_or(0, |entry| entry.quantity.get())
    }

    /// Add one of `id`, creating the entry if needed.
    pub fn increase(&mut self, id: ProductId) {
        match self.find_mut(id) {
            Some(entry) => entry.quantity = entry.quantity.saturating_add(1),
            None => self.entries.push(CartEntry {
                id,
                quantity: NonZeroU32::MIN,
            }),
        }
    }

    /// Take one of `id` away, dropping the entry when it reaches zero.
    ///
    /// Does nothing if `id` is not in the cart.
    pub fn decrease(&mut self, id: ProductId) {
        let Some(index) = self.position(id) else {
            return;
        };
        let Some(entry) = self.entries.get_mut(index) else {
            return;
        };
        match NonZeroU32::new(entry.quantity.get() - 1) {
            Some(quantity) => entry.quantity = quantity,
            None => {
                self.entries.remove(index);
            }
        }
    }

    /// Drop the entry for `id`, if any.
    pub fn remove(&mut self, id: ProductId) {
        self.entries.retain(|entry| entry.id != id);
    }

    /// Sum of all quantities. Saturates at `u32::MAX`.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.entries
            .iter()
            .fold(0u32, |total, entry| total.saturating_add(entry.quantity.get()))
    }

    /// Sum of `price * quantity` over entries whose product is in `catalog`.
    #[must_use]
    pub fn subtotal(&self, catalog: &Catalog) -> Decimal {
        self.entries
            .iter()
            .filter_map(|entry| {
                catalog
                    .get(entry.id)
                    .map(|product| product.price * Decimal::from(entry.quantity.get()))
            })
            .sum()
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    /// Number of distinct products in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cart has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, id: ProductId) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id == id)
    }

    fn find(&self, id: ProductId) -> Option<&CartEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    fn find_mut(&mut self, id: ProductId) -> Option<&mut CartEntry> {
        self.entries.iter_mut().find(|entry| entry.id == id)
    }
}

impl From<Vec<CartEntry>> for CartItems {
    fn from(raw: Vec<CartEntry>) -> Self {
        let mut items = Self::new();
        for incoming in raw {
            match items.find_mut(incoming.id) {
                Some(entry) => entry.quantity = entry.quantity.saturating_add(incoming.quantity.get()),
                None => items.entries.push(incoming),
            }
        }
        items
    }
}

impl From<CartItems> for Vec<CartEntry> {
    fn from(items: CartItems) -> Self {
        items.entries
    }
}

/// A cart bound to durable storage, plus the summary panel's visibility.
///
/// This is the handle presentation code receives. Every mutation writes the
/// full entry list back to storage; a failed write is logged and the
/// in-memory state stays authoritative.
#[derive(Debug)]
pub struct ShoppingCart<S> {
    storage: S,
    key: String,
    items: CartItems,
    visibility: CartVisibility,
}

impl<S: Storage> ShoppingCart<S> {
    /// Rehydrate the cart from `storage` under [`CART_STORAGE_KEY`].
    pub fn load(storage: S) -> Self {
        Self::load_with_key(storage, CART_STORAGE_KEY)
    }

    /// Rehydrate the cart from `storage` under a custom key.
    ///
    /// An absent or unreadable value yields an empty cart.
    pub fn load_with_key(storage: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let items = storage::load_or(&storage, &key, CartItems::new());
        Self {
            storage,
            key,
            items,
            visibility: CartVisibility::default(),
        }
    }

    #[must_use]
    pub fn get_quantity(&self, id: ProductId) -> u32 {
        self.items.get_quantity(id)
    }

    pub fn increase(&mut self, id: ProductId) {
        self.items.increase(id);
        self.persist();
    }

    pub fn decrease(&mut self, id: ProductId) {
        self.items.decrease(id);
        self.persist();
    }

    pub fn remove(&mut self, id: ProductId) {
        self.items.remove(id);
        self.persist();
    }

    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.items.total_quantity()
    }

    /// Entries in the order they were first added.
    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        self.items.entries()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub const fn items(&self) -> &CartItems {
        &self.items
    }

    pub const fn open_cart(&mut self) {
        self.visibility.open();
    }

    pub const fn close_cart(&mut self) {
        self.visibility.close();
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.visibility.is_open()
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    pub const fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Give back the storage backend, e.g. to flush it.
    pub fn into_storage(self) -> S {
        self.storage
    }

    fn persist(&mut self) {
        if let Err(e) = storage::store_json(&mut self.storage, &self.key, &self.items) {
            tracing::warn!(key = %self.key, error = %e, "Failed to persist cart");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn id(n: i32) -> ProductId {
        ProductId::new(n)
    }

    fn assert_invariants(items: &CartItems) {
        let mut ids: Vec<ProductId> = items.entries().iter().map(|e| e.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), items.len(), "duplicate entry in {items:?}");

        let sum: u32 = items.entries().iter().map(|e| e.quantity.get()).sum();
        assert_eq!(items.total_quantity(), sum);
    }

    fn sorted_pairs(items: &CartItems) -> Vec<(i32, u32)> {
        let mut pairs: Vec<(i32, u32)> = items
            .entries()
            .iter()
            .map(|e| (e.id.as_i32(), e.quantity.get()))
            .collect();
        pairs.sort_unstable();
        pairs
    }

    #[test]
    fn test_empty_cart() {
        let items = CartItems::new();
        assert_eq!(items.get_quantity(id(1)), 0);
        assert_eq!(items.total_quantity(), 0);
        assert!(items.is_empty());
    }

    #[test]
    fn test_increase_then_decrease_to_zero() {
        let mut items = CartItems::new();

        items.increase(id(5));
        assert_eq!(items.get_quantity(id(5)), 1);
        assert_eq!(items.total_quantity(), 1);

        items.increase(id(5));
        assert_eq!(items.get_quantity(id(5)), 2);

        items.decrease(id(5));
        assert_eq!(items.get_quantity(id(5)), 1);

        items.decrease(id(5));
        assert_eq!(items.get_quantity(id(5)), 0);
        assert!(items.entries().iter().all(|e| e.id != id(5)));
        assert_eq!(items.total_quantity(), 0);
    }

    #[test]
    fn test_increase_mixed_ids() {
        let mut items = CartItems::new();
        items.increase(id(1));
        items.increase(id(2));
        items.increase(id(1));

        assert_eq!(sorted_pairs(&items), [(1, 2), (2, 1)]);
        assert_eq!(items.total_quantity(), 3);
    }

    #[test]
    fn test_increase_keeps_insertion_order() {
        let mut items = CartItems::new();
        items.increase(id(3));
        items.increase(id(1));
        items.increase(id(3));

        let order: Vec<i32> = items.entries().iter().map(|e| e.id.as_i32()).collect();
        assert_eq!(order, [3, 1]);
    }

    #[test]
    fn test_increase_then_decrease_restores_state() {
        let mut items = CartItems::new();
        items.increase(id(1));
        items.increase(id(2));
        items.increase(id(2));

        for n in [1, 2, 3] {
            let before = items.clone();
            items.increase(id(n));
            items.decrease(id(n));
            assert_eq!(items, before, "increase/decrease of {n} changed the cart");
        }
    }

    #[test]
    fn test_decrease_absent_is_noop() {
        let mut items = CartItems::new();
        items.decrease(id(4));
        assert!(items.is_empty());

        items.increase(id(1));
        let before = items.clone();
        items.decrease(id(4));
        assert_eq!(items, before);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut items = CartItems::new();
        items.increase(id(1));
        items.increase(id(1));
        items.increase(id(2));

        items.remove(id(1));
        let once = items.clone();
        items.remove(id(1));
        assert_eq!(items, once);
        assert_eq!(sorted_pairs(&items), [(2, 1)]);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut items = CartItems::new();
        items.increase(id(1));
        let before = items.clone();
        items.remove(id(9));
        assert_eq!(items, before);
    }

    #[test]
    fn test_invariants_hold_over_operation_sequence() {
        let mut items = CartItems::new();
        // Deterministic walk over a handful of ids and all three mutations.
        let mut seed: u32 = 17;
        for _ in 0..500 {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let product = id(i32::try_from((seed >> 8) % 6).unwrap());
            match (seed >> 16) % 5 {
                0 | 1 => items.increase(product),
                2 | 3 => items.decrease(product),
                _ => items.remove(product),
            }
            assert_invariants(&items);
        }
    }

    #[test]
    fn test_quantity_saturates() {
        let mut items = CartItems::from(vec![CartEntry {
            id: id(1),
            quantity: NonZeroU32::MAX,
        }]);
        items.increase(id(1));
        assert_eq!(items.get_quantity(id(1)), u32::MAX);

        items.increase(id(2));
        assert_eq!(items.total_quantity(), u32::MAX);
    }

    #[test]
    fn test_serializes_as_array_of_entries() {
        let mut items = CartItems::new();
        items.increase(id(1));
        items.increase(id(1));
        items.increase(id(7));

        let json = serde_json::to_string(&items).unwrap();
        assert_eq!(json, r#"[{"id":1,"quantity":2},{"id":7,"quantity":1}]"#);
    }

    #[test]
    fn test_deserialize_merges_duplicates() {
        let items: CartItems =
            serde_json::from_str(r#"[{"id":1,"quantity":2},{"id":1,"quantity":3}]"#).unwrap();
        assert_eq!(sorted_pairs(&items), [(1, 5)]);
    }

    #[test]
    fn test_deserialize_rejects_zero_quantity() {
        assert!(serde_json::from_str::<CartItems>(r#"[{"id":1,"quantity":0}]"#).is_err());
        assert!(serde_json::from_str::<CartItems>(r#"[{"id":1,"quantity":-2}]"#).is_err());
    }

    #[test]
    fn test_subtotal_skips_unknown_products() {
        let catalog = Catalog::from_json(
            r#"[
                { "id": 1, "name": "Book", "price": 10.50, "imgUrl": "a" },
                { "id": 2, "name": "Pen", "price": 2, "imgUrl": "b" }
            ]"#,
        )
        .unwrap();

        let mut items = CartItems::new();
        items.increase(id(1));
        items.increase(id(1));
        items.increase(id(2));
        items.increase(id(99));

        assert_eq!(items.subtotal(&catalog), Decimal::new(2300, 2));
        assert_eq!(items.total_quantity(), 4);
    }

    #[test]
    fn test_shopping_cart_persists_every_mutation() {
        let mut storage = MemoryStorage::new();
        {
            let mut cart = ShoppingCart::load(&mut storage);
            cart.increase(id(1));
            cart.increase(id(2));
            cart.increase(id(1));
            cart.decrease(id(2));
        }

        assert_eq!(
            storage.get_item(CART_STORAGE_KEY).unwrap().as_deref(),
            Some(r#"[{"id":1,"quantity":2}]"#)
        );

        let reloaded = ShoppingCart::load(&mut storage);
        assert_eq!(reloaded.get_quantity(id(1)), 2);
        assert_eq!(reloaded.total_quantity(), 2);
    }

    #[test]
    fn test_shopping_cart_roundtrip_equal_entries() {
        let mut cart = ShoppingCart::load(MemoryStorage::new());
        for n in [4, 2, 4, 8, 2, 4] {
            cart.increase(id(n));
        }
        cart.remove(id(8));
        let expected = sorted_pairs(cart.items());

        let reloaded = ShoppingCart::load(cart.into_storage());
        assert_eq!(sorted_pairs(reloaded.items()), expected);
    }

    #[test]
    fn test_shopping_cart_invalid_json_loads_empty() {
        let mut storage = MemoryStorage::new();
        storage
            .set_item(CART_STORAGE_KEY, "not json at all".to_string())
            .unwrap();

        let cart = ShoppingCart::load(storage);
        assert_eq!(cart.total_quantity(), 0);
        assert!(cart.items().is_empty());
    }

    #[test]
    fn test_shopping_cart_non_array_loads_empty() {
        let mut storage = MemoryStorage::new();
        storage
            .set_item(CART_STORAGE_KEY, r#"{"id":1,"quantity":1}"#.to_string())
            .unwrap();

        let cart = ShoppingCart::load(storage);
        assert!(cart.items().is_empty());
    }

    #[test]
    fn test_shopping_cart_survives_write_failure() {
        let mut cart = ShoppingCart::load(MemoryStorage::with_quota(2));
        cart.increase(id(1));
        cart.increase(id(1));

        assert_eq!(cart.get_quantity(id(1)), 2);
        assert!(cart.storage().get_item(CART_STORAGE_KEY).unwrap().is_none());
    }

    #[test]
    fn test_shopping_cart_custom_key() {
        let mut cart = ShoppingCart::load_with_key(MemoryStorage::new(), "cart-v2");
        cart.increase(id(3));

        let storage = cart.into_storage();
        assert!(storage.get_item("cart-v2").unwrap().is_some());
        assert!(storage.get_item(CART_STORAGE_KEY).unwrap().is_none());
    }

    #[test]
    fn test_shopping_cart_visibility_not_persisted() {
        let mut cart = ShoppingCart::load(MemoryStorage::new());
        assert!(!cart.is_open());
        cart.open_cart();
        assert!(cart.is_open());
        cart.increase(id(1));

        let reloaded = ShoppingCart::load(cart.into_storage());
        assert!(!reloaded.is_open());
    }

    #[test]
    fn test_shopping_cart_close() {
        let mut cart = ShoppingCart::load(MemoryStorage::new());
        cart.open_cart();
        cart.close_cart();
        assert!(!cart.is_open());
    }
}
