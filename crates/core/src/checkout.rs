//! Checkout: turning a cart into a bill.
//!
//! Payment is cash-at-the-counter: the customer states how much they hand
//! over and the bill shows the change. Nothing here talks to a payment
//! provider.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::{Cart, CartError, CartStore};
use crate::types::{Customer, CustomerError, Price};

/// Errors that can occur when placing an order.
#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    /// There is nothing to order.
    #[error("cart is empty")]
    EmptyCart,

    /// Customer details failed validation.
    #[error(transparent)]
    Customer(#[from] CustomerError),
}

/// What happens to the cart once the customer closes the bill.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClosePolicy {
    /// The order counts as sent; start over with an empty cart.
    #[default]
    ClearCart,
    /// Keep the cart so the same order can be adjusted and resent.
    KeepCart,
}

impl ClosePolicy {
    /// Parse from configuration (`clear` / `keep`, case-insensitive).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "clear" | "clear_cart" => Some(Self::ClearCart),
            "keep" | "keep_cart" => Some(Self::KeepCart),
            _ => None,
        }
    }

    /// Apply the policy to a store.
    ///
    /// # Errors
    ///
    /// Returns an error if clearing the cart could not be persisted.
    pub fn apply(self, store: &mut CartStore) -> Result<(), CartError> {
        match self {
            Self::ClearCart => store.clear().map(|_| ()),
            Self::KeepCart => Ok(()),
        }
    }
}

/// One row of a bill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillLine {
    pub name: String,
    pub unit_price: Price,
    pub quantity: u32,
    pub subtotal: Price,
}

/// A placed order, frozen at the moment of checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bill {
    pub lines: Vec<BillLine>,
    pub total: Price,
    pub customer: Customer,
    pub amount_paid: Price,
    pub placed_at: DateTime<Utc>,
}

impl Bill {
    /// Place an order for the current cart contents.
    ///
    /// # Errors
    ///
    /// Returns `EmptyCart` if there is nothing to order.
    pub fn place(
        cart: &Cart,
        customer: Customer,
        amount_paid: Price,
        placed_at: DateTime<Utc>,
    ) -> Result<Self, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let lines = cart
            .items()
            .iter()
            .map(|item| BillLine {
                name: item.name.clone(),
                unit_price: item.unit_price,
                quantity: item.quantity,
                subtotal: item.subtotal(),
            })
            .collect();

        Ok(Self {
            lines,
            total: cart.total(),
            customer,
            amount_paid,
            placed_at,
        })
    }

    /// Change to hand back; never negative.
    #[must_use]
    pub const fn change(&self) -> Price {
        self.amount_paid.saturating_sub(self.total)
    }

    /// Amount still owed when the customer paid too little.
    #[must_use]
    pub const fn shortfall(&self) -> Price {
        self.total.saturating_sub(self.amount_paid)
    }

    /// Returns true if the amount paid covers the total.
    #[must_use]
    pub fn is_paid_in_full(&self) -> bool {
        self.amount_paid >= self.total
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::cart::MemoryStorage;

    fn store() -> CartStore {
        CartStore::new(Arc::new(MemoryStorage::new()))
    }

    fn customer() -> Customer {
        Customer::new("Budi", "081234567890", "extra sambal").unwrap()
    }

    #[test]
    fn test_place_snapshots_cart() {
        let mut store = store();
        store.add("Burger", Price::new(25_000)).unwrap();
        store.add("Burger", Price::new(25_000)).unwrap();
        store.add("Soda", Price::new(8_000)).unwrap();

        let bill = Bill::place(store.cart(), customer(), Price::new(100_000), Utc::now()).unwrap();

        assert_eq!(bill.lines.len(), 2);
        assert_eq!(bill.lines[0].subtotal, Price::new(50_000));
        assert_eq!(bill.total, Price::new(58_000));
        assert_eq!(bill.change(), Price::new(42_000));
        assert_eq!(bill.shortfall(), Price::ZERO);
        assert!(bill.is_paid_in_full());
    }

    #[test]
    fn test_underpayment_clamps_change() {
        let mut store = store();
        store.add("Burger", Price::new(25_000)).unwrap();

        let bill = Bill::place(store.cart(), customer(), Price::new(20_000), Utc::now()).unwrap();

        assert_eq!(bill.change(), Price::ZERO);
        assert_eq!(bill.shortfall(), Price::new(5_000));
        assert!(!bill.is_paid_in_full());
    }

    #[test]
    fn test_empty_cart_rejected() {
        let result = Bill::place(&Cart::new(), customer(), Price::ZERO, Utc::now());
        assert!(matches!(result, Err(CheckoutError::EmptyCart)));
    }

    #[test]
    fn test_close_policy_clear() {
        let mut store = store();
        store.add("Burger", Price::new(25_000)).unwrap();

        ClosePolicy::ClearCart.apply(&mut store).unwrap();
        assert!(store.items().is_empty());
    }

    #[test]
    fn test_close_policy_keep() {
        let mut store = store();
        store.add("Burger", Price::new(25_000)).unwrap();

        ClosePolicy::KeepCart.apply(&mut store).unwrap();
        assert_eq!(store.items().len(), 1);
    }

    #[test]
    fn test_close_policy_parse() {
        assert_eq!(ClosePolicy::parse("clear"), Some(ClosePolicy::ClearCart));
        assert_eq!(ClosePolicy::parse(" KEEP "), Some(ClosePolicy::KeepCart));
        assert_eq!(ClosePolicy::parse("keep_cart"), Some(ClosePolicy::KeepCart));
        assert_eq!(ClosePolicy::parse("maybe"), None);
        assert_eq!(ClosePolicy::default(), ClosePolicy::ClearCart);
    }
}
