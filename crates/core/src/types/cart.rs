//! The cart sequence and its pure operations.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{CartItem, Product, ProductId};

/// Ordered sequence of cart line items.
///
/// Insertion order is display order. A product id appears at most once;
/// every operation below preserves that invariant. All mutating helpers
/// are copy-producing: they return a new `Cart` and leave `self` intact,
/// so a caller can validate against external state (stock) and only then
/// commit the copy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart(Vec<CartItem>);

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn empty() -> Self {
        Self(Vec::new())
    }

    /// The line items in display order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.0
    }

    /// Number of distinct line items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the cart has no line items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Quantity of the given product, if it is in the cart.
    #[must_use]
    pub fn amount_of(&self, id: ProductId) -> Option<u32> {
        self.0.iter().find(|item| item.id() == id).map(|item| item.amount)
    }

    /// Whether the given product is in the cart.
    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.amount_of(id).is_some()
    }

    /// Copy of the cart with `product` appended at quantity 1.
    ///
    /// An id already in the cart is left untouched, keeping the
    /// one-item-per-id invariant.
    #[must_use]
    pub fn with_new(&self, product: Product) -> Self {
        if self.contains(product.id) {
            return self.clone();
        }
        let mut items = self.0.clone();
        items.push(CartItem::new(product));
        Self(items)
    }

    /// Copy of the cart with the product's quantity set to `amount`.
    ///
    /// Returns `None` if the product is not in the cart.
    #[must_use]
    pub fn with_amount(&self, id: ProductId, amount: u32) -> Option<Self> {
        if !self.contains(id) {
            return None;
        }
        let items = self
            .0
            .iter()
            .cloned()
            .map(|mut item| {
                if item.id() == id {
                    item.amount = amount;
                }
                item
            })
            .collect();
        Some(Self(items))
    }

    /// Copy of the cart without the given product.
    ///
    /// Returns `None` if the product is not in the cart.
    #[must_use]
    pub fn with_removed(&self, id: ProductId) -> Option<Self> {
        if !self.contains(id) {
            return None;
        }
        let items = self.0.iter().filter(|item| item.id() != id).cloned().collect();
        Some(Self(items))
    }

    /// Derived view: product id to cart quantity.
    ///
    /// Recomputed on each call; products not in the cart are simply
    /// absent (readers default to 0).
    #[must_use]
    pub fn amounts(&self) -> HashMap<ProductId, u32> {
        self.0.iter().map(|item| (item.id(), item.amount)).collect()
    }

    /// Total number of units across all line items.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.0.iter().map(|item| item.amount).sum()
    }

    /// Sum of all line totals.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.0.iter().map(CartItem::line_total).sum()
    }
}

impl From<Vec<CartItem>> for Cart {
    fn from(items: Vec<CartItem>) -> Self {
        Self(items)
    }
}
