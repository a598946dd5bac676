//! Catalog product and cart line item types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ProductId;

/// A product as the catalog service returns it.
///
/// All fields are immutable catalog data; the cart never changes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog identifier.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Unit price in BRL.
    pub price: Decimal,
    /// Product image URL.
    pub image: String,
}

/// A product plus the quantity the user intends to purchase.
///
/// Serializes flat (product fields and `amount` side by side), which is
/// also the on-disk snapshot record format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(flatten)]
    pub product: Product,
    /// Requested quantity, always at least 1.
    pub amount: u32,
}

impl CartItem {
    /// Create a line item for a freshly added product.
    #[must_use]
    pub const fn new(product: Product) -> Self {
        Self { product, amount: 1 }
    }

    /// Id of the underlying product.
    #[must_use]
    pub const fn id(&self) -> ProductId {
        self.product.id
    }

    /// Line total: unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.price * Decimal::from(self.amount)
    }
}
