//! Stock record returned by the stock service.

use serde::{Deserialize, Serialize};

use super::ProductId;

/// Available quantity for a product.
///
/// This is the authoritative ceiling for a cart quantity. It is fetched
/// on demand and never cached: stale stock would let the cart overshoot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    pub id: ProductId,
    pub amount: u32,
}
