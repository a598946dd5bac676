//! Cache types for catalog API responses.

use rocketshoes_core::{Product, ProductId};

/// Cache key for product reads. Stock has no key on purpose.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Product(ProductId),
    Products,
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Product(Box<Product>),
    Products(Vec<Product>),
}
