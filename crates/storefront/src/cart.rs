//! Cart state container.
//!
//! Owns the in-memory cart sequence, validates quantities against the
//! stock service, and writes through to the snapshot store on every
//! successful mutation. Operations return typed results; the route layer
//! decides how to surface outcomes to the user, so this module stays
//! UI-agnostic and independently testable.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;
use tracing::{instrument, warn};

use rocketshoes_core::{Cart, ProductId};

use crate::catalog::{CatalogApi, CatalogError};
use crate::snapshot::{SnapshotError, SnapshotStore};

/// Why a cart operation left the cart unchanged.
#[derive(Debug, Error)]
pub enum CartError {
    /// The requested quantity exceeds the available stock.
    #[error("requested amount exceeds available stock")]
    OutOfStock,

    /// The operation targets a product that is not in the cart.
    #[error("product {0} is not in the cart")]
    NotFound(ProductId),

    /// Product or stock lookup failed.
    #[error("catalog lookup failed: {0}")]
    Catalog(#[from] CatalogError),

    /// The snapshot write failed. The in-memory cart was not touched.
    #[error("snapshot write failed: {0}")]
    Snapshot(#[from] SnapshotError),
}

/// The cart state container.
///
/// Cheaply cloneable via `Arc`. The container is the sole writer of the
/// cart sequence: reads clone the current value under a brief lock, and
/// stock/product lookups run with no lock held. Two overlapping
/// operations on the same product resolve last-write-wins, which is
/// acceptable for a single-user demo.
#[derive(Clone)]
pub struct CartService {
    inner: Arc<CartServiceInner>,
}

struct CartServiceInner {
    catalog: Arc<dyn CatalogApi>,
    store: SnapshotStore,
    cart: RwLock<Cart>,
}

impl CartService {
    /// Create the container, hydrating the cart from the snapshot store.
    ///
    /// A missing snapshot is the normal first run and yields an empty
    /// cart. An unreadable snapshot logs a warning and also starts
    /// empty; the next successful mutation rewrites it.
    #[must_use]
    pub fn new(catalog: Arc<dyn CatalogApi>, store: SnapshotStore) -> Self {
        let cart = match store.load() {
            Ok(Some(cart)) => cart,
            Ok(None) => Cart::empty(),
            Err(e) => {
                warn!(
                    path = %store.path().display(),
                    "ignoring unreadable cart snapshot: {e}"
                );
                Cart::empty()
            }
        };

        Self {
            inner: Arc::new(CartServiceInner {
                catalog,
                store,
                cart: RwLock::new(cart),
            }),
        }
    }

    /// Current cart contents.
    #[must_use]
    pub fn cart(&self) -> Cart {
        self.inner.cart.read().clone()
    }

    /// Derived view: product id to cart quantity, for the listing page.
    #[must_use]
    pub fn amounts(&self) -> HashMap<ProductId, u32> {
        self.inner.cart.read().amounts()
    }

    /// Add one unit of a product.
    ///
    /// A product already in the cart has its quantity incremented after
    /// a fresh stock check; a new product is looked up in the catalog
    /// and appended at quantity 1.
    ///
    /// # Errors
    ///
    /// [`CartError::OutOfStock`] when the cart already holds all the
    /// available stock; [`CartError::Catalog`] when a lookup fails;
    /// [`CartError::Snapshot`] when persisting fails. In every error
    /// case the cart is unchanged.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn add_product(&self, id: ProductId) -> Result<Cart, CartError> {
        let cart = self.cart();
        match cart.amount_of(id) {
            Some(current) => {
                let stock = self.inner.catalog.stock(id).await?;
                if current >= stock.amount {
                    return Err(CartError::OutOfStock);
                }
                let updated = cart
                    .with_amount(id, current + 1)
                    .ok_or(CartError::NotFound(id))?;
                Ok(self.commit(updated)?)
            }
            None => {
                let product = self.inner.catalog.product(id).await?;
                Ok(self.commit(cart.with_new(product))?)
            }
        }
    }

    /// Remove a product from the cart. No network involved.
    ///
    /// # Errors
    ///
    /// [`CartError::NotFound`] when the product is not in the cart;
    /// [`CartError::Snapshot`] when persisting fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub fn remove_product(&self, id: ProductId) -> Result<Cart, CartError> {
        let cart = self.cart();
        let updated = cart.with_removed(id).ok_or(CartError::NotFound(id))?;
        Ok(self.commit(updated)?)
    }

    /// Set a product's quantity.
    ///
    /// Quantities of zero or less are ignored and return the cart
    /// unchanged: the decrement control in the UI bottoms out silently
    /// instead of erroring.
    ///
    /// # Errors
    ///
    /// [`CartError::OutOfStock`] when the stock cannot cover the
    /// requested quantity; [`CartError::NotFound`] when the product is
    /// not in the cart; [`CartError::Catalog`] / [`CartError::Snapshot`]
    /// for lookup and persistence failures. In every error case the cart
    /// is unchanged.
    #[instrument(skip(self), fields(product_id = %id, amount))]
    pub async fn update_amount(&self, id: ProductId, amount: i64) -> Result<Cart, CartError> {
        if amount <= 0 {
            return Ok(self.cart());
        }
        // Quantities beyond u32 can never be satisfied by any stock.
        let Ok(amount) = u32::try_from(amount) else {
            return Err(CartError::OutOfStock);
        };

        let stock = self.inner.catalog.stock(id).await?;
        if stock.amount < amount {
            return Err(CartError::OutOfStock);
        }

        let cart = self.cart();
        let updated = cart
            .with_amount(id, amount)
            .ok_or(CartError::NotFound(id))?;
        Ok(self.commit(updated)?)
    }

    /// Persist the new cart, then make it current.
    ///
    /// Write-ahead: a failed snapshot write applies nothing, so memory
    /// and disk stay consistent.
    fn commit(&self, cart: Cart) -> Result<Cart, SnapshotError> {
        self.inner.store.save(&cart)?;
        *self.inner.cart.write() = cart.clone();
        Ok(cart)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use async_trait::async_trait;
    use rocketshoes_core::{CartItem, Product, Stock};
    use rust_decimal::Decimal;
    use tempfile::TempDir;

    use super::*;

    /// In-memory catalog fixture injected through the `CatalogApi` seam.
    struct FixtureCatalog {
        products: HashMap<ProductId, Product>,
        stock: HashMap<ProductId, u32>,
        down: bool,
    }

    impl FixtureCatalog {
        fn new(entries: &[(i64, u32)]) -> Self {
            let mut products = HashMap::new();
            let mut stock = HashMap::new();
            for &(id, amount) in entries {
                products.insert(ProductId::new(id), product(id));
                stock.insert(ProductId::new(id), amount);
            }
            Self {
                products,
                stock,
                down: false,
            }
        }

        fn unavailable() -> Self {
            Self {
                products: HashMap::new(),
                stock: HashMap::new(),
                down: true,
            }
        }

        fn check_up(&self) -> Result<(), CatalogError> {
            if self.down {
                return Err(CatalogError::Status(
                    reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                ));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl CatalogApi for FixtureCatalog {
        async fn products(&self) -> Result<Vec<Product>, CatalogError> {
            self.check_up()?;
            let mut products: Vec<Product> = self.products.values().cloned().collect();
            products.sort_by_key(|p| p.id);
            Ok(products)
        }

        async fn product(&self, id: ProductId) -> Result<Product, CatalogError> {
            self.check_up()?;
            self.products
                .get(&id)
                .cloned()
                .ok_or_else(|| CatalogError::NotFound(format!("products/{id}")))
        }

        async fn stock(&self, id: ProductId) -> Result<Stock, CatalogError> {
            self.check_up()?;
            self.stock
                .get(&id)
                .map(|&amount| Stock { id, amount })
                .ok_or_else(|| CatalogError::NotFound(format!("stock/{id}")))
        }
    }

    fn product(id: i64) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Tênis {id}"),
            price: Decimal::new(17990, 2),
            image: format!("https://example.com/{id}.jpg"),
        }
    }

    fn service(catalog: FixtureCatalog) -> (CartService, SnapshotStore, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("cart.json"));
        let service = CartService::new(Arc::new(catalog), store.clone());
        (service, store, dir)
    }

    fn seeded_cart(entries: &[(i64, u32)]) -> Cart {
        Cart::from(
            entries
                .iter()
                .map(|&(id, amount)| CartItem {
                    product: product(id),
                    amount,
                })
                .collect::<Vec<_>>(),
        )
    }

    #[tokio::test]
    async fn test_add_new_product_appends_and_persists() {
        let (service, store, _dir) = service(FixtureCatalog::new(&[(1, 5)]));

        let cart = service.add_product(ProductId::new(1)).await.unwrap();

        assert_eq!(cart.amount_of(ProductId::new(1)), Some(1));
        assert_eq!(store.load().unwrap().unwrap(), cart);
    }

    #[tokio::test]
    async fn test_add_existing_product_increments_amount() {
        let (service, _store, _dir) = service(FixtureCatalog::new(&[(1, 5)]));

        service.add_product(ProductId::new(1)).await.unwrap();
        let cart = service.add_product(ProductId::new(1)).await.unwrap();

        assert_eq!(cart.amount_of(ProductId::new(1)), Some(2));
        assert_eq!(cart.len(), 1);
    }

    #[tokio::test]
    async fn test_add_at_stock_ceiling_is_out_of_stock() {
        let catalog = FixtureCatalog::new(&[(1, 5)]);
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("cart.json"));
        store.save(&seeded_cart(&[(1, 5)])).unwrap();
        let service = CartService::new(Arc::new(catalog), store.clone());

        let err = service.add_product(ProductId::new(1)).await.unwrap_err();

        assert!(matches!(err, CartError::OutOfStock));
        assert_eq!(service.cart(), seeded_cart(&[(1, 5)]));
        // No snapshot write happened either.
        assert_eq!(store.load().unwrap().unwrap(), seeded_cart(&[(1, 5)]));
    }

    #[tokio::test]
    async fn test_add_unknown_product_is_a_catalog_error() {
        let (service, _store, _dir) = service(FixtureCatalog::new(&[(1, 5)]));

        let err = service.add_product(ProductId::new(99)).await.unwrap_err();

        assert!(matches!(err, CartError::Catalog(CatalogError::NotFound(_))));
        assert!(service.cart().is_empty());
    }

    #[tokio::test]
    async fn test_catalog_failure_leaves_cart_unchanged() {
        let (service, _store, _dir) = service(FixtureCatalog::unavailable());

        let err = service.add_product(ProductId::new(1)).await.unwrap_err();

        assert!(matches!(err, CartError::Catalog(_)));
        assert!(service.cart().is_empty());
    }

    #[tokio::test]
    async fn test_remove_product_persists_the_smaller_cart() {
        let (service, store, _dir) = service(FixtureCatalog::new(&[(1, 5), (2, 5)]));
        service.add_product(ProductId::new(1)).await.unwrap();
        service.add_product(ProductId::new(2)).await.unwrap();

        let cart = service.remove_product(ProductId::new(1)).unwrap();

        assert!(!cart.contains(ProductId::new(1)));
        assert!(cart.contains(ProductId::new(2)));
        assert_eq!(store.load().unwrap().unwrap(), cart);
    }

    #[tokio::test]
    async fn test_remove_missing_product_is_not_found() {
        let (service, _store, _dir) = service(FixtureCatalog::new(&[(1, 5)]));
        service.add_product(ProductId::new(1)).await.unwrap();
        let before = service.cart();

        let err = service.remove_product(ProductId::new(99)).unwrap_err();

        assert!(matches!(err, CartError::NotFound(_)));
        assert_eq!(service.cart(), before);
    }

    #[tokio::test]
    async fn test_update_amount_sets_and_persists() {
        let (service, store, _dir) = service(FixtureCatalog::new(&[(1, 10)]));
        service.add_product(ProductId::new(1)).await.unwrap();

        let cart = service
            .update_amount(ProductId::new(1), 3)
            .await
            .unwrap();

        assert_eq!(cart.amount_of(ProductId::new(1)), Some(3));
        assert_eq!(store.load().unwrap().unwrap(), cart);
    }

    #[tokio::test]
    async fn test_update_zero_or_negative_is_a_silent_noop() {
        // The fixture is down: reaching the stock service would error, so
        // a clean pass proves the guard short-circuits before any lookup.
        let (service, store, _dir) = service(FixtureCatalog::unavailable());

        let cart = service.update_amount(ProductId::new(1), 0).await.unwrap();
        assert!(cart.is_empty());

        let cart = service.update_amount(ProductId::new(1), -4).await.unwrap();
        assert!(cart.is_empty());

        // Nothing was persisted either.
        assert!(store.load().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_beyond_stock_is_out_of_stock() {
        let (service, _store, _dir) = service(FixtureCatalog::new(&[(1, 2)]));
        service.add_product(ProductId::new(1)).await.unwrap();

        let err = service
            .update_amount(ProductId::new(1), 3)
            .await
            .unwrap_err();

        assert!(matches!(err, CartError::OutOfStock));
        assert_eq!(service.cart().amount_of(ProductId::new(1)), Some(1));
    }

    #[tokio::test]
    async fn test_update_product_not_in_cart_is_not_found() {
        let (service, _store, _dir) = service(FixtureCatalog::new(&[(1, 5)]));

        let err = service
            .update_amount(ProductId::new(1), 2)
            .await
            .unwrap_err();

        assert!(matches!(err, CartError::NotFound(_)));
        assert!(service.cart().is_empty());
    }

    #[tokio::test]
    async fn test_repeated_adds_respect_the_stock_ceiling() {
        let (service, _store, _dir) = service(FixtureCatalog::new(&[(1, 3)]));

        for _ in 0..3 {
            service.add_product(ProductId::new(1)).await.unwrap();
        }
        let err = service.add_product(ProductId::new(1)).await.unwrap_err();

        assert!(matches!(err, CartError::OutOfStock));
        let cart = service.cart();
        assert_eq!(cart.amount_of(ProductId::new(1)), Some(3));
        // Still a single line item for the id.
        assert_eq!(cart.len(), 1);
    }

    #[tokio::test]
    async fn test_snapshot_write_failure_rolls_back() {
        let catalog = FixtureCatalog::new(&[(1, 5)]);
        let dir = tempfile::tempdir().unwrap();
        // Pointing the store at a directory makes every write fail.
        let store = SnapshotStore::new(dir.path());
        let service = CartService::new(Arc::new(catalog), store);

        let err = service.add_product(ProductId::new(1)).await.unwrap_err();

        assert!(matches!(err, CartError::Snapshot(_)));
        assert!(service.cart().is_empty());
    }

    #[tokio::test]
    async fn test_hydrates_from_an_existing_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("cart.json"));
        let persisted = seeded_cart(&[(1, 2), (2, 1)]);
        store.save(&persisted).unwrap();

        let service = CartService::new(Arc::new(FixtureCatalog::new(&[])), store);

        assert_eq!(service.cart(), persisted);
        assert_eq!(service.amounts().get(&ProductId::new(1)), Some(&2));
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_hydrates_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cart.json");
        std::fs::write(&path, "not json at all").unwrap();

        let service = CartService::new(
            Arc::new(FixtureCatalog::new(&[])),
            SnapshotStore::new(path),
        );

        assert!(service.cart().is_empty());
    }
}
