//! Application state shared across handlers.

use std::sync::Arc;

use crate::cart::CartService;
use crate::catalog::CatalogClient;
use crate::config::StorefrontConfig;
use crate::snapshot::SnapshotStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// catalog client and the cart state container.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: CatalogClient,
    cart: CartService,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Builds the catalog client from the configuration and hydrates the
    /// cart container from the snapshot store.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let catalog = CatalogClient::new(&config.catalog);
        let store = SnapshotStore::new(config.snapshot_path.clone());
        let cart = CartService::new(Arc::new(catalog.clone()), store);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                cart,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog API client.
    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }

    /// Get a reference to the cart state container.
    #[must_use]
    pub fn cart(&self) -> &CartService {
        &self.inner.cart
    }
}
