//! Catalog API client.
//!
//! The catalog service is the demo's source of products and stock,
//! reached over plain JSON HTTP:
//!
//! - `GET /products` - all products
//! - `GET /products/{id}` - one product
//! - `GET /stock/{id}` - available quantity for a product
//!
//! Product reads are cached with `moka` (5-minute TTL). Stock is never
//! cached: it is the authoritative ceiling for cart quantities and must
//! be read fresh on every check.

mod cache;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};

use rocketshoes_core::{Product, ProductId, Stock};

use crate::config::CatalogConfig;
use cache::{CacheKey, CacheValue};

/// Errors that can occur when talking to the catalog API.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Catalog returned a non-success status.
    #[error("Unexpected status: {0}")]
    Status(reqwest::StatusCode),
}

/// Product and stock lookups as the cart container consumes them.
///
/// The storefront uses [`CatalogClient`]; tests inject in-memory
/// fixtures through this seam.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// All catalog products.
    async fn products(&self) -> Result<Vec<Product>, CatalogError>;

    /// One product by id.
    async fn product(&self, id: ProductId) -> Result<Product, CatalogError>;

    /// Available stock for a product. Never cached.
    async fn stock(&self, id: ProductId) -> Result<Stock, CatalogError>;
}

/// Client for the catalog API.
///
/// Cheaply cloneable; product responses are cached for 5 minutes.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: String,
    cache: Cache<CacheKey, CacheValue>,
}

impl CatalogClient {
    /// Create a new catalog API client.
    #[must_use]
    pub fn new(config: &CatalogConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self {
            inner: Arc::new(CatalogClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
                cache,
            }),
        }
    }

    /// Execute a GET request and decode the JSON body.
    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<T, CatalogError> {
        let url = format!("{}/{path}", self.inner.base_url);
        let response = self.inner.client.get(&url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(path.to_string()));
        }

        if !status.is_success() {
            tracing::error!(%status, path, "catalog returned non-success status");
            return Err(CatalogError::Status(status));
        }

        // Read the body as text first for better error diagnostics
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "failed to parse catalog response"
            );
            CatalogError::Parse(e)
        })
    }
}

#[async_trait]
impl CatalogApi for CatalogClient {
    #[instrument(skip(self))]
    async fn products(&self) -> Result<Vec<Product>, CatalogError> {
        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&CacheKey::Products).await
        {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let products: Vec<Product> = self.fetch("products").await?;

        self.inner
            .cache
            .insert(CacheKey::Products, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn product(&self, id: ProductId) -> Result<Product, CatalogError> {
        let key = CacheKey::Product(id);

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let product: Product = self.fetch(&format!("products/{id}")).await?;

        self.inner
            .cache
            .insert(key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    // Stock is the quantity ceiling for the cart; always read fresh.
    #[instrument(skip(self), fields(product_id = %id))]
    async fn stock(&self, id: ProductId) -> Result<Stock, CatalogError> {
        self.fetch(&format!("stock/{id}")).await
    }
}
