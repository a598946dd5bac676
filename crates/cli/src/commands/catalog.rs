//! Fixture catalog server.
//!
//! Serves `/products`, `/products/{id}` and `/stock/{id}` from a JSON
//! fixture file - the development stand-in for a real catalog service.
//! The storefront points at it through `CATALOG_API_URL`.

use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path as PathParam, State},
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;

use rocketshoes_core::{Product, ProductId, Stock};

/// Demo inventory loaded from the fixture file.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogFixture {
    pub products: Vec<Product>,
    pub stock: Vec<Stock>,
}

impl CatalogFixture {
    /// Load a fixture from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// Build the fixture catalog router.
#[must_use]
pub fn router(fixture: CatalogFixture) -> Router {
    Router::new()
        .route("/products", get(products))
        .route("/products/{id}", get(product))
        .route("/stock/{id}", get(stock))
        .with_state(Arc::new(fixture))
}

/// Serve the fixture catalog until interrupted.
///
/// # Errors
///
/// Returns an error if the fixture cannot be loaded or the listener
/// cannot be bound.
pub async fn serve(
    host: IpAddr,
    port: u16,
    fixture_path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let fixture = CatalogFixture::from_file(fixture_path)?;
    tracing::info!(
        products = fixture.products.len(),
        fixture = %fixture_path.display(),
        "catalog fixture loaded"
    );

    let addr = SocketAddr::new(host, port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("catalog fixture listening on {addr}");

    axum::serve(listener, router(fixture)).await?;
    Ok(())
}

async fn products(State(fixture): State<Arc<CatalogFixture>>) -> Json<Vec<Product>> {
    Json(fixture.products.clone())
}

async fn product(
    State(fixture): State<Arc<CatalogFixture>>,
    PathParam(id): PathParam<i64>,
) -> Result<Json<Product>, StatusCode> {
    let id = ProductId::new(id);
    fixture
        .products
        .iter()
        .find(|p| p.id == id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn stock(
    State(fixture): State<Arc<CatalogFixture>>,
    PathParam(id): PathParam<i64>,
) -> Result<Json<Stock>, StatusCode> {
    let id = ProductId::new(id);
    fixture
        .stock
        .iter()
        .find(|s| s.id == id)
        .copied()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}
