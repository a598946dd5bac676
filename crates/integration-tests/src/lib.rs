//! Integration tests for RocketShoes.
//!
//! Spawns the fixture catalog and the storefront on ephemeral ports and
//! drives the cart over real HTTP with `reqwest`. The helpers here are
//! shared by the tests under `tests/`.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p rocketshoes-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use rust_decimal::Decimal;
use tempfile::TempDir;
use url::Url;

use rocketshoes_core::{Product, ProductId, Stock};
use rocketshoes_storefront::config::{CatalogConfig, StorefrontConfig};
use rocketshoes_storefront::state::AppState;

/// In-memory inventory served by the fixture catalog.
#[derive(Debug, Clone)]
pub struct Inventory {
    pub products: Vec<Product>,
    pub stock: Vec<Stock>,
}

impl Inventory {
    /// The inventory most tests use.
    ///
    /// Product 1 has plenty of stock, product 2 only two units, product
    /// 3 a single one.
    #[must_use]
    pub fn demo() -> Self {
        Self {
            products: vec![
                product(1, 17990, "Tênis de Caminhada Leve Confortável"),
                product(2, 13990, "Tênis VR Caminhada Confortável Detalhes Couro"),
                product(3, 21990, "Tênis Adidas Duramo Lite 2.0"),
            ],
            stock: vec![stock(1, 5), stock(2, 2), stock(3, 1)],
        }
    }
}

/// Build a catalog product for fixtures.
#[must_use]
pub fn product(id: i64, price_cents: i64, title: &str) -> Product {
    Product {
        id: ProductId::new(id),
        title: title.to_string(),
        price: Decimal::new(price_cents, 2),
        image: format!("https://rocketshoes.test/images/{id}.jpg"),
    }
}

/// Build a stock record for fixtures.
#[must_use]
pub const fn stock(id: i64, amount: u32) -> Stock {
    Stock {
        id: ProductId::new(id),
        amount,
    }
}

/// A running storefront wired to a fixture catalog.
pub struct TestContext {
    pub base_url: String,
    pub client: reqwest::Client,
    pub snapshot_path: PathBuf,
    _snapshot_dir: TempDir,
}

impl TestContext {
    /// Spawn the fixture catalog and the storefront.
    ///
    /// # Panics
    ///
    /// Panics when a listener cannot be bound or the snapshot directory
    /// cannot be created; tests treat both as fatal.
    pub async fn new(inventory: Inventory) -> Self {
        let catalog_addr = spawn(catalog_router(inventory)).await;

        let snapshot_dir = tempfile::tempdir().expect("create snapshot dir");
        let snapshot_path = snapshot_dir.path().join("cart.json");

        let config = StorefrontConfig {
            host: "127.0.0.1".parse().expect("bind ip"),
            port: 0,
            catalog: CatalogConfig {
                base_url: Url::parse(&format!("http://{catalog_addr}")).expect("catalog url"),
            },
            snapshot_path: snapshot_path.clone(),
        };

        let app = rocketshoes_storefront::app(AppState::new(config));
        let addr = spawn(app).await;

        Self {
            base_url: format!("http://{addr}"),
            client: reqwest::Client::new(),
            snapshot_path,
            _snapshot_dir: snapshot_dir,
        }
    }

    /// GET a storefront path.
    ///
    /// # Panics
    ///
    /// Panics when the request itself fails.
    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{path}", self.base_url))
            .send()
            .await
            .expect("GET request")
    }

    /// POST a form to a storefront path.
    ///
    /// # Panics
    ///
    /// Panics when the request itself fails.
    pub async fn post_form(&self, path: &str, form: &[(&str, String)]) -> reqwest::Response {
        self.client
            .post(format!("{}{path}", self.base_url))
            .form(form)
            .send()
            .await
            .expect("POST request")
    }

    /// The persisted snapshot document, if one was written.
    ///
    /// # Panics
    ///
    /// Panics when the snapshot file exists but is not valid JSON.
    #[must_use]
    pub fn snapshot(&self) -> Option<serde_json::Value> {
        std::fs::read_to_string(&self.snapshot_path)
            .ok()
            .map(|raw| serde_json::from_str(&raw).expect("snapshot is valid JSON"))
    }
}

/// Decode an `HX-Trigger` header into its JSON payload.
///
/// # Panics
///
/// Panics when the header is missing or not valid JSON.
#[must_use]
pub fn trigger_payload(response: &reqwest::Response) -> serde_json::Value {
    let header = response
        .headers()
        .get("HX-Trigger")
        .expect("HX-Trigger header");
    let raw = header.to_str().expect("ASCII header value");
    serde_json::from_str(raw).expect("trigger payload is valid JSON")
}

/// Bind an ephemeral port and serve the router in the background.
async fn spawn(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    addr
}

// =============================================================================
// Fixture catalog
// =============================================================================

fn catalog_router(inventory: Inventory) -> Router {
    Router::new()
        .route("/products", get(list_products))
        .route("/products/{id}", get(get_product))
        .route("/stock/{id}", get(get_stock))
        .with_state(Arc::new(inventory))
}

async fn list_products(State(inventory): State<Arc<Inventory>>) -> Json<Vec<Product>> {
    Json(inventory.products.clone())
}

async fn get_product(
    State(inventory): State<Arc<Inventory>>,
    Path(id): Path<i64>,
) -> Result<Json<Product>, StatusCode> {
    let id = ProductId::new(id);
    inventory
        .products
        .iter()
        .find(|p| p.id == id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn get_stock(
    State(inventory): State<Arc<Inventory>>,
    Path(id): Path<i64>,
) -> Result<Json<Stock>, StatusCode> {
    let id = ProductId::new(id);
    inventory
        .stock
        .iter()
        .find(|s| s.id == id)
        .copied()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}
