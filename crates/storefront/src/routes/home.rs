//! Product listing page.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use rocketshoes_core::format_brl;

use crate::catalog::CatalogApi;
use crate::error::AppError;
use crate::filters;
use crate::state::AppState;

/// Product card data for the listing template.
#[derive(Clone)]
pub struct ProductView {
    pub id: i64,
    pub title: String,
    pub price: String,
    pub image: String,
    /// Quantity already in the cart (0 when absent).
    pub cart_amount: u32,
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "home/index.html")]
pub struct HomeTemplate {
    pub products: Vec<ProductView>,
}

/// Display the product listing with per-product cart quantities.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<HomeTemplate, AppError> {
    let products = state.catalog().products().await?;
    let amounts = state.cart().amounts();

    let products = products
        .into_iter()
        .map(|product| ProductView {
            id: product.id.as_i64(),
            cart_amount: amounts.get(&product.id).copied().unwrap_or(0),
            title: product.title,
            price: format_brl(product.price),
            image: product.image,
        })
        .collect();

    Ok(HomeTemplate { products })
}
