//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page
//! reloads. Outcomes reach the user as toast events on the `HX-Trigger`
//! response header, never as failed responses: on error the handler
//! re-renders the current state with the failure toast attached.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use rocketshoes_core::{Cart, ProductId, format_brl};

use crate::cart::CartError;
use crate::filters;
use crate::notify::{self, CartOp, Toast};
use crate::state::AppState;

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: i64,
    pub title: String,
    pub price: String,
    pub amount: u32,
    pub line_total: String,
    pub image: String,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
    pub item_count: u32,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart
                .items()
                .iter()
                .map(|item| CartItemView {
                    id: item.id().as_i64(),
                    title: item.product.title.clone(),
                    price: format_brl(item.product.price),
                    amount: item.amount,
                    line_total: format_brl(item.line_total()),
                    image: item.product.image.clone(),
                })
                .collect(),
            total: format_brl(cart.total()),
            item_count: cart.item_count(),
        }
    }
}

/// Add/remove form data.
#[derive(Debug, Deserialize)]
pub struct ProductForm {
    pub product_id: i64,
}

/// Update-quantity form data.
#[derive(Debug, Deserialize)]
pub struct UpdateAmountForm {
    pub product_id: i64,
    pub amount: i64,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// `HX-Trigger` headers carrying a failure toast for the operation.
fn failure_headers(op: CartOp, error: &CartError) -> AppendHeaders<[(&'static str, String); 1]> {
    let toast = Toast::error(notify::failure_message(op, error));
    AppendHeaders([(notify::HX_TRIGGER, notify::hx_trigger(Some(&toast), false))])
}

/// `HX-Trigger` headers for a successful mutation.
fn success_headers(toast: Option<&Toast>) -> AppendHeaders<[(&'static str, String); 1]> {
    AppendHeaders([(notify::HX_TRIGGER, notify::hx_trigger(toast, true))])
}

/// Display the cart page.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> impl IntoResponse {
    CartShowTemplate {
        cart: CartView::from(&state.cart().cart()),
    }
}

/// Add one unit of a product (HTMX).
///
/// Returns the cart count badge; the success toast and the
/// `cart-updated` event ride on the `HX-Trigger` header.
#[instrument(skip(state))]
pub async fn add(State(state): State<AppState>, Form(form): Form<ProductForm>) -> Response {
    let id = ProductId::new(form.product_id);

    match state.cart().add_product(id).await {
        Ok(cart) => {
            let toast = Toast::success(notify::PRODUCT_ADDED);
            (
                success_headers(Some(&toast)),
                CartCountTemplate {
                    count: cart.item_count(),
                },
            )
                .into_response()
        }
        Err(e) => {
            tracing::warn!(product_id = %id, "add to cart failed: {e}");
            (
                failure_headers(CartOp::Add, &e),
                CartCountTemplate {
                    count: state.cart().cart().item_count(),
                },
            )
                .into_response()
        }
    }
}

/// Set a cart line's quantity (HTMX).
///
/// A quantity of zero or less is a silent no-op: the current items are
/// re-rendered with no toast and no `cart-updated` event.
#[instrument(skip(state))]
pub async fn update(State(state): State<AppState>, Form(form): Form<UpdateAmountForm>) -> Response {
    let id = ProductId::new(form.product_id);

    match state.cart().update_amount(id, form.amount).await {
        Ok(cart) => {
            let body = CartItemsTemplate {
                cart: CartView::from(&cart),
            };
            if form.amount > 0 {
                (success_headers(None), body).into_response()
            } else {
                body.into_response()
            }
        }
        Err(e) => {
            tracing::warn!(product_id = %id, "cart update failed: {e}");
            (
                failure_headers(CartOp::Update, &e),
                CartItemsTemplate {
                    cart: CartView::from(&state.cart().cart()),
                },
            )
                .into_response()
        }
    }
}

/// Remove a cart line (HTMX).
#[instrument(skip(state))]
pub async fn remove(State(state): State<AppState>, Form(form): Form<ProductForm>) -> Response {
    let id = ProductId::new(form.product_id);

    match state.cart().remove_product(id) {
        Ok(cart) => (
            success_headers(None),
            CartItemsTemplate {
                cart: CartView::from(&cart),
            },
        )
            .into_response(),
        Err(e) => {
            tracing::warn!(product_id = %id, "cart removal failed: {e}");
            (
                failure_headers(CartOp::Remove, &e),
                CartItemsTemplate {
                    cart: CartView::from(&state.cart().cart()),
                },
            )
                .into_response()
        }
    }
}

/// Get the cart count badge (HTMX).
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> impl IntoResponse {
    CartCountTemplate {
        count: state.cart().cart().item_count(),
    }
}
