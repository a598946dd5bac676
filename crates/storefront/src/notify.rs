//! Toast notifications over HTMX trigger headers.
//!
//! The cart service reports outcomes as typed results; this module turns
//! them into the fire-and-forget messages the browser shows. Events ride
//! on the `HX-Trigger` response header as a JSON payload:
//!
//! ```json
//! { "toast": { "kind": "error", "message": "..." }, "cart-updated": null }
//! ```
//!
//! The base template listens for the `toast` event and renders it; the
//! cart count badge refreshes on `cart-updated`. Message texts are the
//! demo's original pt-BR strings.

use serde_json::{Map, Value};

use crate::cart::CartError;

/// Name of the HTMX trigger response header.
pub const HX_TRIGGER: &str = "HX-Trigger";

/// Message shown after a product is added to the cart.
pub const PRODUCT_ADDED: &str = "Produto adicionado ao Carrinho";
/// Message for any requested quantity the stock cannot cover.
pub const OUT_OF_STOCK: &str = "Quantidade solicitada fora de estoque";

const ADD_FAILED: &str = "Erro na adição do produto";
const REMOVE_FAILED: &str = "Erro na remoção do produto";
const UPDATE_FAILED: &str = "Erro na alteração de quantidade do produto";

/// Cart operation a failure message is produced for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartOp {
    Add,
    Remove,
    Update,
}

/// User-facing message for a failed cart operation.
///
/// Out of stock has its specific message; every other failure collapses
/// to the operation's generic one. Callers get exactly one notification
/// per failed operation.
#[must_use]
pub fn failure_message(op: CartOp, error: &CartError) -> &'static str {
    match error {
        CartError::OutOfStock => OUT_OF_STOCK,
        CartError::NotFound(_) | CartError::Catalog(_) | CartError::Snapshot(_) => match op {
            CartOp::Add => ADD_FAILED,
            CartOp::Remove => REMOVE_FAILED,
            CartOp::Update => UPDATE_FAILED,
        },
    }
}

/// A fire-and-forget user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

/// Visual flavor of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

impl ToastKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

impl Toast {
    /// A success toast.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Success,
            message: message.into(),
        }
    }

    /// An error toast.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            message: message.into(),
        }
    }
}

/// Build the `HX-Trigger` payload: an optional toast plus the
/// `cart-updated` event emitted after successful mutations.
///
/// The payload is ASCII-only: header values with raw UTF-8 get mangled
/// by `getResponseHeader` on the browser side, so the pt-BR text is
/// `\u`-escaped inside the JSON strings.
#[must_use]
pub fn hx_trigger(toast: Option<&Toast>, cart_updated: bool) -> String {
    let mut events = Map::new();
    if let Some(toast) = toast {
        let mut body = Map::new();
        body.insert(
            "kind".to_string(),
            Value::String(toast.kind.as_str().to_string()),
        );
        body.insert("message".to_string(), Value::String(toast.message.clone()));
        events.insert("toast".to_string(), Value::Object(body));
    }
    if cart_updated {
        events.insert("cart-updated".to_string(), Value::Null);
    }
    escape_non_ascii(&Value::Object(events).to_string())
}

/// `\u`-escape every non-ASCII character of a JSON document.
///
/// Non-ASCII only ever appears inside string values here, where the
/// escape form is always valid JSON.
fn escape_non_ascii(payload: &str) -> String {
    let mut out = String::with_capacity(payload.len());
    let mut units = [0_u16; 2];
    for c in payload.chars() {
        if c.is_ascii() {
            out.push(c);
        } else {
            for unit in c.encode_utf16(&mut units).iter() {
                out.push_str(&format!("\\u{unit:04x}"));
            }
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::catalog::CatalogError;
    use rocketshoes_core::ProductId;

    use super::*;

    #[test]
    fn test_out_of_stock_wins_over_the_generic_message() {
        for op in [CartOp::Add, CartOp::Remove, CartOp::Update] {
            assert_eq!(failure_message(op, &CartError::OutOfStock), OUT_OF_STOCK);
        }
    }

    #[test]
    fn test_generic_messages_per_operation() {
        let not_found = CartError::NotFound(ProductId::new(1));
        assert_eq!(
            failure_message(CartOp::Add, &not_found),
            "Erro na adição do produto"
        );
        assert_eq!(
            failure_message(CartOp::Remove, &not_found),
            "Erro na remoção do produto"
        );
        assert_eq!(
            failure_message(CartOp::Update, &not_found),
            "Erro na alteração de quantidade do produto"
        );

        let transient = CartError::Catalog(CatalogError::NotFound("stock/1".to_string()));
        assert_eq!(
            failure_message(CartOp::Add, &transient),
            "Erro na adição do produto"
        );
    }

    #[test]
    fn test_hx_trigger_payload_shape() {
        let toast = Toast::error(OUT_OF_STOCK);
        let payload: serde_json::Value =
            serde_json::from_str(&hx_trigger(Some(&toast), false)).unwrap();

        assert_eq!(payload["toast"]["kind"], "error");
        assert_eq!(payload["toast"]["message"], OUT_OF_STOCK);
        assert!(payload.get("cart-updated").is_none());
    }

    #[test]
    fn test_hx_trigger_payload_is_ascii_but_round_trips_accents() {
        let toast = Toast::error("Erro na adição do produto");
        let raw = hx_trigger(Some(&toast), false);
        assert!(raw.is_ascii());

        let payload: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(payload["toast"]["message"], "Erro na adição do produto");
    }

    #[test]
    fn test_hx_trigger_with_cart_updated() {
        let toast = Toast::success(PRODUCT_ADDED);
        let payload: serde_json::Value =
            serde_json::from_str(&hx_trigger(Some(&toast), true)).unwrap();

        assert_eq!(payload["toast"]["kind"], "success");
        assert!(payload.as_object().unwrap().contains_key("cart-updated"));
    }

    #[test]
    fn test_hx_trigger_update_only() {
        let payload: serde_json::Value = serde_json::from_str(&hx_trigger(None, true)).unwrap();
        assert!(payload.get("toast").is_none());
        assert!(payload.as_object().unwrap().contains_key("cart-updated"));
    }
}
