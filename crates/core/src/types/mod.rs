//! Domain types for the RocketShoes demo shop.

mod cart;
mod id;
mod price;
mod product;
mod stock;

pub use cart::Cart;
pub use id::ProductId;
pub use price::format_brl;
pub use product::{CartItem, Product};
pub use stock::Stock;
