//! Aggregates module
pub mod catalog;
pub mod cart;
pub mod order;

pub use catalog::{next_id, BlogPatch, Entity, ProductPatch};
pub use cart::{CartEngine, CartLine, OrderState, OrderSummary};
pub use order::{format_order_message, Checkout, CheckoutError, CheckoutLink};
