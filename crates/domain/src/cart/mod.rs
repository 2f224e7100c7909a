//! Cart line items and the cart store collaborator.

mod store;
mod value_objects;

pub use store::{CartEvent, CartStore, InMemoryCartStore, NewCartItem};
pub use value_objects::{CartLineItem, Money};

use common::CartItemId;
use thiserror::Error;

/// Errors that can occur during cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Item not found in the cart.
    #[error("Cart item not found: {cart_item_id}")]
    ItemNotFound { cart_item_id: CartItemId },

    /// Invalid quantity.
    #[error("Invalid quantity: {quantity} (must be at least 1)")]
    InvalidQuantity { quantity: u32 },

    /// Invalid unit price.
    #[error("Invalid unit price: {price} (must not be negative)")]
    InvalidPrice { price: i64 },
}
