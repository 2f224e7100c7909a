//! Shared types for the storefront checkout system.
//!
//! Identifier newtypes used across the cart, address, and checkout layers.
//! Wrapping UUIDs (and the collaborator-assigned order number) in distinct
//! types prevents mixing up identifier kinds at compile time.

pub mod types;

pub use types::{AddressId, CartItemId, CustomerId, MenuItemId, OrderId, RestaurantId};
