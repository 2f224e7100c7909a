//! Domain layer for the storefront checkout system.
//!
//! This crate provides the core domain building blocks:
//! - Cart line items, the `CartStore` collaborator trait, and the cart
//!   change notification channel
//! - The address book with default-address handling and delivery-target
//!   resolution
//! - The checkout session state machine that gates the wizard steps

pub mod address;
pub mod cart;
pub mod checkout;

pub use address::{
    AddressBook, AddressError, Coordinates, DeliveryAddress, InMemoryAddressBook, NewAddress,
    resolve_delivery_target,
};
pub use cart::{
    CartError, CartEvent, CartLineItem, CartStore, InMemoryCartStore, Money, NewCartItem,
};
pub use checkout::{CheckoutSession, CheckoutStep, PaymentMethod, SessionError};
