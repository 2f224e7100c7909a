//! Checkout error types.

use domain::{AddressError, CartError, SessionError};
use thiserror::Error;

/// Errors that can occur during checkout orchestration.
///
/// These cover validation and collaborator failures around the dispatch
/// barrier. A failed order-creation request for one restaurant is NOT an
/// error: it is captured as that group's outcome and aggregated.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// A session transition was rejected.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Cart store error.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Address book error.
    #[error("Address error: {0}")]
    Address(#[from] AddressError),

    /// Checkout was attempted against an empty cart.
    #[error("Cannot check out an empty cart")]
    EmptyCart,

    /// Order-creation service error for a single request.
    #[error("Ordering service error: {0}")]
    OrderingService(String),
}

/// Convenience type alias for checkout results.
pub type Result<T> = std::result::Result<T, CheckoutError>;
