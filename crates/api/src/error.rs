//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use checkout::CheckoutError;
use domain::{AddressError, CartError, SessionError};

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from the client.
    BadRequest(String),
    /// Cart store error.
    Cart(CartError),
    /// Address book error.
    Address(AddressError),
    /// Checkout orchestration error.
    Checkout(CheckoutError),
    /// Internal server error.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Cart(err) => cart_error_to_response(&err),
            ApiError::Address(err) => address_error_to_response(&err),
            ApiError::Checkout(err) => checkout_error_to_response(&err),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn cart_error_to_response(err: &CartError) -> (StatusCode, String) {
    match err {
        CartError::ItemNotFound { .. } => (StatusCode::NOT_FOUND, err.to_string()),
        CartError::InvalidQuantity { .. } | CartError::InvalidPrice { .. } => {
            (StatusCode::BAD_REQUEST, err.to_string())
        }
    }
}

fn address_error_to_response(err: &AddressError) -> (StatusCode, String) {
    match err {
        AddressError::NotFound { .. } => (StatusCode::NOT_FOUND, err.to_string()),
        AddressError::LastAddress => (StatusCode::CONFLICT, err.to_string()),
        AddressError::EmptyAddressLine | AddressError::NoDeliveryTarget => {
            (StatusCode::BAD_REQUEST, err.to_string())
        }
    }
}

fn checkout_error_to_response(err: &CheckoutError) -> (StatusCode, String) {
    match err {
        CheckoutError::Session(SessionError::InvalidTransition { .. }) => {
            (StatusCode::CONFLICT, err.to_string())
        }
        CheckoutError::Session(_) | CheckoutError::EmptyCart => {
            (StatusCode::BAD_REQUEST, err.to_string())
        }
        CheckoutError::Cart(cart_err) => cart_error_to_response(cart_err),
        CheckoutError::Address(address_err) => address_error_to_response(address_err),
        // Per-group failures are data in the checkout result; an ordering
        // error escaping here means the collaborator itself misbehaved.
        CheckoutError::OrderingService(_) => (StatusCode::BAD_GATEWAY, err.to_string()),
    }
}

impl From<CartError> for ApiError {
    fn from(err: CartError) -> Self {
        ApiError::Cart(err)
    }
}

impl From<AddressError> for ApiError {
    fn from(err: AddressError) -> Self {
        ApiError::Address(err)
    }
}

impl From<CheckoutError> for ApiError {
    fn from(err: CheckoutError) -> Self {
        ApiError::Checkout(err)
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        ApiError::Checkout(CheckoutError::Session(err))
    }
}
