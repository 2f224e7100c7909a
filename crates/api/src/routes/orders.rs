//! Checkout endpoint: places one order per restaurant in the cart.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use checkout::{CheckoutCoordinator, CheckoutResult, InMemoryOrderingService};
use common::{AddressId, CustomerId};
use domain::{
    CartStore, CheckoutSession, InMemoryAddressBook, InMemoryCartStore, PaymentMethod,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub cart: InMemoryCartStore,
    pub addresses: InMemoryAddressBook,
    pub ordering: InMemoryOrderingService,
    pub coordinator:
        CheckoutCoordinator<InMemoryCartStore, InMemoryAddressBook, InMemoryOrderingService>,
}

// -- Request types --

#[derive(Deserialize)]
pub struct CheckoutRequest {
    /// Contact phone number. Must be non-empty.
    pub phone: String,
    /// A saved address to deliver to. Wins over `new_address_line`.
    pub address_id: Option<Uuid>,
    /// A freshly entered address line, saved on successful resolution.
    pub new_address_line: Option<String>,
    /// Payment method; only `"cash"` is accepted.
    pub payment_method: PaymentMethod,
}

// -- Response types --

#[derive(Serialize)]
pub struct CheckoutResponse {
    pub classification: String,
    pub step: String,
    pub successful_order_ids: Vec<i64>,
    pub failed_orders: Vec<FailedOrderResponse>,
    /// Snapshot of what was ordered, for the confirmation view. Empty when
    /// no order was created.
    pub ordered_items: Vec<OrderedItemResponse>,
}

#[derive(Serialize)]
pub struct FailedOrderResponse {
    pub restaurant_name: String,
    pub error: String,
}

#[derive(Serialize)]
pub struct OrderedItemResponse {
    pub restaurant_name: String,
    pub menu_item_id: String,
    pub quantity: u32,
    pub unit_price_cents: i64,
    pub line_total_cents: i64,
}

// -- Handlers --

/// POST /checkout/:customer_id — walk the checkout wizard and place one
/// order per restaurant in the cart.
///
/// Validation failures (empty cart, missing phone or address, unknown
/// address) map to 4xx before any dispatch happens. Once dispatch has
/// settled, the response is 200 with the classified result; per-restaurant
/// failures are payload, not transport errors.
#[tracing::instrument(skip(state, req))]
pub async fn place(
    State(state): State<Arc<AppState>>,
    Path(customer_id): Path<String>,
    Json(req): Json<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>, ApiError> {
    let customer_id = parse_customer_id(&customer_id)?;

    let cart_items = state.cart.retrieve_cart(customer_id).await?;

    let mut session = CheckoutSession::new(customer_id);
    session.proceed_to_details(cart_items.len())?;
    session.set_phone(req.phone)?;
    if let Some(address_id) = req.address_id {
        session.select_address(AddressId::from_uuid(address_id))?;
    }
    if let Some(line) = req.new_address_line {
        session.enter_address_line(line)?;
    }
    session.proceed_to_payment()?;
    session.select_payment_method(req.payment_method)?;

    let result = state.coordinator.submit(&mut session).await?;

    Ok(Json(to_response(&session, &result)))
}

fn to_response(session: &CheckoutSession, result: &CheckoutResult) -> CheckoutResponse {
    CheckoutResponse {
        classification: result.classification().to_string(),
        step: session.step().to_string(),
        successful_order_ids: result
            .successful_order_ids
            .iter()
            .map(|id| id.value())
            .collect(),
        failed_orders: result
            .failed_orders
            .iter()
            .map(|f| FailedOrderResponse {
                restaurant_name: f.restaurant_name.clone(),
                error: f.error.clone(),
            })
            .collect(),
        ordered_items: session
            .cart_snapshot()
            .iter()
            .map(|item| OrderedItemResponse {
                restaurant_name: item.restaurant_name.clone(),
                menu_item_id: item.menu_item_id.to_string(),
                quantity: item.quantity,
                unit_price_cents: item.unit_price.cents(),
                line_total_cents: item.line_total().cents(),
            })
            .collect(),
    }
}

pub(crate) fn parse_customer_id(id: &str) -> Result<CustomerId, ApiError> {
    let uuid = Uuid::parse_str(id)
        .map_err(|e| ApiError::BadRequest(format!("Invalid customer_id: {e}")))?;
    Ok(CustomerId::from_uuid(uuid))
}
