//! Cart CRUD endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::{CartItemId, MenuItemId, RestaurantId};
use domain::{CartLineItem, CartStore, Money, NewCartItem};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

use super::orders::{AppState, parse_customer_id};

// -- Request types --

#[derive(Deserialize)]
pub struct AddItemRequest {
    pub menu_item_id: Uuid,
    pub restaurant_id: Uuid,
    pub restaurant_name: String,
    pub quantity: u32,
    pub unit_price_cents: i64,
}

#[derive(Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: u32,
}

// -- Response types --

#[derive(Serialize)]
pub struct CartItemResponse {
    pub id: String,
    pub menu_item_id: String,
    pub restaurant_id: String,
    pub restaurant_name: String,
    pub quantity: u32,
    pub unit_price_cents: i64,
    pub line_total_cents: i64,
}

#[derive(Serialize)]
pub struct CartResponse {
    pub items: Vec<CartItemResponse>,
    pub total_cents: i64,
}

impl From<&CartLineItem> for CartItemResponse {
    fn from(item: &CartLineItem) -> Self {
        Self {
            id: item.id.to_string(),
            menu_item_id: item.menu_item_id.to_string(),
            restaurant_id: item.restaurant_id.to_string(),
            restaurant_name: item.restaurant_name.clone(),
            quantity: item.quantity,
            unit_price_cents: item.unit_price.cents(),
            line_total_cents: item.line_total().cents(),
        }
    }
}

// -- Handlers --

/// GET /cart/:customer_id — the customer's current cart.
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(customer_id): Path<String>,
) -> Result<Json<CartResponse>, ApiError> {
    let customer_id = parse_customer_id(&customer_id)?;
    let items = state.cart.retrieve_cart(customer_id).await?;

    let total: Money = items.iter().map(CartLineItem::line_total).sum();
    Ok(Json(CartResponse {
        items: items.iter().map(CartItemResponse::from).collect(),
        total_cents: total.cents(),
    }))
}

/// POST /cart/:customer_id/items — add a menu item to the cart.
#[tracing::instrument(skip(state, req))]
pub async fn add_item(
    State(state): State<Arc<AppState>>,
    Path(customer_id): Path<String>,
    Json(req): Json<AddItemRequest>,
) -> Result<(StatusCode, Json<CartItemResponse>), ApiError> {
    let customer_id = parse_customer_id(&customer_id)?;

    let line = state
        .cart
        .add_item(
            customer_id,
            NewCartItem {
                menu_item_id: MenuItemId::from_uuid(req.menu_item_id),
                restaurant_id: RestaurantId::from_uuid(req.restaurant_id),
                restaurant_name: req.restaurant_name,
                quantity: req.quantity,
                unit_price: Money::from_cents(req.unit_price_cents),
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(CartItemResponse::from(&line))))
}

/// PATCH /cart/:customer_id/items/:item_id — update a line's quantity.
#[tracing::instrument(skip(state, req))]
pub async fn update_item(
    State(state): State<Arc<AppState>>,
    Path((customer_id, item_id)): Path<(String, String)>,
    Json(req): Json<UpdateQuantityRequest>,
) -> Result<Json<CartItemResponse>, ApiError> {
    let customer_id = parse_customer_id(&customer_id)?;
    let cart_item_id = parse_cart_item_id(&item_id)?;

    let line = state
        .cart
        .update_quantity(customer_id, cart_item_id, req.quantity)
        .await?;

    Ok(Json(CartItemResponse::from(&line)))
}

/// DELETE /cart/:customer_id/items/:item_id — remove a line from the cart.
#[tracing::instrument(skip(state))]
pub async fn remove_item(
    State(state): State<Arc<AppState>>,
    Path((customer_id, item_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let customer_id = parse_customer_id(&customer_id)?;
    let cart_item_id = parse_cart_item_id(&item_id)?;

    state.cart.remove_item(customer_id, cart_item_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn parse_cart_item_id(id: &str) -> Result<CartItemId, ApiError> {
    let uuid =
        Uuid::parse_str(id).map_err(|e| ApiError::BadRequest(format!("Invalid item_id: {e}")))?;
    Ok(CartItemId::from_uuid(uuid))
}
