//! Saved delivery address endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::AddressId;
use domain::{AddressBook, Coordinates, DeliveryAddress, NewAddress};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

use super::orders::{AppState, parse_customer_id};

// -- Request types --

#[derive(Deserialize)]
pub struct CreateAddressRequest {
    pub label: Option<String>,
    pub address_line: String,
    pub coordinates: Option<Coordinates>,
}

// -- Response types --

#[derive(Serialize)]
pub struct AddressResponse {
    pub id: String,
    pub label: Option<String>,
    pub address_line: String,
    pub coordinates: Option<Coordinates>,
    pub is_default: bool,
}

#[derive(Serialize)]
pub struct AddressListResponse {
    pub addresses: Vec<AddressResponse>,
    pub default_address_id: Option<String>,
}

impl From<&DeliveryAddress> for AddressResponse {
    fn from(address: &DeliveryAddress) -> Self {
        Self {
            id: address.id.to_string(),
            label: address.label.clone(),
            address_line: address.address_line.clone(),
            coordinates: address.coordinates,
            is_default: address.is_default,
        }
    }
}

// -- Handlers --

/// GET /addresses/:customer_id — saved addresses plus the default, if any.
#[tracing::instrument(skip(state))]
pub async fn list(
    State(state): State<Arc<AppState>>,
    Path(customer_id): Path<String>,
) -> Result<Json<AddressListResponse>, ApiError> {
    let customer_id = parse_customer_id(&customer_id)?;

    let addresses = state.addresses.addresses(customer_id).await?;
    let default_address_id = addresses
        .iter()
        .find(|a| a.is_default)
        .map(|a| a.id.to_string());

    Ok(Json(AddressListResponse {
        addresses: addresses.iter().map(AddressResponse::from).collect(),
        default_address_id,
    }))
}

/// POST /addresses/:customer_id — save a new address.
#[tracing::instrument(skip(state, req))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    Path(customer_id): Path<String>,
    Json(req): Json<CreateAddressRequest>,
) -> Result<(StatusCode, Json<AddressResponse>), ApiError> {
    let customer_id = parse_customer_id(&customer_id)?;

    let address = state
        .addresses
        .create(
            customer_id,
            NewAddress {
                label: req.label,
                address_line: req.address_line,
                coordinates: req.coordinates,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(AddressResponse::from(&address))))
}

/// POST /addresses/:customer_id/:address_id/default — make an address the
/// default, demoting the previous one.
#[tracing::instrument(skip(state))]
pub async fn set_default(
    State(state): State<Arc<AppState>>,
    Path((customer_id, address_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let customer_id = parse_customer_id(&customer_id)?;
    let address_id = parse_address_id(&address_id)?;

    state.addresses.set_default(customer_id, address_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /addresses/:customer_id/:address_id — delete an address. The
/// only remaining address cannot be deleted.
#[tracing::instrument(skip(state))]
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path((customer_id, address_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let customer_id = parse_customer_id(&customer_id)?;
    let address_id = parse_address_id(&address_id)?;

    state.addresses.delete(customer_id, address_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn parse_address_id(id: &str) -> Result<AddressId, ApiError> {
    let uuid = Uuid::parse_str(id)
        .map_err(|e| ApiError::BadRequest(format!("Invalid address_id: {e}")))?;
    Ok(AddressId::from_uuid(uuid))
}
