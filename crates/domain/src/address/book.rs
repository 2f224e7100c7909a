//! Address book collaborator trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{AddressId, CustomerId};
use serde::{Deserialize, Serialize};

use super::AddressError;

/// Geographic coordinates of a delivery address.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// A saved delivery address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryAddress {
    /// Unique address identifier.
    pub id: AddressId,

    /// Optional label ("Home", "Office").
    pub label: Option<String>,

    /// The full address line used for delivery.
    pub address_line: String,

    /// Coordinates, when the address has been geocoded upstream.
    pub coordinates: Option<Coordinates>,

    /// Whether this is the customer's default address.
    /// At most one address per customer carries this flag.
    pub is_default: bool,

    /// When the address was saved.
    pub created_at: DateTime<Utc>,
}

/// A request to save a new delivery address.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewAddress {
    pub label: Option<String>,
    pub address_line: String,
    pub coordinates: Option<Coordinates>,
}

/// Trait for address book operations.
#[async_trait]
pub trait AddressBook: Send + Sync {
    /// Returns all saved addresses for a customer, oldest first.
    async fn addresses(&self, customer_id: CustomerId)
    -> Result<Vec<DeliveryAddress>, AddressError>;

    /// Returns the customer's default address, if any.
    async fn default_address(
        &self,
        customer_id: CustomerId,
    ) -> Result<Option<DeliveryAddress>, AddressError>;

    /// Saves a new address. The customer's first address becomes the default.
    async fn create(
        &self,
        customer_id: CustomerId,
        new: NewAddress,
    ) -> Result<DeliveryAddress, AddressError>;

    /// Marks an address as the default, unsetting the previous default in
    /// the same operation.
    async fn set_default(
        &self,
        customer_id: CustomerId,
        address_id: AddressId,
    ) -> Result<(), AddressError>;

    /// Deletes an address. Deleting the only saved address is rejected.
    async fn delete(
        &self,
        customer_id: CustomerId,
        address_id: AddressId,
    ) -> Result<(), AddressError>;
}

/// Resolves the delivery target for a checkout attempt.
///
/// A selected saved address wins over an entered line. A non-empty entered
/// line is persisted through the book so it shows up in the customer's
/// saved addresses afterwards. With neither, resolution fails and dispatch
/// must not be attempted.
pub async fn resolve_delivery_target<A: AddressBook + ?Sized>(
    book: &A,
    customer_id: CustomerId,
    selected: Option<AddressId>,
    new_line: Option<&str>,
) -> Result<DeliveryAddress, AddressError> {
    if let Some(address_id) = selected {
        let addresses = book.addresses(customer_id).await?;
        return addresses
            .into_iter()
            .find(|a| a.id == address_id)
            .ok_or(AddressError::NotFound { address_id });
    }

    match new_line.map(str::trim) {
        Some(line) if !line.is_empty() => {
            book.create(
                customer_id,
                NewAddress {
                    label: None,
                    address_line: line.to_string(),
                    coordinates: None,
                },
            )
            .await
        }
        _ => Err(AddressError::NoDeliveryTarget),
    }
}

#[derive(Debug, Default)]
struct InMemoryAddressState {
    books: HashMap<CustomerId, Vec<DeliveryAddress>>,
}

/// In-memory address book.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAddressBook {
    state: Arc<RwLock<InMemoryAddressState>>,
}

impl InMemoryAddressBook {
    /// Creates a new empty address book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of addresses saved for a customer.
    pub fn address_count(&self, customer_id: CustomerId) -> usize {
        self.state
            .read()
            .unwrap()
            .books
            .get(&customer_id)
            .map_or(0, Vec::len)
    }
}

#[async_trait]
impl AddressBook for InMemoryAddressBook {
    async fn addresses(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<DeliveryAddress>, AddressError> {
        let state = self.state.read().unwrap();
        Ok(state.books.get(&customer_id).cloned().unwrap_or_default())
    }

    async fn default_address(
        &self,
        customer_id: CustomerId,
    ) -> Result<Option<DeliveryAddress>, AddressError> {
        let state = self.state.read().unwrap();
        Ok(state
            .books
            .get(&customer_id)
            .and_then(|book| book.iter().find(|a| a.is_default).cloned()))
    }

    async fn create(
        &self,
        customer_id: CustomerId,
        new: NewAddress,
    ) -> Result<DeliveryAddress, AddressError> {
        let line = new.address_line.trim();
        if line.is_empty() {
            return Err(AddressError::EmptyAddressLine);
        }

        let mut state = self.state.write().unwrap();
        let book = state.books.entry(customer_id).or_default();

        let address = DeliveryAddress {
            id: AddressId::new(),
            label: new.label,
            address_line: line.to_string(),
            coordinates: new.coordinates,
            is_default: book.is_empty(),
            created_at: Utc::now(),
        };
        book.push(address.clone());
        Ok(address)
    }

    async fn set_default(
        &self,
        customer_id: CustomerId,
        address_id: AddressId,
    ) -> Result<(), AddressError> {
        let mut state = self.state.write().unwrap();
        let book = state.books.entry(customer_id).or_default();

        if !book.iter().any(|a| a.id == address_id) {
            return Err(AddressError::NotFound { address_id });
        }

        for address in book.iter_mut() {
            address.is_default = address.id == address_id;
        }
        Ok(())
    }

    async fn delete(
        &self,
        customer_id: CustomerId,
        address_id: AddressId,
    ) -> Result<(), AddressError> {
        let mut state = self.state.write().unwrap();
        let book = state.books.entry(customer_id).or_default();

        if !book.iter().any(|a| a.id == address_id) {
            return Err(AddressError::NotFound { address_id });
        }
        if book.len() == 1 {
            return Err(AddressError::LastAddress);
        }

        let was_default = book
            .iter()
            .find(|a| a.id == address_id)
            .is_some_and(|a| a.is_default);
        book.retain(|a| a.id != address_id);

        // The default flag must not vanish with the deleted address.
        if was_default {
            if let Some(first) = book.first_mut() {
                first.is_default = true;
            }
        }
        Ok(())
    }
}
