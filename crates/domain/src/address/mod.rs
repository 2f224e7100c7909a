//! Saved delivery addresses and delivery-target resolution.

mod book;

pub use book::{
    AddressBook, Coordinates, DeliveryAddress, InMemoryAddressBook, NewAddress,
    resolve_delivery_target,
};

use common::AddressId;
use thiserror::Error;

/// Errors that can occur during address operations.
#[derive(Debug, Error)]
pub enum AddressError {
    /// Address not found.
    #[error("Address not found: {address_id}")]
    NotFound { address_id: AddressId },

    /// The only remaining address cannot be deleted.
    #[error("Cannot delete the only saved address")]
    LastAddress,

    /// The address line is empty.
    #[error("Address line must not be empty")]
    EmptyAddressLine,

    /// No saved address was selected and no new address line was entered.
    #[error("No delivery address selected or entered")]
    NoDeliveryTarget,
}
