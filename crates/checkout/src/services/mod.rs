//! Order-creation collaborator trait and in-memory implementation.

pub mod ordering;

pub use ordering::{CreatedOrder, InMemoryOrderingService, OrderingService, PlacedOrder};
