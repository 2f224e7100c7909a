//! Checkout orchestration for multi-restaurant carts.
//!
//! A cart may hold items from several independent restaurants; there is no
//! cross-restaurant transaction. Checkout therefore:
//! 1. Partitions the cart into one group per restaurant
//! 2. Dispatches one order-creation request per group, concurrently
//! 3. Waits for every request to settle (a fan-out/fan-in barrier)
//! 4. Folds the per-group outcomes into a single classified result
//! 5. Clears only the successful groups' items from the cart
//!
//! Per-group failures are captured as data, never thrown: every failure
//! path resolves to a renderable result.

pub mod coordinator;
pub mod dispatch;
pub mod error;
pub mod partition;
pub mod result;
pub mod services;

pub use coordinator::CheckoutCoordinator;
pub use dispatch::{DEFAULT_REQUEST_TIMEOUT, Dispatcher, Outcome, OrderOutcome};
pub use error::CheckoutError;
pub use partition::{OrderGroup, partition_by_restaurant};
pub use result::{CheckoutResult, Classification, FailedOrder};
pub use services::{CreatedOrder, InMemoryOrderingService, OrderingService, PlacedOrder};
