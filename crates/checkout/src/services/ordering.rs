//! Ordering service trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{CustomerId, OrderId, RestaurantId};
use domain::{CartLineItem, DeliveryAddress, PaymentMethod};

use crate::error::CheckoutError;

/// Result of a successful order creation.
#[derive(Debug, Clone)]
pub struct PlacedOrder {
    /// The order number assigned by the order-creation service.
    pub order_id: OrderId,
}

/// Trait for the external order-creation service.
///
/// One call creates one order for one restaurant. The dispatcher issues
/// these calls concurrently, one per cart group; each call must stand on
/// its own so a rejection for one restaurant never affects another.
#[async_trait]
pub trait OrderingService: Send + Sync {
    /// Creates an order for a single restaurant's items.
    async fn create_order(
        &self,
        customer_id: CustomerId,
        restaurant_id: RestaurantId,
        items: &[CartLineItem],
        delivery_address: &DeliveryAddress,
        payment_method: PaymentMethod,
    ) -> Result<PlacedOrder, CheckoutError>;
}

/// A persisted order, as recorded by the in-memory service.
#[derive(Debug, Clone)]
pub struct CreatedOrder {
    pub order_id: OrderId,
    pub customer_id: CustomerId,
    pub restaurant_id: RestaurantId,
    pub items: Vec<CartLineItem>,
    pub address_line: String,
    pub payment_method: PaymentMethod,
    pub placed_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct InMemoryOrderingState {
    orders: Vec<CreatedOrder>,
    next_id: i64,
    fail_for: HashMap<RestaurantId, String>,
    delay_for: HashMap<RestaurantId, Duration>,
}

/// In-memory ordering service for testing.
///
/// Assigns sequential order numbers. Failures and artificial latency can
/// be injected per restaurant to exercise partial-failure and timeout
/// paths.
#[derive(Debug, Clone, Default)]
pub struct InMemoryOrderingService {
    state: Arc<RwLock<InMemoryOrderingState>>,
}

impl InMemoryOrderingService {
    /// Creates a new in-memory ordering service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures order creation to fail for one restaurant with the
    /// given error message.
    pub fn set_fail_for(&self, restaurant_id: RestaurantId, error: impl Into<String>) {
        self.state
            .write()
            .unwrap()
            .fail_for
            .insert(restaurant_id, error.into());
    }

    /// Removes a previously configured failure.
    pub fn clear_fail_for(&self, restaurant_id: RestaurantId) {
        self.state.write().unwrap().fail_for.remove(&restaurant_id);
    }

    /// Delays order creation for one restaurant by the given duration.
    pub fn set_delay_for(&self, restaurant_id: RestaurantId, delay: Duration) {
        self.state
            .write()
            .unwrap()
            .delay_for
            .insert(restaurant_id, delay);
    }

    /// Returns the number of orders created so far.
    pub fn order_count(&self) -> usize {
        self.state.read().unwrap().orders.len()
    }

    /// Returns the number of orders created for one restaurant.
    pub fn order_count_for(&self, restaurant_id: RestaurantId) -> usize {
        self.state
            .read()
            .unwrap()
            .orders
            .iter()
            .filter(|o| o.restaurant_id == restaurant_id)
            .count()
    }

    /// Returns all orders created so far.
    pub fn orders(&self) -> Vec<CreatedOrder> {
        self.state.read().unwrap().orders.clone()
    }
}

#[async_trait]
impl OrderingService for InMemoryOrderingService {
    async fn create_order(
        &self,
        customer_id: CustomerId,
        restaurant_id: RestaurantId,
        items: &[CartLineItem],
        delivery_address: &DeliveryAddress,
        payment_method: PaymentMethod,
    ) -> Result<PlacedOrder, CheckoutError> {
        // Apply configured latency without holding the lock.
        let delay = self.state.read().unwrap().delay_for.get(&restaurant_id).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.state.write().unwrap();

        if let Some(error) = state.fail_for.get(&restaurant_id) {
            return Err(CheckoutError::OrderingService(error.clone()));
        }

        state.next_id += 1;
        let order_id = OrderId::new(state.next_id);
        state.orders.push(CreatedOrder {
            order_id,
            customer_id,
            restaurant_id,
            items: items.to_vec(),
            address_line: delivery_address.address_line.clone(),
            payment_method,
            placed_at: Utc::now(),
        });

        Ok(PlacedOrder { order_id })
    }
}
