//! Concurrent per-restaurant order dispatch.

use std::time::Duration;

use common::{CustomerId, OrderId, RestaurantId};
use domain::{DeliveryAddress, PaymentMethod};
use futures_util::future::join_all;
use serde::Serialize;

use crate::partition::OrderGroup;
use crate::services::OrderingService;

/// Default per-request timeout. An expired request counts as a failure
/// outcome for that group, same as an application rejection.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// How one group's order-creation request settled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Outcome {
    /// The order was created.
    Success { order_id: OrderId },
    /// The request failed; no order exists for this group.
    Failure { error: String },
}

/// The settled outcome of one order group's request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderOutcome {
    /// The restaurant this outcome belongs to.
    pub restaurant_id: RestaurantId,

    /// Restaurant name for display.
    pub restaurant_name: String,

    /// How the request settled.
    pub outcome: Outcome,
}

impl OrderOutcome {
    /// Returns true if the order was created.
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Success { .. })
    }

    /// Returns the created order's ID, if the request succeeded.
    pub fn order_id(&self) -> Option<OrderId> {
        match &self.outcome {
            Outcome::Success { order_id } => Some(*order_id),
            Outcome::Failure { .. } => None,
        }
    }

    /// Returns the failure message, if the request failed.
    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Success { .. } => None,
            Outcome::Failure { error } => Some(error),
        }
    }
}

/// Issues one order-creation request per group, concurrently.
///
/// The dispatch is a fan-out/fan-in barrier: every request runs to
/// completion (or times out) and the returned outcomes are aligned with
/// the input groups by position, regardless of which request settled
/// first. First-result-wins would be wrong here; every group's outcome
/// matters.
pub struct Dispatcher<O: OrderingService> {
    ordering: O,
    request_timeout: Duration,
}

impl<O: OrderingService> Dispatcher<O> {
    /// Creates a dispatcher with the default per-request timeout.
    pub fn new(ordering: O) -> Self {
        Self::with_timeout(ordering, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Creates a dispatcher with a custom per-request timeout.
    pub fn with_timeout(ordering: O, request_timeout: Duration) -> Self {
        Self {
            ordering,
            request_timeout,
        }
    }

    /// Dispatches all groups and waits for every request to settle.
    ///
    /// Returns exactly one outcome per input group, in input order.
    /// Failures (rejections, timeouts) are captured as data; this method
    /// never fails as a whole and nothing is retried.
    #[tracing::instrument(skip_all, fields(%customer_id, groups = groups.len()))]
    pub async fn dispatch(
        &self,
        customer_id: CustomerId,
        delivery_address: &DeliveryAddress,
        payment_method: PaymentMethod,
        groups: &[OrderGroup],
    ) -> Vec<OrderOutcome> {
        let requests = groups.iter().map(|group| {
            self.place_group(customer_id, delivery_address, payment_method, group)
        });

        // join_all polls every request concurrently and yields results in
        // input order.
        join_all(requests).await
    }

    async fn place_group(
        &self,
        customer_id: CustomerId,
        delivery_address: &DeliveryAddress,
        payment_method: PaymentMethod,
        group: &OrderGroup,
    ) -> OrderOutcome {
        let request = self.ordering.create_order(
            customer_id,
            group.restaurant_id,
            &group.items,
            delivery_address,
            payment_method,
        );

        let outcome = match tokio::time::timeout(self.request_timeout, request).await {
            Ok(Ok(placed)) => {
                tracing::info!(
                    restaurant = %group.restaurant_name,
                    order_id = %placed.order_id,
                    "order created"
                );
                Outcome::Success {
                    order_id: placed.order_id,
                }
            }
            Ok(Err(e)) => {
                tracing::warn!(restaurant = %group.restaurant_name, error = %e, "order rejected");
                Outcome::Failure {
                    error: e.to_string(),
                }
            }
            Err(_) => {
                tracing::warn!(
                    restaurant = %group.restaurant_name,
                    timeout_secs = self.request_timeout.as_secs_f64(),
                    "order request timed out"
                );
                Outcome::Failure {
                    error: format!(
                        "order request timed out after {}s",
                        self.request_timeout.as_secs()
                    ),
                }
            }
        };

        OrderOutcome {
            restaurant_id: group.restaurant_id,
            restaurant_name: group.restaurant_name.clone(),
            outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::partition_by_restaurant;
    use crate::services::InMemoryOrderingService;
    use chrono::Utc;
    use common::{AddressId, MenuItemId, RestaurantId};
    use domain::{CartLineItem, Money};

    fn delivery_address() -> DeliveryAddress {
        DeliveryAddress {
            id: AddressId::new(),
            label: None,
            address_line: "1 Main St".to_string(),
            coordinates: None,
            is_default: true,
            created_at: Utc::now(),
        }
    }

    fn item(restaurant_id: RestaurantId, name: &str) -> CartLineItem {
        CartLineItem::new(
            MenuItemId::new(),
            restaurant_id,
            name,
            1,
            Money::from_cents(1000),
        )
    }

    #[tokio::test]
    async fn test_one_outcome_per_group_in_input_order() {
        let ordering = InMemoryOrderingService::new();
        let dispatcher = Dispatcher::new(ordering);
        let a = RestaurantId::new();
        let b = RestaurantId::new();
        let c = RestaurantId::new();
        let groups =
            partition_by_restaurant(&[item(a, "A"), item(b, "B"), item(c, "C")]);

        let outcomes = dispatcher
            .dispatch(
                CustomerId::new(),
                &delivery_address(),
                PaymentMethod::Cash,
                &groups,
            )
            .await;

        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0].restaurant_id, a);
        assert_eq!(outcomes[1].restaurant_id, b);
        assert_eq!(outcomes[2].restaurant_id, c);
        assert!(outcomes.iter().all(OrderOutcome::is_success));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_first_group_does_not_reorder_outcomes() {
        let ordering = InMemoryOrderingService::new();
        let a = RestaurantId::new();
        let b = RestaurantId::new();
        // The first group settles well after the second.
        ordering.set_delay_for(a, Duration::from_secs(5));

        let dispatcher = Dispatcher::new(ordering);
        let groups = partition_by_restaurant(&[item(a, "A"), item(b, "B")]);

        let outcomes = dispatcher
            .dispatch(
                CustomerId::new(),
                &delivery_address(),
                PaymentMethod::Cash,
                &groups,
            )
            .await;

        assert_eq!(outcomes[0].restaurant_id, a);
        assert_eq!(outcomes[1].restaurant_id, b);
        assert!(outcomes[0].is_success());
        assert!(outcomes[1].is_success());
    }

    #[tokio::test]
    async fn test_failure_is_isolated_to_its_group() {
        let ordering = InMemoryOrderingService::new();
        let a = RestaurantId::new();
        let b = RestaurantId::new();
        ordering.set_fail_for(b, "kitchen closed");

        let dispatcher = Dispatcher::new(ordering.clone());
        let groups = partition_by_restaurant(&[item(a, "A"), item(b, "B")]);

        let outcomes = dispatcher
            .dispatch(
                CustomerId::new(),
                &delivery_address(),
                PaymentMethod::Cash,
                &groups,
            )
            .await;

        assert!(outcomes[0].is_success());
        assert_eq!(outcomes[1].error(), Some("kitchen closed"));
        assert_eq!(ordering.order_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_becomes_failure_outcome() {
        let ordering = InMemoryOrderingService::new();
        let a = RestaurantId::new();
        let b = RestaurantId::new();
        // Well past the dispatcher's timeout.
        ordering.set_delay_for(b, Duration::from_secs(60));

        let dispatcher = Dispatcher::with_timeout(ordering.clone(), Duration::from_secs(10));
        let groups = partition_by_restaurant(&[item(a, "A"), item(b, "B")]);

        let outcomes = dispatcher
            .dispatch(
                CustomerId::new(),
                &delivery_address(),
                PaymentMethod::Cash,
                &groups,
            )
            .await;

        assert!(outcomes[0].is_success());
        assert!(outcomes[1].error().unwrap().contains("timed out"));
    }

    #[tokio::test]
    async fn test_no_groups_no_outcomes() {
        let dispatcher = Dispatcher::new(InMemoryOrderingService::new());
        let outcomes = dispatcher
            .dispatch(
                CustomerId::new(),
                &delivery_address(),
                PaymentMethod::Cash,
                &[],
            )
            .await;
        assert!(outcomes.is_empty());
    }
}
