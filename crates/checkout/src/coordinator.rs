//! Checkout coordinator for multi-restaurant order placement.

use common::{CartItemId, CustomerId};
use domain::{
    AddressBook, CartLineItem, CartStore, CheckoutSession, DeliveryAddress, PaymentMethod,
    SessionError, resolve_delivery_target,
};

use crate::dispatch::Dispatcher;
use crate::error::CheckoutError;
use crate::partition::partition_by_restaurant;
use crate::result::{CheckoutResult, Classification};
use crate::services::OrderingService;

/// Orchestrates one checkout attempt end to end.
///
/// The coordinator partitions the cart by restaurant, dispatches one
/// order-creation request per group behind a fan-out/fan-in barrier,
/// folds the outcomes into a [`CheckoutResult`], and clears the
/// successful groups' items from the cart. There is deliberately no
/// cross-restaurant transaction: each group stands or falls on its own.
pub struct CheckoutCoordinator<C, A, O>
where
    C: CartStore,
    A: AddressBook,
    O: OrderingService,
{
    cart: C,
    addresses: A,
    dispatcher: Dispatcher<O>,
}

impl<C, A, O> CheckoutCoordinator<C, A, O>
where
    C: CartStore,
    A: AddressBook,
    O: OrderingService,
{
    /// Creates a new coordinator with the default per-request timeout.
    pub fn new(cart: C, addresses: A, ordering: O) -> Self {
        Self::with_dispatcher(cart, addresses, Dispatcher::new(ordering))
    }

    /// Creates a new coordinator around a preconfigured dispatcher.
    pub fn with_dispatcher(cart: C, addresses: A, dispatcher: Dispatcher<O>) -> Self {
        Self {
            cart,
            addresses,
            dispatcher,
        }
    }

    /// Places one order per restaurant represented in `cart_items`.
    ///
    /// The single entry point wrapping partition → dispatch → aggregate →
    /// cleanup. Per-group failures are captured in the returned result;
    /// an `Err` here means the checkout could not be attempted at all
    /// (empty cart) or the cart store rejected the cleanup.
    ///
    /// Cleanup removes only the lines of groups whose order was created,
    /// in one batch mutation; failed groups' lines stay in the cart so
    /// the customer can retry just those restaurants.
    #[tracing::instrument(skip_all, fields(%customer_id, items = cart_items.len()))]
    pub async fn place_multiple_orders(
        &self,
        customer_id: CustomerId,
        cart_items: &[CartLineItem],
        delivery_address: &DeliveryAddress,
        payment_method: PaymentMethod,
    ) -> Result<CheckoutResult, CheckoutError> {
        metrics::counter!("checkout_attempts_total").increment(1);
        let checkout_start = std::time::Instant::now();

        if cart_items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let groups = partition_by_restaurant(cart_items);
        tracing::info!(groups = groups.len(), "dispatching restaurant groups");

        let outcomes = self
            .dispatcher
            .dispatch(customer_id, delivery_address, payment_method, &groups)
            .await;
        let result = CheckoutResult::from_outcomes(&outcomes);

        // One batch mutation: the lines of every group that produced an
        // order. Groups and outcomes are position-aligned.
        let cleared: Vec<CartItemId> = groups
            .iter()
            .zip(&outcomes)
            .filter(|(_, outcome)| outcome.is_success())
            .flat_map(|(group, _)| group.item_ids())
            .collect();
        if !cleared.is_empty() {
            self.cart.remove_items(customer_id, &cleared).await?;
        }

        metrics::counter!("checkout_orders_created_total")
            .increment(result.total_successful() as u64);
        match result.classification() {
            Classification::TotalSuccess => {
                metrics::counter!("checkout_completed").increment(1);
                tracing::info!(orders = result.total_successful(), "checkout completed");
            }
            Classification::PartialSuccess => {
                metrics::counter!("checkout_partial").increment(1);
                tracing::warn!(
                    orders = result.total_successful(),
                    failed = result.total_failed(),
                    "checkout partially completed"
                );
            }
            Classification::TotalFailure => {
                metrics::counter!("checkout_failed").increment(1);
                tracing::warn!(failed = result.total_failed(), "checkout failed");
            }
        }
        metrics::histogram!("checkout_duration_seconds")
            .record(checkout_start.elapsed().as_secs_f64());

        Ok(result)
    }

    /// Submits a checkout session sitting at the Payment step.
    ///
    /// Resolves the delivery target, snapshots the cart, enters Placing,
    /// runs [`Self::place_multiple_orders`], and settles the session:
    /// Confirmation when at least one order was created, back to Payment
    /// on total failure. Validation errors surface before Placing is
    /// entered, leaving the session interactive.
    #[tracing::instrument(
        skip(self, session),
        fields(customer_id = %session.customer_id(), step = %session.step())
    )]
    pub async fn submit(
        &self,
        session: &mut CheckoutSession,
    ) -> Result<CheckoutResult, CheckoutError> {
        let customer_id = session.customer_id();

        let payment_method = session
            .payment_method()
            .ok_or(SessionError::MissingPaymentMethod)?;
        let delivery_address = resolve_delivery_target(
            &self.addresses,
            customer_id,
            session.selected_address(),
            session.new_address_line(),
        )
        .await?;
        let cart_items = self.cart.retrieve_cart(customer_id).await?;

        session.begin_placing(cart_items.clone())?;

        let result = match self
            .place_multiple_orders(customer_id, &cart_items, &delivery_address, payment_method)
            .await
        {
            Ok(result) => result,
            Err(e) => {
                // Settle the session before surfacing the error; Placing
                // must not outlive the dispatch barrier.
                session.return_to_payment()?;
                return Err(e);
            }
        };

        if result.any_success() {
            session.confirm()?;
        } else {
            session.return_to_payment()?;
        }

        Ok(result)
    }
}
