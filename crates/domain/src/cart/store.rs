//! Cart store collaborator trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::{CartItemId, CustomerId, MenuItemId, RestaurantId};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::{CartError, CartLineItem, Money};

/// Notification published whenever a customer's cart is mutated.
///
/// Subscribers (cart badge, open cart views) re-read the cart through the
/// store on receipt instead of relying on shared mutable state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CartEvent {
    /// The customer's cart contents changed.
    Changed { customer_id: CustomerId },
}

/// A request to add a menu item to a cart.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCartItem {
    /// The menu item to add.
    pub menu_item_id: MenuItemId,
    /// The restaurant that owns the menu item.
    pub restaurant_id: RestaurantId,
    /// Restaurant name for display.
    pub restaurant_name: String,
    /// Quantity to add. Must be at least 1.
    pub quantity: u32,
    /// Price per unit.
    pub unit_price: Money,
}

/// Trait for cart persistence operations.
///
/// The storefront treats the cart store as an external collaborator; this
/// trait is its contract. `remove_items` exists so checkout cleanup can
/// clear every successful group's lines in one mutation.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Returns all line items in a customer's cart, in insertion order.
    async fn retrieve_cart(&self, customer_id: CustomerId) -> Result<Vec<CartLineItem>, CartError>;

    /// Adds an item to a customer's cart.
    ///
    /// Adding a menu item already present in the cart merges quantities
    /// into the existing line instead of creating a duplicate.
    async fn add_item(
        &self,
        customer_id: CustomerId,
        item: NewCartItem,
    ) -> Result<CartLineItem, CartError>;

    /// Updates the quantity of an existing line item.
    async fn update_quantity(
        &self,
        customer_id: CustomerId,
        cart_item_id: CartItemId,
        quantity: u32,
    ) -> Result<CartLineItem, CartError>;

    /// Removes a single line item from a customer's cart.
    async fn remove_item(
        &self,
        customer_id: CustomerId,
        cart_item_id: CartItemId,
    ) -> Result<(), CartError>;

    /// Removes a batch of line items in one mutation.
    ///
    /// IDs that are no longer present are skipped, so replaying the same
    /// cleanup is a no-op.
    async fn remove_items(
        &self,
        customer_id: CustomerId,
        cart_item_ids: &[CartItemId],
    ) -> Result<(), CartError>;
}

#[derive(Debug, Default)]
struct InMemoryCartState {
    carts: HashMap<CustomerId, Vec<CartLineItem>>,
}

/// In-memory cart store.
///
/// Backs the serving surface and the test suites. Every mutation publishes
/// a [`CartEvent::Changed`] on the broadcast channel.
#[derive(Debug, Clone)]
pub struct InMemoryCartStore {
    state: Arc<RwLock<InMemoryCartState>>,
    events: broadcast::Sender<CartEvent>,
}

impl InMemoryCartStore {
    /// Creates a new empty cart store.
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            state: Arc::new(RwLock::new(InMemoryCartState::default())),
            events,
        }
    }

    /// Subscribes to cart change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<CartEvent> {
        self.events.subscribe()
    }

    /// Returns the number of line items in a customer's cart.
    pub fn item_count(&self, customer_id: CustomerId) -> usize {
        self.state
            .read()
            .unwrap()
            .carts
            .get(&customer_id)
            .map_or(0, Vec::len)
    }

    fn publish_changed(&self, customer_id: CustomerId) {
        // Nobody listening is fine.
        self.events.send(CartEvent::Changed { customer_id }).ok();
    }
}

impl Default for InMemoryCartStore {
    fn default() -> Self {
        Self::new()
    }
}

fn validate(quantity: u32, unit_price: Money) -> Result<(), CartError> {
    if quantity == 0 {
        return Err(CartError::InvalidQuantity { quantity });
    }
    if unit_price.is_negative() {
        return Err(CartError::InvalidPrice {
            price: unit_price.cents(),
        });
    }
    Ok(())
}

#[async_trait]
impl CartStore for InMemoryCartStore {
    async fn retrieve_cart(&self, customer_id: CustomerId) -> Result<Vec<CartLineItem>, CartError> {
        let state = self.state.read().unwrap();
        Ok(state.carts.get(&customer_id).cloned().unwrap_or_default())
    }

    async fn add_item(
        &self,
        customer_id: CustomerId,
        item: NewCartItem,
    ) -> Result<CartLineItem, CartError> {
        validate(item.quantity, item.unit_price)?;

        let line = {
            let mut state = self.state.write().unwrap();
            let cart = state.carts.entry(customer_id).or_default();

            if let Some(existing) = cart
                .iter_mut()
                .find(|line| line.menu_item_id == item.menu_item_id)
            {
                existing.quantity += item.quantity;
                existing.clone()
            } else {
                let line = CartLineItem::new(
                    item.menu_item_id,
                    item.restaurant_id,
                    item.restaurant_name,
                    item.quantity,
                    item.unit_price,
                );
                cart.push(line.clone());
                line
            }
        };

        tracing::debug!(%customer_id, cart_item_id = %line.id, "cart item added");
        self.publish_changed(customer_id);
        Ok(line)
    }

    async fn update_quantity(
        &self,
        customer_id: CustomerId,
        cart_item_id: CartItemId,
        quantity: u32,
    ) -> Result<CartLineItem, CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity { quantity });
        }

        let line = {
            let mut state = self.state.write().unwrap();
            let cart = state.carts.entry(customer_id).or_default();
            let line = cart
                .iter_mut()
                .find(|line| line.id == cart_item_id)
                .ok_or(CartError::ItemNotFound { cart_item_id })?;
            line.quantity = quantity;
            line.clone()
        };

        self.publish_changed(customer_id);
        Ok(line)
    }

    async fn remove_item(
        &self,
        customer_id: CustomerId,
        cart_item_id: CartItemId,
    ) -> Result<(), CartError> {
        {
            let mut state = self.state.write().unwrap();
            let cart = state.carts.entry(customer_id).or_default();
            let before = cart.len();
            cart.retain(|line| line.id != cart_item_id);
            if cart.len() == before {
                return Err(CartError::ItemNotFound { cart_item_id });
            }
        }

        self.publish_changed(customer_id);
        Ok(())
    }

    async fn remove_items(
        &self,
        customer_id: CustomerId,
        cart_item_ids: &[CartItemId],
    ) -> Result<(), CartError> {
        let removed = {
            let mut state = self.state.write().unwrap();
            let cart = state.carts.entry(customer_id).or_default();
            let before = cart.len();
            cart.retain(|line| !cart_item_ids.contains(&line.id));
            before - cart.len()
        };

        if removed > 0 {
            tracing::debug!(%customer_id, removed, "cart lines cleared");
            self.publish_changed(customer_id);
        }
        Ok(())
    }
}
