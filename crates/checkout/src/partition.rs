//! Cart partitioning: one order group per restaurant.

use std::collections::HashMap;

use common::{CartItemId, RestaurantId};
use domain::{CartLineItem, Money};
use serde::Serialize;

/// The subset of a cart's items belonging to one restaurant, treated as a
/// single order-creation unit.
///
/// Groups are derived fresh on every checkout attempt and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderGroup {
    /// The restaurant all items in this group belong to.
    pub restaurant_id: RestaurantId,

    /// Restaurant name for display and outcome attribution.
    pub restaurant_name: String,

    /// The cart lines that make up this order.
    pub items: Vec<CartLineItem>,
}

impl OrderGroup {
    /// Returns the order total for this group.
    pub fn total(&self) -> Money {
        self.items.iter().map(CartLineItem::line_total).sum()
    }

    /// Returns the cart line IDs in this group, for cleanup after a
    /// successful order.
    pub fn item_ids(&self) -> Vec<CartItemId> {
        self.items.iter().map(|item| item.id).collect()
    }
}

/// Splits cart lines into one [`OrderGroup`] per distinct restaurant.
///
/// Pure and side-effect free. Groups appear in order of each restaurant's
/// first appearance in the cart (deterministic, not sorted); within a
/// group, items keep their cart order. Every line lands in exactly one
/// group, and an empty cart yields no groups.
pub fn partition_by_restaurant(items: &[CartLineItem]) -> Vec<OrderGroup> {
    let mut groups: Vec<OrderGroup> = Vec::new();
    let mut index_by_restaurant: HashMap<RestaurantId, usize> = HashMap::new();

    for item in items {
        match index_by_restaurant.get(&item.restaurant_id) {
            Some(&index) => groups[index].items.push(item.clone()),
            None => {
                index_by_restaurant.insert(item.restaurant_id, groups.len());
                groups.push(OrderGroup {
                    restaurant_id: item.restaurant_id,
                    restaurant_name: item.restaurant_name.clone(),
                    items: vec![item.clone()],
                });
            }
        }
    }

    groups
}
