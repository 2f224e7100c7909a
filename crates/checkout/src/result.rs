//! Aggregation of per-group outcomes into a single checkout result.

use common::OrderId;
use serde::Serialize;

use crate::dispatch::OrderOutcome;

/// How a settled checkout is classified.
///
/// A derived view over the outcome counts, not a stored state; the caller
/// chooses messaging per classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Classification {
    /// Every restaurant group produced an order.
    TotalSuccess,

    /// Some but not all restaurant groups produced an order.
    PartialSuccess,

    /// No restaurant group produced an order.
    TotalFailure,
}

impl Classification {
    /// Returns the classification name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::TotalSuccess => "TotalSuccess",
            Classification::PartialSuccess => "PartialSuccess",
            Classification::TotalFailure => "TotalFailure",
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A restaurant group whose order-creation request failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedOrder {
    /// Restaurant name, for showing the customer which orders failed.
    pub restaurant_name: String,

    /// The failure message.
    pub error: String,
}

/// The single result of one checkout attempt across all restaurant groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutResult {
    /// Order numbers of every created order, in group order.
    pub successful_order_ids: Vec<OrderId>,

    /// The groups that failed, in group order, with their errors.
    pub failed_orders: Vec<FailedOrder>,
}

impl CheckoutResult {
    /// Folds settled outcomes into a result.
    ///
    /// Pure and idempotent: folding the same outcome list twice yields the
    /// same result. Every outcome lands in exactly one of the two lists,
    /// so `successful + failed` always equals the group count.
    pub fn from_outcomes(outcomes: &[OrderOutcome]) -> Self {
        let mut result = CheckoutResult {
            successful_order_ids: Vec::new(),
            failed_orders: Vec::new(),
        };

        for outcome in outcomes {
            match outcome.order_id() {
                Some(order_id) => result.successful_order_ids.push(order_id),
                None => result.failed_orders.push(FailedOrder {
                    restaurant_name: outcome.restaurant_name.clone(),
                    error: outcome.error().unwrap_or_default().to_string(),
                }),
            }
        }

        result
    }

    /// Returns the number of groups that produced an order.
    pub fn total_successful(&self) -> usize {
        self.successful_order_ids.len()
    }

    /// Returns the number of groups that failed.
    pub fn total_failed(&self) -> usize {
        self.failed_orders.len()
    }

    /// Returns the number of groups this checkout dispatched.
    pub fn group_count(&self) -> usize {
        self.total_successful() + self.total_failed()
    }

    /// Returns true if at least one order was created.
    pub fn any_success(&self) -> bool {
        !self.successful_order_ids.is_empty()
    }

    /// Classifies this result.
    pub fn classification(&self) -> Classification {
        if !self.any_success() {
            Classification::TotalFailure
        } else if self.failed_orders.is_empty() {
            Classification::TotalSuccess
        } else {
            Classification::PartialSuccess
        }
    }
}
