//! Checkout wizard steps.

use serde::{Deserialize, Serialize};

/// A step in the checkout wizard.
///
/// Step transitions:
/// ```text
/// Cart ──► Details ──► Payment ──► Placing ──┬──► Confirmation
///   ▲─────────┘  ▲────────┘          │       │
///                └───────────────────┘ (total failure)
/// ```
///
/// `Placing` is transient and non-interactive: it is entered from `Payment`
/// when the customer submits, and left automatically once every
/// per-restaurant order request has settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CheckoutStep {
    /// Reviewing cart contents.
    #[default]
    Cart,

    /// Entering contact details and the delivery address.
    Details,

    /// Choosing the payment method.
    Payment,

    /// Awaiting the order dispatch barrier. Not interruptible.
    Placing,

    /// Checkout settled with at least one created order (terminal step).
    Confirmation,
}

impl CheckoutStep {
    /// Returns the step a backward navigation lands on, if any.
    ///
    /// `Placing` has no backward target: once dispatch starts it cannot be
    /// abandoned.
    pub fn back_target(&self) -> Option<CheckoutStep> {
        match self {
            CheckoutStep::Details => Some(CheckoutStep::Cart),
            CheckoutStep::Payment => Some(CheckoutStep::Details),
            CheckoutStep::Cart | CheckoutStep::Placing | CheckoutStep::Confirmation => None,
        }
    }

    /// Returns true if the customer can interact with this step.
    pub fn is_interactive(&self) -> bool {
        !matches!(self, CheckoutStep::Placing)
    }

    /// Returns true if this is the terminal step.
    pub fn is_terminal(&self) -> bool {
        matches!(self, CheckoutStep::Confirmation)
    }

    /// Returns the step name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutStep::Cart => "Cart",
            CheckoutStep::Details => "Details",
            CheckoutStep::Payment => "Payment",
            CheckoutStep::Placing => "Placing",
            CheckoutStep::Confirmation => "Confirmation",
        }
    }
}

impl std::fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
