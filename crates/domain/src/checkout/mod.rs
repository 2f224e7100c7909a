//! Checkout session state machine.

mod session;
mod step;

pub use session::{CheckoutSession, PaymentMethod};
pub use step::CheckoutStep;

use thiserror::Error;

/// Errors that can occur while driving a checkout session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The requested action is not valid from the current step.
    #[error("Invalid transition: cannot {action} from {current_step} step")]
    InvalidTransition {
        current_step: CheckoutStep,
        action: &'static str,
    },

    /// The cart is empty.
    #[error("Cart is empty")]
    EmptyCart,

    /// No phone number was entered.
    #[error("A phone number is required")]
    MissingPhone,

    /// No delivery address was selected or entered.
    #[error("A delivery address is required")]
    MissingDeliveryTarget,

    /// No payment method was selected.
    #[error("A payment method is required")]
    MissingPaymentMethod,
}
