//! Checkout session with guarded step transitions.

use common::{AddressId, CustomerId};
use serde::{Deserialize, Serialize};

use crate::cart::CartLineItem;

use super::{CheckoutStep, SessionError};

/// How the customer pays. Cash on delivery is the only supported method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash on delivery.
    Cash,
}

impl PaymentMethod {
    /// Returns the method name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The ephemeral state of one customer's trip through the checkout wizard.
///
/// Created when checkout begins, mutated only through the guarded
/// transition methods, and discarded after Confirmation or abandonment.
/// Illegal jumps (entering Payment without a delivery target, leaving
/// Placing early) are rejected with a [`SessionError`] rather than being
/// representable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    customer_id: CustomerId,
    step: CheckoutStep,
    selected_address: Option<AddressId>,
    new_address_line: Option<String>,
    phone: Option<String>,
    payment_method: Option<PaymentMethod>,
    /// Immutable copy of the cart taken when Placing begins, for display
    /// on the Confirmation step after the live cart has been cleaned up.
    cart_snapshot: Vec<CartLineItem>,
}

impl CheckoutSession {
    /// Starts a new checkout session at the Cart step.
    pub fn new(customer_id: CustomerId) -> Self {
        Self {
            customer_id,
            step: CheckoutStep::Cart,
            selected_address: None,
            new_address_line: None,
            phone: None,
            payment_method: None,
            cart_snapshot: Vec::new(),
        }
    }

    /// Returns the customer this session belongs to.
    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    /// Returns the current step.
    pub fn step(&self) -> CheckoutStep {
        self.step
    }

    /// Returns the selected saved address, if any.
    pub fn selected_address(&self) -> Option<AddressId> {
        self.selected_address
    }

    /// Returns the newly entered address line, if any.
    pub fn new_address_line(&self) -> Option<&str> {
        self.new_address_line.as_deref()
    }

    /// Returns the entered phone number, if any.
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    /// Returns the selected payment method, if any.
    pub fn payment_method(&self) -> Option<PaymentMethod> {
        self.payment_method
    }

    /// Returns the cart snapshot taken when Placing began.
    pub fn cart_snapshot(&self) -> &[CartLineItem] {
        &self.cart_snapshot
    }

    /// Returns true if a delivery target is available: a saved address is
    /// selected or a non-empty address line has been entered.
    pub fn has_delivery_target(&self) -> bool {
        self.selected_address.is_some()
            || self
                .new_address_line
                .as_deref()
                .is_some_and(|line| !line.trim().is_empty())
    }

    fn ensure_interactive(&self, action: &'static str) -> Result<(), SessionError> {
        if self.step.is_interactive() && !self.step.is_terminal() {
            Ok(())
        } else {
            Err(SessionError::InvalidTransition {
                current_step: self.step,
                action,
            })
        }
    }

    /// Records the contact phone number.
    pub fn set_phone(&mut self, phone: impl Into<String>) -> Result<(), SessionError> {
        self.ensure_interactive("set phone")?;
        self.phone = Some(phone.into());
        Ok(())
    }

    /// Selects a saved delivery address.
    pub fn select_address(&mut self, address_id: AddressId) -> Result<(), SessionError> {
        self.ensure_interactive("select address")?;
        self.selected_address = Some(address_id);
        Ok(())
    }

    /// Records a newly entered address line.
    pub fn enter_address_line(&mut self, line: impl Into<String>) -> Result<(), SessionError> {
        self.ensure_interactive("enter address")?;
        self.new_address_line = Some(line.into());
        Ok(())
    }

    /// Selects the payment method.
    pub fn select_payment_method(&mut self, method: PaymentMethod) -> Result<(), SessionError> {
        self.ensure_interactive("select payment method")?;
        self.payment_method = Some(method);
        Ok(())
    }

    /// Cart → Details. Requires a non-empty cart.
    pub fn proceed_to_details(&mut self, cart_item_count: usize) -> Result<(), SessionError> {
        if self.step != CheckoutStep::Cart {
            return Err(SessionError::InvalidTransition {
                current_step: self.step,
                action: "proceed to details",
            });
        }
        if cart_item_count == 0 {
            return Err(SessionError::EmptyCart);
        }
        self.step = CheckoutStep::Details;
        Ok(())
    }

    /// Details → Payment. Requires a phone number and a delivery target.
    pub fn proceed_to_payment(&mut self) -> Result<(), SessionError> {
        if self.step != CheckoutStep::Details {
            return Err(SessionError::InvalidTransition {
                current_step: self.step,
                action: "proceed to payment",
            });
        }
        if self.phone.as_deref().is_none_or(|p| p.trim().is_empty()) {
            return Err(SessionError::MissingPhone);
        }
        if !self.has_delivery_target() {
            return Err(SessionError::MissingDeliveryTarget);
        }
        self.step = CheckoutStep::Payment;
        Ok(())
    }

    /// Payment → Placing. Requires a payment method; captures the cart
    /// snapshot shown on Confirmation.
    pub fn begin_placing(&mut self, snapshot: Vec<CartLineItem>) -> Result<(), SessionError> {
        if self.step != CheckoutStep::Payment {
            return Err(SessionError::InvalidTransition {
                current_step: self.step,
                action: "begin placing",
            });
        }
        if self.payment_method.is_none() {
            return Err(SessionError::MissingPaymentMethod);
        }
        if snapshot.is_empty() {
            return Err(SessionError::EmptyCart);
        }
        self.cart_snapshot = snapshot;
        self.step = CheckoutStep::Placing;
        Ok(())
    }

    /// Placing → Confirmation, once dispatch settled with at least one
    /// created order.
    pub fn confirm(&mut self) -> Result<(), SessionError> {
        if self.step != CheckoutStep::Placing {
            return Err(SessionError::InvalidTransition {
                current_step: self.step,
                action: "confirm",
            });
        }
        self.step = CheckoutStep::Confirmation;
        Ok(())
    }

    /// Placing → Payment, once dispatch settled with no created order.
    /// The snapshot is dropped: the live cart still holds every item.
    pub fn return_to_payment(&mut self) -> Result<(), SessionError> {
        if self.step != CheckoutStep::Placing {
            return Err(SessionError::InvalidTransition {
                current_step: self.step,
                action: "return to payment",
            });
        }
        self.cart_snapshot.clear();
        self.step = CheckoutStep::Payment;
        Ok(())
    }

    /// Navigates one step backward where permitted.
    pub fn back(&mut self) -> Result<(), SessionError> {
        match self.step.back_target() {
            Some(target) => {
                self.step = target;
                Ok(())
            }
            None => Err(SessionError::InvalidTransition {
                current_step: self.step,
                action: "go back",
            }),
        }
    }
}
