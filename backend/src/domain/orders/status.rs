//! Order and order item status state machine.
//!
//! Statuses move `Pending -> Ordered -> Canceled`, with `Pending -> Canceled`
//! allowed for orders abandoned before confirmation. `Canceled` is absorbing:
//! no transition leaves it, so a second cancellation is always rejected and
//! stock can never be restored twice.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Lifecycle status shared by orders and their items.
///
/// Stored and transported as the upper-case name (`PENDING`, `ORDERED`,
/// `CANCELED`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Awaiting confirmation of downstream effects (stock decrement).
    Pending,
    /// Confirmed; terminal success.
    Ordered,
    /// Terminal; absorbing.
    Canceled,
}

/// Rejected status transitions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StatusTransitionError {
    /// The target status equals the current status.
    #[error("status is already {status}")]
    NoOp {
        /// Current (and requested) status.
        status: OrderStatus,
    },
    /// The state machine forbids this edge.
    #[error("cannot transition from {from} to {to}")]
    Invalid {
        /// Current status.
        from: OrderStatus,
        /// Requested status.
        to: OrderStatus,
    },
}

impl OrderStatus {
    /// Validate a transition from `self` to `next`.
    ///
    /// Returns the new status on success so call sites mutate state only
    /// through this function.
    ///
    /// # Examples
    /// ```
    /// use ordering_backend::domain::OrderStatus;
    ///
    /// let confirmed = OrderStatus::Pending.transition(OrderStatus::Ordered);
    /// assert_eq!(confirmed, Ok(OrderStatus::Ordered));
    /// assert!(OrderStatus::Canceled.transition(OrderStatus::Ordered).is_err());
    /// ```
    pub fn transition(self, next: Self) -> Result<Self, StatusTransitionError> {
        if self == next {
            return Err(StatusTransitionError::NoOp { status: self });
        }
        match (self, next) {
            (Self::Pending, Self::Ordered)
            | (Self::Pending, Self::Canceled)
            | (Self::Ordered, Self::Canceled) => Ok(next),
            (from, to) => Err(StatusTransitionError::Invalid { from, to }),
        }
    }

    /// Whether no further transition can leave this status.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        self == Self::Canceled
    }

    /// Upper-case name used in storage and on the wire.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Ordered => "ORDERED",
            Self::Canceled => "CANCELED",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error raised when a raw status value is not a known status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown order status: {value}")]
pub struct ParseOrderStatusError {
    /// The rejected raw value.
    pub value: String,
}

impl FromStr for OrderStatus {
    type Err = ParseOrderStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "PENDING" => Ok(Self::Pending),
            "ORDERED" => Ok(Self::Ordered),
            "CANCELED" => Ok(Self::Canceled),
            other => Err(ParseOrderStatusError {
                value: other.to_owned(),
            }),
        }
    }
}
