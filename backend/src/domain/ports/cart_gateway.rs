//! Port for the cart collaborator: pre-order staging area per user.

use async_trait::async_trait;
use uuid::Uuid;

/// One staged line in a user's cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartLine {
    /// Cart line id, referenced by order creation requests.
    pub cart_item_id: Uuid,
    /// Catalog product staged in this line.
    pub product_id: Uuid,
    /// Staged quantity.
    pub quantity: u32,
}

/// Errors raised by cart gateway adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CartGatewayError {
    /// The cart service could not be reached (including timeouts).
    #[error("cart service unreachable: {message}")]
    Unreachable {
        /// Adapter-provided failure description.
        message: String,
    },
    /// The cart service answered but the exchange failed.
    #[error("cart service protocol error: {message}")]
    Protocol {
        /// Adapter-provided failure description.
        message: String,
    },
}

impl CartGatewayError {
    /// Create an unreachable error with the given message.
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self::Unreachable {
            message: message.into(),
        }
    }

    /// Create a protocol error with the given message.
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }
}

/// Port for reading and pruning a user's cart.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CartGateway: Send + Sync {
    /// Fetch every line currently staged in the user's cart.
    async fn fetch_cart(&self, user_email: &str) -> Result<Vec<CartLine>, CartGatewayError>;

    /// Remove the given lines from the user's cart.
    async fn remove_items(
        &self,
        user_email: &str,
        cart_item_ids: &[Uuid],
    ) -> Result<(), CartGatewayError>;
}

/// Fixture implementation for wiring that does not exercise the cart.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCartGateway;

#[async_trait]
impl CartGateway for FixtureCartGateway {
    async fn fetch_cart(&self, _user_email: &str) -> Result<Vec<CartLine>, CartGatewayError> {
        Ok(Vec::new())
    }

    async fn remove_items(
        &self,
        _user_email: &str,
        _cart_item_ids: &[Uuid],
    ) -> Result<(), CartGatewayError> {
        Ok(())
    }
}
