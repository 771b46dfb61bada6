//! Port for order and order item persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Order, OrderItem, OrderStatus};

/// Errors raised by order repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderRepositoryError {
    /// Repository connection could not be established.
    #[error("order repository connection failed: {message}")]
    Connection {
        /// Adapter-provided failure description.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("order repository query failed: {message}")]
    Query {
        /// Adapter-provided failure description.
        message: String,
    },
}

impl OrderRepositoryError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Port for durable order storage.
///
/// `create` persists the order and all of its items as one atomic unit;
/// the status setters persist the order row and its item rows together.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persist a new order and its items atomically.
    async fn create(&self, order: &Order) -> Result<(), OrderRepositoryError>;

    /// Load an order with its items.
    async fn find_by_id(&self, order_id: Uuid) -> Result<Option<Order>, OrderRepositoryError>;

    /// Load a single order item.
    async fn find_item(
        &self,
        order_item_id: Uuid,
    ) -> Result<Option<OrderItem>, OrderRepositoryError>;

    /// Load all orders owned by the given email, newest first.
    async fn list_by_email(&self, email: &str) -> Result<Vec<Order>, OrderRepositoryError>;

    /// Load every order, newest first.
    async fn list_all(&self) -> Result<Vec<Order>, OrderRepositoryError>;

    /// Persist `status` on the order row and every one of its item rows.
    async fn set_order_and_item_statuses(
        &self,
        order_id: Uuid,
        status: OrderStatus,
    ) -> Result<(), OrderRepositoryError>;

    /// Persist `status` on a single item row.
    async fn set_item_status(
        &self,
        order_item_id: Uuid,
        status: OrderStatus,
    ) -> Result<(), OrderRepositoryError>;

    /// Re-read the item rows of an order.
    async fn items_for_order(
        &self,
        order_id: Uuid,
    ) -> Result<Vec<OrderItem>, OrderRepositoryError>;
}

/// Fixture implementation for wiring that does not exercise persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureOrderRepository;

#[async_trait]
impl OrderRepository for FixtureOrderRepository {
    async fn create(&self, _order: &Order) -> Result<(), OrderRepositoryError> {
        Ok(())
    }

    async fn find_by_id(&self, _order_id: Uuid) -> Result<Option<Order>, OrderRepositoryError> {
        Ok(None)
    }

    async fn find_item(
        &self,
        _order_item_id: Uuid,
    ) -> Result<Option<OrderItem>, OrderRepositoryError> {
        Ok(None)
    }

    async fn list_by_email(&self, _email: &str) -> Result<Vec<Order>, OrderRepositoryError> {
        Ok(Vec::new())
    }

    async fn list_all(&self) -> Result<Vec<Order>, OrderRepositoryError> {
        Ok(Vec::new())
    }

    async fn set_order_and_item_statuses(
        &self,
        _order_id: Uuid,
        _status: OrderStatus,
    ) -> Result<(), OrderRepositoryError> {
        Ok(())
    }

    async fn set_item_status(
        &self,
        _order_item_id: Uuid,
        _status: OrderStatus,
    ) -> Result<(), OrderRepositoryError> {
        Ok(())
    }

    async fn items_for_order(
        &self,
        _order_id: Uuid,
    ) -> Result<Vec<OrderItem>, OrderRepositoryError> {
        Ok(Vec::new())
    }
}
