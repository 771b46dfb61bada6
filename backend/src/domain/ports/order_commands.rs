//! Driving ports for order mutations.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Error, Requester, ports::OrderView};

/// Request payload for [`OrderCommands::place_order`].
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceOrderRequest {
    /// Authenticated caller.
    pub requester: Requester,
    /// Cart lines selected for this order; must be non-empty.
    pub cart_item_ids: Vec<Uuid>,
    /// Shipping address overriding the directory default, when provided.
    pub address_override: Option<String>,
}

/// Request payload for [`OrderCommands::cancel_order`].
#[derive(Debug, Clone, PartialEq)]
pub struct CancelOrderRequest {
    /// Authenticated caller.
    pub requester: Requester,
    /// Order to cancel.
    pub order_id: Uuid,
}

/// Request payload for [`OrderCommands::update_order_status`].
///
/// The status arrives as the raw wire value; the workflow validates it so
/// malformed statuses surface as workflow errors, not transport errors.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateOrderStatusRequest {
    /// Authenticated caller.
    pub requester: Requester,
    /// Order to transition.
    pub order_id: Uuid,
    /// Raw requested status value.
    pub status: String,
}

/// Request payload for [`OrderCommands::update_item_status`].
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateOrderItemStatusRequest {
    /// Authenticated caller.
    pub requester: Requester,
    /// Order item to transition.
    pub order_item_id: Uuid,
    /// Raw requested status value.
    pub status: String,
}

/// Port for the order mutation workflows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderCommands: Send + Sync {
    /// Convert selected cart lines into a confirmed order.
    async fn place_order(&self, request: PlaceOrderRequest) -> Result<OrderView, Error>;

    /// Cancel a whole order, restoring catalog stock first.
    async fn cancel_order(&self, request: CancelOrderRequest) -> Result<(), Error>;

    /// Transition a whole order to a new status.
    async fn update_order_status(
        &self,
        request: UpdateOrderStatusRequest,
    ) -> Result<OrderView, Error>;

    /// Transition a single order item, cascading the order when every item
    /// ends up canceled.
    async fn update_item_status(
        &self,
        request: UpdateOrderItemStatusRequest,
    ) -> Result<OrderView, Error>;
}
