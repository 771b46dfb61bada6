//! Driving ports for order reads.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Error, Requester, ports::OrderView};

/// Request payload for [`OrderQueries::get_order`].
#[derive(Debug, Clone, PartialEq)]
pub struct GetOrderRequest {
    /// Authenticated caller.
    pub requester: Requester,
    /// Order to fetch.
    pub order_id: Uuid,
}

/// Request payload for [`OrderQueries::list_orders`].
#[derive(Debug, Clone, PartialEq)]
pub struct ListOrdersRequest {
    /// Authenticated caller.
    pub requester: Requester,
    /// Owner email filter. Admins may omit it to list every order;
    /// non-admins default to their own email.
    pub owner_email: Option<String>,
}

/// Port for the order read workflows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderQueries: Send + Sync {
    /// Fetch one order with catalog display enrichment.
    async fn get_order(&self, request: GetOrderRequest) -> Result<OrderView, Error>;

    /// List non-canceled orders visible to the requester.
    async fn list_orders(&self, request: ListOrdersRequest) -> Result<Vec<OrderView>, Error>;
}
