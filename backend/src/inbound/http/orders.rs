//! Order HTTP handlers.
//!
//! ```text
//! POST   /orders/create
//! GET    /orders
//! GET    /orders/{order_id}
//! PUT    /orders/{order_id}/status
//! DELETE /orders/{order_id}/cancel
//! PUT    /orders/items/{order_item_id}/status
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::Error;
use crate::domain::ports::{
    CancelOrderRequest, GetOrderRequest, ListOrdersRequest, OrderItemView, OrderView,
    PlaceOrderRequest, UpdateOrderItemStatusRequest, UpdateOrderStatusRequest,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::RequesterContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_uuid, parse_uuid_list};

/// Request payload for creating an order from selected cart lines.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequestBody {
    /// Cart line ids to convert into an order.
    #[schema(value_type = Vec<uuid::Uuid>)]
    pub cart_item_ids: Vec<String>,
    /// Shipping address overriding the profile default.
    pub address: Option<String>,
}

/// One order line in a response, with catalog display enrichment.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemResponseBody {
    #[schema(format = "uuid")]
    pub order_item_id: String,
    #[schema(format = "uuid")]
    pub product_id: String,
    pub quantity: u32,
    /// Unit price snapshot, as a decimal string.
    #[schema(example = "10.00")]
    pub unit_price: String,
    pub status: String,
    pub product_name: Option<String>,
    pub product_image_path: Option<String>,
    pub product_category: Option<String>,
}

/// Order representation returned by every order endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponseBody {
    #[schema(format = "uuid")]
    pub order_id: String,
    pub user_email: String,
    pub address: String,
    /// Stored order total, as a decimal string.
    #[schema(example = "25.00")]
    pub total_price: String,
    pub status: String,
    #[schema(format = "date-time")]
    pub ordered_at: String,
    pub items: Vec<OrderItemResponseBody>,
}

impl From<OrderItemView> for OrderItemResponseBody {
    fn from(value: OrderItemView) -> Self {
        Self {
            order_item_id: value.order_item_id.to_string(),
            product_id: value.product_id.to_string(),
            quantity: value.quantity,
            unit_price: value.unit_price.to_string(),
            status: value.status.to_string(),
            product_name: value.product_name,
            product_image_path: value.product_image_path,
            product_category: value.product_category,
        }
    }
}

impl From<OrderView> for OrderResponseBody {
    fn from(value: OrderView) -> Self {
        Self {
            order_id: value.order_id.to_string(),
            user_email: value.user_email,
            address: value.address,
            total_price: value.total_price.to_string(),
            status: value.status.to_string(),
            ordered_at: value.ordered_at.to_rfc3339(),
            items: value.items.into_iter().map(Into::into).collect(),
        }
    }
}

/// Owner filter for order listings.
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListOrdersQuery {
    /// Owner email; admins may omit it to list all orders.
    pub email: Option<String>,
}

/// Target status for status transition endpoints.
#[derive(Debug, Deserialize, IntoParams)]
pub struct StatusQuery {
    /// Raw status value (`PENDING`, `ORDERED`, `CANCELED`).
    pub status: String,
}

/// Route bundle mounted at `/orders`.
pub fn scope() -> actix_web::Scope {
    web::scope("/orders")
        .service(create_order)
        .service(list_orders)
        .service(update_item_status)
        .service(cancel_order)
        .service(update_order_status)
        .service(get_order)
}

/// Convert selected cart lines into an order for the authenticated user.
#[utoipa::path(
    post,
    path = "/orders/create",
    request_body = CreateOrderRequestBody,
    responses(
        (status = 201, description = "Order created", body = OrderResponseBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 404, description = "User or product not found", body = Error),
        (status = 503, description = "A collaborator service is unavailable", body = Error)
    ),
    tags = ["orders"],
    operation_id = "createOrder"
)]
#[post("/create")]
pub async fn create_order(
    state: web::Data<HttpState>,
    identity: RequesterContext,
    payload: web::Json<CreateOrderRequestBody>,
) -> ApiResult<HttpResponse> {
    let requester = identity.require()?;
    let body = payload.into_inner();
    let cart_item_ids = parse_uuid_list(body.cart_item_ids, FieldName::new("cartItemIds"))?;

    let view = state
        .order_commands
        .place_order(PlaceOrderRequest {
            requester,
            cart_item_ids,
            address_override: body.address,
        })
        .await?;

    Ok(HttpResponse::Created().json(OrderResponseBody::from(view)))
}

/// Fetch one order with its enriched items.
#[utoipa::path(
    get,
    path = "/orders/{order_id}",
    params(("order_id" = uuid::Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order found", body = OrderResponseBody),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 403, description = "Not the order owner", body = Error),
        (status = 404, description = "Order not found", body = Error)
    ),
    tags = ["orders"],
    operation_id = "getOrder"
)]
#[get("/{order_id}")]
pub async fn get_order(
    state: web::Data<HttpState>,
    identity: RequesterContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<OrderResponseBody>> {
    let requester = identity.require()?;
    let order_id = parse_uuid(path.as_str(), FieldName::new("orderId"))?;

    let view = state
        .order_queries
        .get_order(GetOrderRequest {
            requester,
            order_id,
        })
        .await?;

    Ok(web::Json(OrderResponseBody::from(view)))
}

/// List non-canceled orders visible to the requester.
#[utoipa::path(
    get,
    path = "/orders",
    params(ListOrdersQuery),
    responses(
        (status = 200, description = "Orders listed", body = [OrderResponseBody]),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 403, description = "Listing another user's orders", body = Error)
    ),
    tags = ["orders"],
    operation_id = "listOrders"
)]
#[get("")]
pub async fn list_orders(
    state: web::Data<HttpState>,
    identity: RequesterContext,
    query: web::Query<ListOrdersQuery>,
) -> ApiResult<web::Json<Vec<OrderResponseBody>>> {
    let requester = identity.require()?;

    let views = state
        .order_queries
        .list_orders(ListOrdersRequest {
            requester,
            owner_email: query.into_inner().email,
        })
        .await?;

    Ok(web::Json(views.into_iter().map(Into::into).collect()))
}

/// Transition a whole order to a new status.
#[utoipa::path(
    put,
    path = "/orders/{order_id}/status",
    params(
        ("order_id" = uuid::Uuid, Path, description = "Order id"),
        StatusQuery
    ),
    responses(
        (status = 200, description = "Order transitioned", body = OrderResponseBody),
        (status = 400, description = "Unknown status value", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 403, description = "Not the order owner", body = Error),
        (status = 404, description = "Order not found", body = Error),
        (status = 409, description = "Transition rejected", body = Error),
        (status = 503, description = "Stock restoration failed", body = Error)
    ),
    tags = ["orders"],
    operation_id = "updateOrderStatus"
)]
#[put("/{order_id}/status")]
pub async fn update_order_status(
    state: web::Data<HttpState>,
    identity: RequesterContext,
    path: web::Path<String>,
    query: web::Query<StatusQuery>,
) -> ApiResult<web::Json<OrderResponseBody>> {
    let requester = identity.require()?;
    let order_id = parse_uuid(path.as_str(), FieldName::new("orderId"))?;

    let view = state
        .order_commands
        .update_order_status(UpdateOrderStatusRequest {
            requester,
            order_id,
            status: query.into_inner().status,
        })
        .await?;

    Ok(web::Json(OrderResponseBody::from(view)))
}

/// Cancel a whole order, restoring catalog stock first.
#[utoipa::path(
    delete,
    path = "/orders/{order_id}/cancel",
    params(("order_id" = uuid::Uuid, Path, description = "Order id")),
    responses(
        (status = 204, description = "Order canceled"),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 403, description = "Not the order owner", body = Error),
        (status = 404, description = "Order not found", body = Error),
        (status = 409, description = "Order already canceled", body = Error),
        (status = 503, description = "Stock restoration failed", body = Error)
    ),
    tags = ["orders"],
    operation_id = "cancelOrder"
)]
#[delete("/{order_id}/cancel")]
pub async fn cancel_order(
    state: web::Data<HttpState>,
    identity: RequesterContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let requester = identity.require()?;
    let order_id = parse_uuid(path.as_str(), FieldName::new("orderId"))?;

    state
        .order_commands
        .cancel_order(CancelOrderRequest {
            requester,
            order_id,
        })
        .await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Transition a single order item, cascading to the order when every item
/// ends up canceled.
#[utoipa::path(
    put,
    path = "/orders/items/{order_item_id}/status",
    params(
        ("order_item_id" = uuid::Uuid, Path, description = "Order item id"),
        StatusQuery
    ),
    responses(
        (status = 200, description = "Item transitioned; refreshed order returned", body = OrderResponseBody),
        (status = 400, description = "Unknown status value", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 403, description = "Not the order owner", body = Error),
        (status = 404, description = "Order item not found", body = Error),
        (status = 409, description = "Transition rejected", body = Error),
        (status = 503, description = "Stock restoration failed", body = Error)
    ),
    tags = ["orders"],
    operation_id = "updateOrderItemStatus"
)]
#[put("/items/{order_item_id}/status")]
pub async fn update_item_status(
    state: web::Data<HttpState>,
    identity: RequesterContext,
    path: web::Path<String>,
    query: web::Query<StatusQuery>,
) -> ApiResult<web::Json<OrderResponseBody>> {
    let requester = identity.require()?;
    let order_item_id = parse_uuid(path.as_str(), FieldName::new("orderItemId"))?;

    let view = state
        .order_commands
        .update_item_status(UpdateOrderItemStatusRequest {
            requester,
            order_item_id,
            status: query.into_inner().status,
        })
        .await?;

    Ok(web::Json(OrderResponseBody::from(view)))
}

#[cfg(test)]
#[path = "orders_tests.rs"]
mod tests;
