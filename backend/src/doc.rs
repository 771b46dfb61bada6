//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct generating the OpenAPI specification for the
//! REST API: every order endpoint, the health probes, and the shared error
//! schema. The generated specification backs Swagger UI in debug builds.

use utoipa::OpenApi;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Ordering backend API",
        description = "Order creation, cancellation, and queries for the storefront."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::orders::create_order,
        crate::inbound::http::orders::get_order,
        crate::inbound::http::orders::list_orders,
        crate::inbound::http::orders::update_order_status,
        crate::inbound::http::orders::cancel_order,
        crate::inbound::http::orders::update_item_status,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        crate::domain::Error,
        crate::domain::ErrorCode,
        crate::domain::OrderStatus,
        crate::inbound::http::orders::CreateOrderRequestBody,
        crate::inbound::http::orders::OrderResponseBody,
        crate::inbound::http::orders::OrderItemResponseBody,
    )),
    tags(
        (name = "orders", description = "Order workflows"),
        (name = "health", description = "Orchestration probes")
    )
)]
pub struct ApiDoc;
