//! Order workflow services.
//!
//! Implements the driving ports: order creation (price snapshot, atomic
//! persistence, best-effort cart cleanup, stock confirmation), whole-order
//! and per-item cancellation with stock restoration, and enriched reads.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::ports::{
    CancelOrderRequest, CartGateway, CartGatewayError, CartLine, CatalogProduct, GetOrderRequest,
    ListOrdersRequest, OrderCommands, OrderQueries, OrderRepository, OrderRepositoryError,
    OrderView, PlaceOrderRequest, ProductCatalog, ProductCatalogError,
    UpdateOrderItemStatusRequest, UpdateOrderStatusRequest, UserDirectory, UserDirectoryError,
};
use crate::domain::{
    Error, Order, OrderDraft, OrderItem, OrderItemDraft, OrderStatus, ParseOrderStatusError,
    Requester, StatusTransitionError,
};

fn map_repository_error(error: OrderRepositoryError) -> Error {
    match error {
        OrderRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("order repository unavailable: {message}"))
        }
        OrderRepositoryError::Query { message } => {
            Error::internal(format!("order repository error: {message}"))
        }
    }
}

fn map_directory_error(error: UserDirectoryError) -> Error {
    Error::service_unavailable(format!("user directory unavailable: {error}"))
}

fn map_cart_error(error: CartGatewayError) -> Error {
    Error::service_unavailable(format!("cart service unavailable: {error}"))
}

fn map_catalog_error(error: ProductCatalogError) -> Error {
    Error::service_unavailable(format!("product catalog unavailable: {error}"))
}

fn map_transition_error(error: StatusTransitionError) -> Error {
    Error::conflict(error.to_string())
}

fn map_status_parse_error(error: ParseOrderStatusError) -> Error {
    Error::invalid_request(format!("unknown order status: {}", error.value))
        .with_details(json!({ "field": "status", "value": error.value }))
}

fn authorize(requester: &Requester, order: &Order) -> Result<(), Error> {
    if requester.is_admin() || requester.owns(order.user_email()) {
        Ok(())
    } else {
        Err(Error::forbidden("only the order owner may access this order"))
    }
}

fn distinct_product_ids<'a>(orders: impl Iterator<Item = &'a Order>) -> Vec<Uuid> {
    let mut ids: Vec<Uuid> = orders
        .flat_map(|order| order.items().iter().map(OrderItem::product_id))
        .collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// Order workflow service implementing the command and query driving ports.
#[derive(Clone)]
pub struct OrderWorkflowService<R, C, P, U> {
    orders: Arc<R>,
    cart: Arc<C>,
    catalog: Arc<P>,
    directory: Arc<U>,
}

impl<R, C, P, U> OrderWorkflowService<R, C, P, U> {
    /// Create a workflow service over the given collaborator ports.
    pub fn new(orders: Arc<R>, cart: Arc<C>, catalog: Arc<P>, directory: Arc<U>) -> Self {
        Self {
            orders,
            cart,
            catalog,
            directory,
        }
    }
}

impl<R, C, P, U> OrderWorkflowService<R, C, P, U>
where
    R: OrderRepository,
    C: CartGateway,
    P: ProductCatalog,
    U: UserDirectory,
{
    async fn require_order(&self, order_id: Uuid) -> Result<Order, Error> {
        self.orders
            .find_by_id(order_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("order {order_id} not found")))
    }

    /// Batch catalog lookup for display enrichment. Ids the catalog does not
    /// know are simply absent from the map.
    async fn display_products(
        &self,
        product_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, CatalogProduct>, Error> {
        if product_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let products = self
            .catalog
            .products_by_ids(product_ids)
            .await
            .map_err(map_catalog_error)?;
        Ok(products.into_iter().map(|p| (p.id, p)).collect())
    }

    /// Batch catalog lookup for pricing. Every requested id must resolve;
    /// a missing product aborts the whole operation.
    async fn priced_products(
        &self,
        product_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, CatalogProduct>, Error> {
        let products = self.display_products(product_ids).await?;
        for product_id in product_ids {
            if !products.contains_key(product_id) {
                return Err(Error::not_found(format!("product {product_id} not found")));
            }
        }
        Ok(products)
    }

    async fn view_of(&self, order: &Order) -> Result<OrderView, Error> {
        let product_ids = distinct_product_ids(std::iter::once(order));
        let products = self.display_products(&product_ids).await?;
        Ok(OrderView::project(order, &products))
    }

    /// Shared cancellation path: stock restoration first, statuses only once
    /// every restoration succeeded, so a failed attempt is safely retryable.
    async fn cancel_order_inner(
        &self,
        requester: &Requester,
        order_id: Uuid,
    ) -> Result<Order, Error> {
        let mut order = self.require_order(order_id).await?;
        authorize(requester, &order)?;

        if order.status() == OrderStatus::Canceled {
            return Err(Error::conflict(format!(
                "order {order_id} is already canceled"
            )));
        }

        // Items canceled individually have already had their stock restored.
        let mut quantities: HashMap<Uuid, u32> = HashMap::new();
        for item in order.items() {
            if !item.status().is_terminal() {
                *quantities.entry(item.product_id()).or_insert(0) += item.quantity();
            }
        }

        self.catalog
            .restore_stock(&quantities)
            .await
            .map_err(|error| {
                Error::service_unavailable(format!(
                    "stock restore failed for order {order_id}: {error}"
                ))
            })?;

        order.cancel().map_err(map_transition_error)?;
        self.orders
            .set_order_and_item_statuses(order.id(), OrderStatus::Canceled)
            .await
            .map_err(map_repository_error)?;

        info!(order_id = %order.id(), "order canceled");
        Ok(order)
    }
}

#[async_trait]
impl<R, C, P, U> OrderCommands for OrderWorkflowService<R, C, P, U>
where
    R: OrderRepository,
    C: CartGateway,
    P: ProductCatalog,
    U: UserDirectory,
{
    async fn place_order(&self, request: PlaceOrderRequest) -> Result<OrderView, Error> {
        let PlaceOrderRequest {
            requester,
            cart_item_ids,
            address_override,
        } = request;

        if cart_item_ids.is_empty() {
            return Err(Error::invalid_request("no cart items selected"));
        }

        let profile = self
            .directory
            .find_by_email(&requester.email)
            .await
            .map_err(map_directory_error)?
            .ok_or_else(|| Error::not_found(format!("user {} not found", requester.email)))?;

        let address = address_override
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .unwrap_or(profile.address);

        let cart_lines = self
            .cart
            .fetch_cart(&requester.email)
            .await
            .map_err(map_cart_error)?;

        let selected: Vec<CartLine> = cart_lines
            .into_iter()
            .filter(|line| cart_item_ids.contains(&line.cart_item_id))
            .collect();
        if selected.is_empty() {
            return Err(
                Error::invalid_request("selected cart items are not in the cart")
                    .with_details(json!({ "field": "cartItemIds" })),
            );
        }

        let mut product_ids: Vec<Uuid> = selected.iter().map(|line| line.product_id).collect();
        product_ids.sort_unstable();
        product_ids.dedup();
        let products = self.priced_products(&product_ids).await?;

        // Unit prices are snapshots: captured here and never re-read, so
        // later catalog price changes cannot alter a placed order's total.
        let mut item_drafts = Vec::with_capacity(selected.len());
        for line in &selected {
            let product = products
                .get(&line.product_id)
                .ok_or_else(|| Error::not_found(format!("product {} not found", line.product_id)))?;
            item_drafts.push(OrderItemDraft {
                product_id: line.product_id,
                quantity: line.quantity,
                unit_price: product.price,
            });
        }

        let mut order = Order::new(OrderDraft {
            user_email: requester.email.clone(),
            address,
            ordered_at: Utc::now(),
            items: item_drafts,
        })
        .map_err(|error| Error::invalid_request(error.to_string()))?;

        self.orders
            .create(&order)
            .await
            .map_err(map_repository_error)?;

        // Best effort by design: the order is already committed, so a cart
        // cleanup failure leaves a divergence window instead of rolling back.
        let consumed: Vec<Uuid> = selected.iter().map(|line| line.cart_item_id).collect();
        if let Err(error) = self.cart.remove_items(&requester.email, &consumed).await {
            warn!(
                order_id = %order.id(),
                user_email = %requester.email,
                error = %error,
                "cart cleanup failed after order commit"
            );
        }

        for line in &selected {
            self.catalog
                .decrement_stock(line.product_id, line.quantity)
                .await
                .map_err(|error| {
                    // The order row stays Pending; recovery is manual.
                    Error::service_unavailable(format!(
                        "stock decrement failed for product {}: {error}",
                        line.product_id
                    ))
                })?;
        }

        order.confirm().map_err(map_transition_error)?;
        self.orders
            .set_order_and_item_statuses(order.id(), OrderStatus::Ordered)
            .await
            .map_err(map_repository_error)?;

        info!(
            order_id = %order.id(),
            user_email = %requester.email,
            total_price = %order.total_price(),
            "order placed"
        );
        Ok(OrderView::project(&order, &products))
    }

    async fn cancel_order(&self, request: CancelOrderRequest) -> Result<(), Error> {
        self.cancel_order_inner(&request.requester, request.order_id)
            .await
            .map(|_| ())
    }

    async fn update_order_status(
        &self,
        request: UpdateOrderStatusRequest,
    ) -> Result<OrderView, Error> {
        let UpdateOrderStatusRequest {
            requester,
            order_id,
            status,
        } = request;
        let status: OrderStatus = status.parse().map_err(map_status_parse_error)?;

        // Cancellation always goes through the restore-then-mark path.
        if status == OrderStatus::Canceled {
            let order = self.cancel_order_inner(&requester, order_id).await?;
            return self.view_of(&order).await;
        }

        let mut order = self.require_order(order_id).await?;
        authorize(&requester, &order)?;

        // The only non-cancel edge is Pending -> Ordered; validate it and
        // confirm the order together with its items.
        order.status().transition(status).map_err(map_transition_error)?;
        order.confirm().map_err(map_transition_error)?;
        self.orders
            .set_order_and_item_statuses(order.id(), status)
            .await
            .map_err(map_repository_error)?;

        self.view_of(&order).await
    }

    async fn update_item_status(
        &self,
        request: UpdateOrderItemStatusRequest,
    ) -> Result<OrderView, Error> {
        let UpdateOrderItemStatusRequest {
            requester,
            order_item_id,
            status,
        } = request;
        let status: OrderStatus = status.parse().map_err(map_status_parse_error)?;

        let item = self
            .orders
            .find_item(order_item_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("order item {order_item_id} not found")))?;

        let order = self.require_order(item.order_id()).await?;
        authorize(&requester, &order)?;

        let next = item.status().transition(status).map_err(map_transition_error)?;

        if next == OrderStatus::Canceled {
            let quantities = HashMap::from([(item.product_id(), item.quantity())]);
            self.catalog
                .restore_stock(&quantities)
                .await
                .map_err(|error| {
                    Error::service_unavailable(format!(
                        "stock restore failed for order item {order_item_id}: {error}"
                    ))
                })?;
        }

        self.orders
            .set_item_status(item.id(), next)
            .await
            .map_err(map_repository_error)?;

        // Cascade: re-read the siblings and cancel the order once every
        // item has ended up canceled.
        let siblings = self
            .orders
            .items_for_order(order.id())
            .await
            .map_err(map_repository_error)?;
        let all_canceled = siblings
            .iter()
            .all(|sibling| sibling.status() == OrderStatus::Canceled);
        if all_canceled && order.status() != OrderStatus::Canceled {
            self.orders
                .set_order_and_item_statuses(order.id(), OrderStatus::Canceled)
                .await
                .map_err(map_repository_error)?;
            info!(order_id = %order.id(), "order canceled by item cascade");
        }

        let refreshed = self.require_order(order.id()).await?;
        self.view_of(&refreshed).await
    }
}

#[async_trait]
impl<R, C, P, U> OrderQueries for OrderWorkflowService<R, C, P, U>
where
    R: OrderRepository,
    C: CartGateway,
    P: ProductCatalog,
    U: UserDirectory,
{
    async fn get_order(&self, request: GetOrderRequest) -> Result<OrderView, Error> {
        let order = self.require_order(request.order_id).await?;
        authorize(&request.requester, &order)?;
        self.view_of(&order).await
    }

    async fn list_orders(&self, request: ListOrdersRequest) -> Result<Vec<OrderView>, Error> {
        let ListOrdersRequest {
            requester,
            owner_email,
        } = request;

        let orders = match owner_email {
            Some(email) => {
                if !requester.is_admin() && !requester.owns(&email) {
                    return Err(Error::forbidden(
                        "only administrators may list other users' orders",
                    ));
                }
                self.orders
                    .list_by_email(&email)
                    .await
                    .map_err(map_repository_error)?
            }
            None if requester.is_admin() => {
                self.orders.list_all().await.map_err(map_repository_error)?
            }
            None => self
                .orders
                .list_by_email(&requester.email)
                .await
                .map_err(map_repository_error)?,
        };

        let active: Vec<Order> = orders
            .into_iter()
            .filter(|order| order.status() != OrderStatus::Canceled)
            .collect();

        let product_ids = distinct_product_ids(active.iter());
        let products = self.display_products(&product_ids).await?;

        Ok(active
            .iter()
            .map(|order| OrderView::project(order, &products))
            .collect())
    }
}

#[cfg(test)]
#[path = "order_service_tests.rs"]
mod tests;
