//! Enriched order representations returned by the driving ports.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::{Order, OrderItem, OrderStatus, ports::CatalogProduct};

/// One order line enriched with catalog display data.
///
/// Display fields are `None` when the catalog no longer knows the product;
/// the priced line itself is always served from the order's own snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItemView {
    /// Item id.
    pub order_item_id: Uuid,
    /// Catalog product reference.
    pub product_id: Uuid,
    /// Ordered quantity.
    pub quantity: u32,
    /// Unit price snapshot taken at order time.
    pub unit_price: Decimal,
    /// Current item status.
    pub status: OrderStatus,
    /// Catalog display name, when the product still exists.
    pub product_name: Option<String>,
    /// Catalog image path, when available.
    pub product_image_path: Option<String>,
    /// Catalog category, when available.
    pub product_category: Option<String>,
}

/// An order with its enriched lines.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderView {
    /// Order id.
    pub order_id: Uuid,
    /// Owning user's email.
    pub user_email: String,
    /// Shipping address snapshot.
    pub address: String,
    /// Stored order total.
    pub total_price: Decimal,
    /// Current order status.
    pub status: OrderStatus,
    /// Creation timestamp.
    pub ordered_at: DateTime<Utc>,
    /// Enriched item lines.
    pub items: Vec<OrderItemView>,
}

impl OrderView {
    /// Project an order through a catalog lookup result.
    ///
    /// `products` maps product ids to their catalog entries; products the
    /// catalog did not return yield null display fields.
    #[must_use]
    pub fn project(
        order: &Order,
        products: &std::collections::HashMap<Uuid, CatalogProduct>,
    ) -> Self {
        let items = order
            .items()
            .iter()
            .map(|item| project_item(item, products.get(&item.product_id())))
            .collect();

        Self {
            order_id: order.id(),
            user_email: order.user_email().to_owned(),
            address: order.address().to_owned(),
            total_price: order.total_price(),
            status: order.status(),
            ordered_at: order.ordered_at(),
            items,
        }
    }
}

fn project_item(item: &OrderItem, product: Option<&CatalogProduct>) -> OrderItemView {
    OrderItemView {
        order_item_id: item.id(),
        product_id: item.product_id(),
        quantity: item.quantity(),
        unit_price: item.unit_price(),
        status: item.status(),
        product_name: product.map(|p| p.name.clone()),
        product_image_path: product.and_then(|p| p.image_path.clone()),
        product_category: product.and_then(|p| p.category.clone()),
    }
}
