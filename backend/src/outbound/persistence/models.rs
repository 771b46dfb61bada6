//! Diesel row models for the orders schema.
//!
//! Internal to the persistence adapter; conversions into domain types go
//! through the validated `restore` constructors.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::schema::{order_items, orders};

/// Read model for one `orders` row.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct OrderRow {
    pub id: Uuid,
    pub user_email: String,
    pub address: String,
    pub total_price: Decimal,
    pub status: String,
    pub ordered_at: DateTime<Utc>,
}

/// Insert model for one `orders` row.
#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub(crate) struct NewOrderRow<'a> {
    pub id: Uuid,
    pub user_email: &'a str,
    pub address: &'a str,
    pub total_price: Decimal,
    pub status: &'a str,
    pub ordered_at: DateTime<Utc>,
}

/// Read model for one `order_items` row.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = order_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct OrderItemRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub status: String,
    pub position: i32,
}

/// Insert model for one `order_items` row.
#[derive(Debug, Insertable)]
#[diesel(table_name = order_items)]
pub(crate) struct NewOrderItemRow<'a> {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub status: &'a str,
    pub position: i32,
}
