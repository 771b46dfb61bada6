//! PostgreSQL-backed `OrderRepository` implementation using Diesel ORM.
//!
//! Order+items inserts and combined status updates run inside a single
//! transaction so the aggregate is always durably consistent.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{OrderRepository, OrderRepositoryError};
use crate::domain::{Order, OrderItem, OrderItemRecord, OrderRecord, OrderStatus};

use super::models::{NewOrderItemRow, NewOrderRow, OrderItemRow, OrderRow};
use super::pool::{DbPool, PoolError};
use super::schema::{order_items, orders};

/// Diesel-backed implementation of the order repository port.
#[derive(Clone)]
pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    /// Create a new repository with the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> OrderRepositoryError {
    OrderRepositoryError::connection(error.to_string())
}

fn map_diesel_error(error: diesel::result::Error) -> OrderRepositoryError {
    match error {
        diesel::result::Error::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            OrderRepositoryError::connection(info.message().to_owned())
        }
        other => OrderRepositoryError::query(other.to_string()),
    }
}

fn parse_status(raw: &str) -> Result<OrderStatus, OrderRepositoryError> {
    raw.parse()
        .map_err(|_| OrderRepositoryError::query(format!("unknown stored status: {raw}")))
}

fn item_row_to_record(row: OrderItemRow) -> Result<OrderItemRecord, OrderRepositoryError> {
    let status = parse_status(row.status.as_str())?;
    let quantity = u32::try_from(row.quantity).map_err(|_| {
        OrderRepositoryError::query(format!(
            "stored quantity {} for item {} is out of range",
            row.quantity, row.id
        ))
    })?;
    Ok(OrderItemRecord {
        id: row.id,
        order_id: row.order_id,
        product_id: row.product_id,
        quantity,
        unit_price: row.unit_price,
        status,
    })
}

fn item_row_to_domain(row: OrderItemRow) -> Result<OrderItem, OrderRepositoryError> {
    let record = item_row_to_record(row)?;
    OrderItem::restore(record).map_err(|error| OrderRepositoryError::query(error.to_string()))
}

/// Convert database rows into a validated domain order.
fn assemble_order(
    row: OrderRow,
    item_rows: Vec<OrderItemRow>,
) -> Result<Order, OrderRepositoryError> {
    let status = parse_status(row.status.as_str())?;
    let items = item_rows
        .into_iter()
        .map(item_row_to_record)
        .collect::<Result<Vec<_>, _>>()?;

    Order::restore(OrderRecord {
        id: row.id,
        user_email: row.user_email,
        address: row.address,
        total_price: row.total_price,
        status,
        ordered_at: row.ordered_at,
        items,
    })
    .map_err(|error| OrderRepositoryError::query(error.to_string()))
}

fn item_rows_for<'a>(
    order: &'a Order,
) -> Result<Vec<NewOrderItemRow<'a>>, OrderRepositoryError> {
    order
        .items()
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let position = i32::try_from(index).map_err(|_| {
                OrderRepositoryError::query(format!("order {} has too many items", order.id()))
            })?;
            let quantity = i32::try_from(item.quantity()).map_err(|_| {
                OrderRepositoryError::query(format!(
                    "quantity {} for item {} is out of range",
                    item.quantity(),
                    item.id()
                ))
            })?;
            Ok(NewOrderItemRow {
                id: item.id(),
                order_id: item.order_id(),
                product_id: item.product_id(),
                quantity,
                unit_price: item.unit_price(),
                status: item.status().as_str(),
                position,
            })
        })
        .collect()
}

/// Group loaded item rows by their owning order id, preserving position order.
fn group_items_by_order(rows: Vec<OrderItemRow>) -> HashMap<Uuid, Vec<OrderItemRow>> {
    let mut grouped: HashMap<Uuid, Vec<OrderItemRow>> = HashMap::new();
    for row in rows {
        grouped.entry(row.order_id).or_default().push(row);
    }
    grouped
}

impl DieselOrderRepository {
    async fn load_orders(
        &self,
        rows: Vec<OrderRow>,
    ) -> Result<Vec<Order>, OrderRepositoryError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let item_rows = order_items::table
            .filter(order_items::order_id.eq_any(&ids))
            .order((order_items::order_id.asc(), order_items::position.asc()))
            .load::<OrderItemRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let mut grouped = group_items_by_order(item_rows);
        rows.into_iter()
            .map(|row| {
                let items = grouped.remove(&row.id).unwrap_or_default();
                assemble_order(row, items)
            })
            .collect()
    }
}

#[async_trait]
impl OrderRepository for DieselOrderRepository {
    async fn create(&self, order: &Order) -> Result<(), OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_order = NewOrderRow {
            id: order.id(),
            user_email: order.user_email(),
            address: order.address(),
            total_price: order.total_price(),
            status: order.status().as_str(),
            ordered_at: order.ordered_at(),
        };
        let new_items = item_rows_for(order)?;

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                diesel::insert_into(orders::table)
                    .values(&new_order)
                    .execute(conn)
                    .await?;
                diesel::insert_into(order_items::table)
                    .values(&new_items)
                    .execute(conn)
                    .await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, order_id: Uuid) -> Result<Option<Order>, OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = orders::table
            .find(order_id)
            .first::<OrderRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let item_rows = order_items::table
            .filter(order_items::order_id.eq(order_id))
            .order(order_items::position.asc())
            .load::<OrderItemRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        assemble_order(row, item_rows).map(Some)
    }

    async fn find_item(
        &self,
        order_item_id: Uuid,
    ) -> Result<Option<OrderItem>, OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = order_items::table
            .find(order_item_id)
            .first::<OrderItemRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(item_row_to_domain).transpose()
    }

    async fn list_by_email(&self, email: &str) -> Result<Vec<Order>, OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = orders::table
            .filter(orders::user_email.eq(email))
            .order(orders::ordered_at.desc())
            .load::<OrderRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        drop(conn);

        self.load_orders(rows).await
    }

    async fn list_all(&self) -> Result<Vec<Order>, OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = orders::table
            .order(orders::ordered_at.desc())
            .load::<OrderRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        drop(conn);

        self.load_orders(rows).await
    }

    async fn set_order_and_item_statuses(
        &self,
        order_id: Uuid,
        status: OrderStatus,
    ) -> Result<(), OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                diesel::update(orders::table.find(order_id))
                    .set(orders::status.eq(status.as_str()))
                    .execute(conn)
                    .await?;
                diesel::update(order_items::table.filter(order_items::order_id.eq(order_id)))
                    .set(order_items::status.eq(status.as_str()))
                    .execute(conn)
                    .await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn set_item_status(
        &self,
        order_item_id: Uuid,
        status: OrderStatus,
    ) -> Result<(), OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(order_items::table.find(order_item_id))
            .set(order_items::status.eq(status.as_str()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn items_for_order(
        &self,
        order_id: Uuid,
    ) -> Result<Vec<OrderItem>, OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = order_items::table
            .filter(order_items::order_id.eq(order_id))
            .order(order_items::position.asc())
            .load::<OrderItemRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(item_row_to_domain).collect()
    }
}
