//! In-memory adapters for integration tests.
//!
//! Exposed behind the `test-support` feature so integration tests can drive
//! the full HTTP surface without PostgreSQL or live collaborator services.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ports::{
    CartGateway, CartGatewayError, CartLine, CatalogProduct, OrderRepository,
    OrderRepositoryError, ProductCatalog, ProductCatalogError, UserDirectory, UserDirectoryError,
    UserProfile,
};
use crate::domain::{Order, OrderItem, OrderItemRecord, OrderRecord, OrderStatus};

fn order_to_record(order: &Order) -> OrderRecord {
    OrderRecord {
        id: order.id(),
        user_email: order.user_email().to_owned(),
        address: order.address().to_owned(),
        total_price: order.total_price(),
        status: order.status(),
        ordered_at: order.ordered_at(),
        items: order
            .items()
            .iter()
            .map(|item| OrderItemRecord {
                id: item.id(),
                order_id: item.order_id(),
                product_id: item.product_id(),
                quantity: item.quantity(),
                unit_price: item.unit_price(),
                status: item.status(),
            })
            .collect(),
    }
}

fn restore(record: OrderRecord) -> Result<Order, OrderRepositoryError> {
    Order::restore(record).map_err(|error| OrderRepositoryError::query(error.to_string()))
}

/// Order repository keeping records in process memory.
#[derive(Debug, Default)]
pub struct InMemoryOrderRepository {
    records: Mutex<Vec<OrderRecord>>,
}

impl InMemoryOrderRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with_records<T>(&self, f: impl FnOnce(&mut Vec<OrderRecord>) -> T) -> T {
        let mut records = self.records.lock().expect("repository lock poisoned");
        f(&mut records)
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn create(&self, order: &Order) -> Result<(), OrderRepositoryError> {
        self.with_records(|records| records.push(order_to_record(order)));
        Ok(())
    }

    async fn find_by_id(&self, order_id: Uuid) -> Result<Option<Order>, OrderRepositoryError> {
        self.with_records(|records| {
            records
                .iter()
                .find(|record| record.id == order_id)
                .cloned()
        })
        .map(restore)
        .transpose()
    }

    async fn find_item(
        &self,
        order_item_id: Uuid,
    ) -> Result<Option<OrderItem>, OrderRepositoryError> {
        let record = self.with_records(|records| {
            records
                .iter()
                .flat_map(|record| record.items.iter())
                .find(|item| item.id == order_item_id)
                .cloned()
        });
        record
            .map(|item| {
                OrderItem::restore(item)
                    .map_err(|error| OrderRepositoryError::query(error.to_string()))
            })
            .transpose()
    }

    async fn list_by_email(&self, email: &str) -> Result<Vec<Order>, OrderRepositoryError> {
        let records = self.with_records(|records| {
            records
                .iter()
                .rev()
                .filter(|record| record.user_email == email)
                .cloned()
                .collect::<Vec<_>>()
        });
        records.into_iter().map(restore).collect()
    }

    async fn list_all(&self) -> Result<Vec<Order>, OrderRepositoryError> {
        let records =
            self.with_records(|records| records.iter().rev().cloned().collect::<Vec<_>>());
        records.into_iter().map(restore).collect()
    }

    async fn set_order_and_item_statuses(
        &self,
        order_id: Uuid,
        status: OrderStatus,
    ) -> Result<(), OrderRepositoryError> {
        self.with_records(|records| {
            if let Some(record) = records.iter_mut().find(|record| record.id == order_id) {
                record.status = status;
                for item in &mut record.items {
                    item.status = status;
                }
            }
        });
        Ok(())
    }

    async fn set_item_status(
        &self,
        order_item_id: Uuid,
        status: OrderStatus,
    ) -> Result<(), OrderRepositoryError> {
        self.with_records(|records| {
            for record in records.iter_mut() {
                if let Some(item) = record
                    .items
                    .iter_mut()
                    .find(|item| item.id == order_item_id)
                {
                    item.status = status;
                }
            }
        });
        Ok(())
    }

    async fn items_for_order(
        &self,
        order_id: Uuid,
    ) -> Result<Vec<OrderItem>, OrderRepositoryError> {
        let items = self.with_records(|records| {
            records
                .iter()
                .find(|record| record.id == order_id)
                .map(|record| record.items.clone())
                .unwrap_or_default()
        });
        items
            .into_iter()
            .map(|item| {
                OrderItem::restore(item)
                    .map_err(|error| OrderRepositoryError::query(error.to_string()))
            })
            .collect()
    }
}

/// User directory serving one fixed profile.
#[derive(Debug, Default)]
pub struct StaticUserDirectory {
    profile: Option<UserProfile>,
}

impl StaticUserDirectory {
    /// Directory knowing the given profile.
    #[must_use]
    pub fn with_profile(profile: UserProfile) -> Self {
        Self {
            profile: Some(profile),
        }
    }

    /// Directory knowing nobody.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserDirectory for StaticUserDirectory {
    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserProfile>, UserDirectoryError> {
        Ok(self
            .profile
            .as_ref()
            .filter(|profile| profile.email == email)
            .cloned())
    }
}

/// Cart gateway serving fixed lines and recording removals.
#[derive(Debug, Default)]
pub struct StaticCartGateway {
    lines: Vec<CartLine>,
    removed: Mutex<Vec<Uuid>>,
}

impl StaticCartGateway {
    /// Gateway whose cart holds the given lines.
    #[must_use]
    pub fn with_lines(lines: Vec<CartLine>) -> Self {
        Self {
            lines,
            removed: Mutex::new(Vec::new()),
        }
    }

    /// Cart line ids removed so far.
    #[must_use]
    pub fn removed_ids(&self) -> Vec<Uuid> {
        self.removed.lock().expect("cart lock poisoned").clone()
    }
}

#[async_trait]
impl CartGateway for StaticCartGateway {
    async fn fetch_cart(&self, _user_email: &str) -> Result<Vec<CartLine>, CartGatewayError> {
        Ok(self.lines.clone())
    }

    async fn remove_items(
        &self,
        _user_email: &str,
        cart_item_ids: &[Uuid],
    ) -> Result<(), CartGatewayError> {
        self.removed
            .lock()
            .expect("cart lock poisoned")
            .extend_from_slice(cart_item_ids);
        Ok(())
    }
}

/// Product catalog serving fixed products and recording stock adjustments.
#[derive(Debug, Default)]
pub struct StaticProductCatalog {
    products: Vec<CatalogProduct>,
    decrements: Mutex<Vec<(Uuid, u32)>>,
    restores: Mutex<Vec<HashMap<Uuid, u32>>>,
}

impl StaticProductCatalog {
    /// Catalog knowing the given products.
    #[must_use]
    pub fn with_products(products: Vec<CatalogProduct>) -> Self {
        Self {
            products,
            decrements: Mutex::new(Vec::new()),
            restores: Mutex::new(Vec::new()),
        }
    }

    /// Stock decrements issued so far, in call order.
    #[must_use]
    pub fn decrements(&self) -> Vec<(Uuid, u32)> {
        self.decrements.lock().expect("catalog lock poisoned").clone()
    }

    /// Stock restorations issued so far, in call order.
    #[must_use]
    pub fn restores(&self) -> Vec<HashMap<Uuid, u32>> {
        self.restores.lock().expect("catalog lock poisoned").clone()
    }
}

#[async_trait]
impl ProductCatalog for StaticProductCatalog {
    async fn products_by_ids(
        &self,
        product_ids: &[Uuid],
    ) -> Result<Vec<CatalogProduct>, ProductCatalogError> {
        Ok(self
            .products
            .iter()
            .filter(|product| product_ids.contains(&product.id))
            .cloned()
            .collect())
    }

    async fn decrement_stock(
        &self,
        product_id: Uuid,
        quantity: u32,
    ) -> Result<(), ProductCatalogError> {
        self.decrements
            .lock()
            .expect("catalog lock poisoned")
            .push((product_id, quantity));
        Ok(())
    }

    async fn restore_stock(
        &self,
        quantities: &HashMap<Uuid, u32>,
    ) -> Result<(), ProductCatalogError> {
        self.restores
            .lock()
            .expect("catalog lock poisoned")
            .push(quantities.clone());
        Ok(())
    }
}
