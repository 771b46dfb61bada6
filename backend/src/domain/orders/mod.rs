//! Order aggregate and order items.
//!
//! Orders and items are constructed through a single validating constructor
//! and mutated only through the status state machine. Items reference their
//! owning order by id; there is no embedded back-pointer cycle, so the
//! aggregate can be stored as two independent tables.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

mod status;

pub use status::{OrderStatus, ParseOrderStatusError, StatusTransitionError};

/// One product/quantity/price line requested for a new order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItemDraft {
    /// Catalog product the line refers to.
    pub product_id: Uuid,
    /// Ordered quantity; must be strictly positive.
    pub quantity: u32,
    /// Unit price snapshot taken from the catalog at order time.
    pub unit_price: Decimal,
}

/// Input payload for [`Order::new`].
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDraft {
    /// Owning user's email.
    pub user_email: String,
    /// Shipping address; must be non-empty.
    pub address: String,
    /// Creation timestamp.
    pub ordered_at: DateTime<Utc>,
    /// Requested lines; must be non-empty.
    pub items: Vec<OrderItemDraft>,
}

/// Validation errors raised by the order constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderValidationError {
    /// The owner email is missing.
    #[error("order owner email must not be empty")]
    EmptyOwnerEmail,
    /// The shipping address is missing or blank.
    #[error("shipping address must not be empty")]
    EmptyAddress,
    /// An order must contain at least one item.
    #[error("order must contain at least one item")]
    EmptyItems,
    /// Item quantities must be strictly positive.
    #[error("item for product {product_id} has zero quantity")]
    ZeroQuantity {
        /// Product whose line was rejected.
        product_id: Uuid,
    },
    /// Unit prices are snapshots of catalog prices and cannot be negative.
    #[error("item for product {product_id} has a negative unit price")]
    NegativeUnitPrice {
        /// Product whose line was rejected.
        product_id: Uuid,
    },
    /// A stored item row does not belong to the order being restored.
    #[error("item {item_id} does not belong to the restored order")]
    ForeignItem {
        /// Offending item id.
        item_id: Uuid,
    },
}

/// One product line within a persisted order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    id: Uuid,
    order_id: Uuid,
    product_id: Uuid,
    quantity: u32,
    unit_price: Decimal,
    status: OrderStatus,
}

/// Stored representation of an order item, used to rebuild the aggregate
/// from persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItemRecord {
    /// Item id.
    pub id: Uuid,
    /// Owning order id.
    pub order_id: Uuid,
    /// Catalog product reference.
    pub product_id: Uuid,
    /// Ordered quantity.
    pub quantity: u32,
    /// Unit price snapshot.
    pub unit_price: Decimal,
    /// Stored item status.
    pub status: OrderStatus,
}

impl OrderItem {
    /// Rebuild an item from its stored record.
    pub fn restore(record: OrderItemRecord) -> Result<Self, OrderValidationError> {
        if record.quantity == 0 {
            return Err(OrderValidationError::ZeroQuantity {
                product_id: record.product_id,
            });
        }
        if record.unit_price.is_sign_negative() {
            return Err(OrderValidationError::NegativeUnitPrice {
                product_id: record.product_id,
            });
        }
        Ok(Self {
            id: record.id,
            order_id: record.order_id,
            product_id: record.product_id,
            quantity: record.quantity,
            unit_price: record.unit_price,
            status: record.status,
        })
    }

    /// Item id.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Owning order id.
    #[must_use]
    pub fn order_id(&self) -> Uuid {
        self.order_id
    }

    /// Catalog product reference.
    #[must_use]
    pub fn product_id(&self) -> Uuid {
        self.product_id
    }

    /// Ordered quantity.
    #[must_use]
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit price snapshot taken at order time.
    #[must_use]
    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    /// Current item status.
    #[must_use]
    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Line value: `unit_price * quantity`, in fixed-point arithmetic.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Stored representation of an order plus its item rows.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRecord {
    /// Order id.
    pub id: Uuid,
    /// Owning user's email.
    pub user_email: String,
    /// Shipping address snapshot.
    pub address: String,
    /// Stored total; a fact captured at creation, never recomputed.
    pub total_price: Decimal,
    /// Stored order status.
    pub status: OrderStatus,
    /// Creation timestamp.
    pub ordered_at: DateTime<Utc>,
    /// Stored item rows.
    pub items: Vec<OrderItemRecord>,
}

/// A pending or confirmed purchase owned by a user.
///
/// `total_price` is computed once from the item snapshots at construction
/// time and stored; later catalog price changes never alter it.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    id: Uuid,
    user_email: String,
    address: String,
    total_price: Decimal,
    status: OrderStatus,
    ordered_at: DateTime<Utc>,
    items: Vec<OrderItem>,
}

impl Order {
    /// Create a validated order in `Pending` state with freshly assigned ids.
    ///
    /// # Examples
    /// ```
    /// use chrono::Utc;
    /// use rust_decimal::Decimal;
    /// use uuid::Uuid;
    /// use ordering_backend::domain::{Order, OrderDraft, OrderItemDraft, OrderStatus};
    ///
    /// let order = Order::new(OrderDraft {
    ///     user_email: "shopper@example.com".to_owned(),
    ///     address: "12 Rose Lane".to_owned(),
    ///     ordered_at: Utc::now(),
    ///     items: vec![OrderItemDraft {
    ///         product_id: Uuid::new_v4(),
    ///         quantity: 2,
    ///         unit_price: Decimal::new(1000, 2),
    ///     }],
    /// })
    /// .expect("valid draft");
    /// assert_eq!(order.status(), OrderStatus::Pending);
    /// assert_eq!(order.total_price(), Decimal::new(2000, 2));
    /// ```
    pub fn new(draft: OrderDraft) -> Result<Self, OrderValidationError> {
        if draft.user_email.trim().is_empty() {
            return Err(OrderValidationError::EmptyOwnerEmail);
        }
        if draft.address.trim().is_empty() {
            return Err(OrderValidationError::EmptyAddress);
        }
        if draft.items.is_empty() {
            return Err(OrderValidationError::EmptyItems);
        }

        let order_id = Uuid::new_v4();
        let mut items = Vec::with_capacity(draft.items.len());
        for line in &draft.items {
            if line.quantity == 0 {
                return Err(OrderValidationError::ZeroQuantity {
                    product_id: line.product_id,
                });
            }
            if line.unit_price.is_sign_negative() {
                return Err(OrderValidationError::NegativeUnitPrice {
                    product_id: line.product_id,
                });
            }
            items.push(OrderItem {
                id: Uuid::new_v4(),
                order_id,
                product_id: line.product_id,
                quantity: line.quantity,
                unit_price: line.unit_price,
                status: OrderStatus::Pending,
            });
        }

        let total_price = items.iter().map(OrderItem::line_total).sum();

        Ok(Self {
            id: order_id,
            user_email: draft.user_email,
            address: draft.address,
            total_price,
            status: OrderStatus::Pending,
            ordered_at: draft.ordered_at,
            items,
        })
    }

    /// Rebuild an order from storage, trusting the stored total and statuses.
    pub fn restore(record: OrderRecord) -> Result<Self, OrderValidationError> {
        if record.user_email.trim().is_empty() {
            return Err(OrderValidationError::EmptyOwnerEmail);
        }
        if record.address.trim().is_empty() {
            return Err(OrderValidationError::EmptyAddress);
        }
        if record.items.is_empty() {
            return Err(OrderValidationError::EmptyItems);
        }

        let mut items = Vec::with_capacity(record.items.len());
        for item in record.items {
            if item.order_id != record.id {
                return Err(OrderValidationError::ForeignItem { item_id: item.id });
            }
            items.push(OrderItem::restore(item)?);
        }

        Ok(Self {
            id: record.id,
            user_email: record.user_email,
            address: record.address,
            total_price: record.total_price,
            status: record.status,
            ordered_at: record.ordered_at,
            items,
        })
    }

    /// Order id.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Owning user's email.
    #[must_use]
    pub fn user_email(&self) -> &str {
        self.user_email.as_str()
    }

    /// Shipping address snapshot.
    #[must_use]
    pub fn address(&self) -> &str {
        self.address.as_str()
    }

    /// Stored order total.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.total_price
    }

    /// Current order status.
    #[must_use]
    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Creation timestamp.
    #[must_use]
    pub fn ordered_at(&self) -> DateTime<Utc> {
        self.ordered_at
    }

    /// Item lines, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[OrderItem] {
        self.items.as_slice()
    }

    /// Confirm the order after all downstream effects succeeded: the order
    /// and every item move `Pending -> Ordered`.
    pub fn confirm(&mut self) -> Result<(), StatusTransitionError> {
        let next = self.status.transition(OrderStatus::Ordered)?;
        for item in &mut self.items {
            item.status = item.status.transition(OrderStatus::Ordered)?;
        }
        self.status = next;
        Ok(())
    }

    /// Cancel the whole order. Items already canceled individually keep
    /// their status; everything else moves to `Canceled` with the order.
    pub fn cancel(&mut self) -> Result<(), StatusTransitionError> {
        let next = self.status.transition(OrderStatus::Canceled)?;
        for item in &mut self.items {
            if !item.status.is_terminal() {
                item.status = item.status.transition(OrderStatus::Canceled)?;
            }
        }
        self.status = next;
        Ok(())
    }
}
