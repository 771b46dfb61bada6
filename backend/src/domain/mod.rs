//! Domain entities, ports, and the order workflow services.
//!
//! Everything in this module is transport and storage agnostic. Inbound
//! adapters call the driving ports (`OrderCommands`, `OrderQueries`); the
//! workflow service reaches collaborators only through the driven ports.

pub mod error;
pub mod identity;
pub mod order_service;
pub mod orders;
pub mod ports;

pub use self::error::{Error, ErrorCode};
pub use self::identity::{ParseRequesterRoleError, Requester, RequesterRole};
pub use self::order_service::OrderWorkflowService;
pub use self::orders::{
    Order, OrderDraft, OrderItem, OrderItemDraft, OrderItemRecord, OrderRecord, OrderStatus,
    OrderValidationError, ParseOrderStatusError, StatusTransitionError,
};
