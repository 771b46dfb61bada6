//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations only translate between Diesel row models and
//! domain types; no business logic lives here. Row structs and the schema
//! are internal implementation details, never exposed to the domain layer.
//! Connections come from a `bb8` pool with native async support through
//! `diesel-async`.

mod diesel_order_repository;
mod models;
mod pool;
mod schema;

pub use diesel_order_repository::DieselOrderRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
