//! Port for the product catalog collaborator: price/display lookups and
//! stock adjustments.

use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

/// Catalog projection of a product: current price, stock, and display data.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogProduct {
    /// Product id.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Current catalog price.
    pub price: Decimal,
    /// Units currently in stock.
    pub stock_quantity: u32,
    /// Main image path, when the product has one.
    pub image_path: Option<String>,
    /// Category name, when assigned.
    pub category: Option<String>,
}

/// Errors raised by product catalog adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProductCatalogError {
    /// The catalog service could not be reached (including timeouts).
    #[error("product catalog unreachable: {message}")]
    Unreachable {
        /// Adapter-provided failure description.
        message: String,
    },
    /// The catalog service answered but the exchange failed.
    #[error("product catalog protocol error: {message}")]
    Protocol {
        /// Adapter-provided failure description.
        message: String,
    },
}

impl ProductCatalogError {
    /// Create an unreachable error with the given message.
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self::Unreachable {
            message: message.into(),
        }
    }

    /// Create a protocol error with the given message.
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }
}

/// Port for catalog lookups and stock adjustments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Batch-resolve products by id. Ids missing from the catalog are simply
    /// absent from the response; callers decide whether that is an error.
    async fn products_by_ids(
        &self,
        product_ids: &[Uuid],
    ) -> Result<Vec<CatalogProduct>, ProductCatalogError>;

    /// Decrement a product's stock by the ordered quantity.
    async fn decrement_stock(
        &self,
        product_id: Uuid,
        quantity: u32,
    ) -> Result<(), ProductCatalogError>;

    /// Restore stock for the given product quantities in one call.
    async fn restore_stock(
        &self,
        quantities: &HashMap<Uuid, u32>,
    ) -> Result<(), ProductCatalogError>;
}

/// Fixture implementation for wiring that does not exercise the catalog.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureProductCatalog;

#[async_trait]
impl ProductCatalog for FixtureProductCatalog {
    async fn products_by_ids(
        &self,
        _product_ids: &[Uuid],
    ) -> Result<Vec<CatalogProduct>, ProductCatalogError> {
        Ok(Vec::new())
    }

    async fn decrement_stock(
        &self,
        _product_id: Uuid,
        _quantity: u32,
    ) -> Result<(), ProductCatalogError> {
        Ok(())
    }

    async fn restore_stock(
        &self,
        _quantities: &HashMap<Uuid, u32>,
    ) -> Result<(), ProductCatalogError> {
        Ok(())
    }
}
