//! Reqwest-backed product catalog adapter.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use uuid::Uuid;

use crate::domain::ports::{CatalogProduct, ProductCatalog, ProductCatalogError};

use super::dto::{EnvelopeDto, ProductDto, StockAdjustmentDto};

/// Product catalog adapter speaking the catalog service's REST surface.
pub struct HttpProductCatalog {
    client: Client,
    base_url: Url,
}

impl HttpProductCatalog {
    /// Build an adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ProductCatalogError> {
        self.base_url
            .join(path)
            .map_err(|error| ProductCatalogError::protocol(error.to_string()))
    }
}

fn map_transport_error(error: reqwest::Error) -> ProductCatalogError {
    if error.is_timeout() || error.is_connect() {
        ProductCatalogError::unreachable(error.to_string())
    } else {
        ProductCatalogError::protocol(error.to_string())
    }
}

fn check_status(status: reqwest::StatusCode) -> Result<(), ProductCatalogError> {
    if status.is_server_error() {
        Err(ProductCatalogError::unreachable(format!(
            "catalog answered {status}"
        )))
    } else if !status.is_success() {
        Err(ProductCatalogError::protocol(format!(
            "catalog answered {status}"
        )))
    } else {
        Ok(())
    }
}

#[async_trait]
impl ProductCatalog for HttpProductCatalog {
    async fn products_by_ids(
        &self,
        product_ids: &[Uuid],
    ) -> Result<Vec<CatalogProduct>, ProductCatalogError> {
        let response = self
            .client
            .post(self.endpoint("/product/products")?)
            .json(&product_ids)
            .send()
            .await
            .map_err(map_transport_error)?;
        check_status(response.status())?;

        let envelope: EnvelopeDto<Vec<ProductDto>> = response
            .json()
            .await
            .map_err(|error| ProductCatalogError::protocol(error.to_string()))?;

        let products = envelope
            .into_result()
            .map_err(ProductCatalogError::protocol)?;
        Ok(products.into_iter().map(CatalogProduct::from).collect())
    }

    async fn decrement_stock(
        &self,
        product_id: Uuid,
        quantity: u32,
    ) -> Result<(), ProductCatalogError> {
        let response = self
            .client
            .put(self.endpoint("/product/stock/decrement")?)
            .json(&StockAdjustmentDto {
                product_id,
                quantity,
            })
            .send()
            .await
            .map_err(map_transport_error)?;
        check_status(response.status())
    }

    async fn restore_stock(
        &self,
        quantities: &HashMap<Uuid, u32>,
    ) -> Result<(), ProductCatalogError> {
        let response = self
            .client
            .put(self.endpoint("/product/stock/restore")?)
            .json(quantities)
            .send()
            .await
            .map_err(map_transport_error)?;
        check_status(response.status())
    }
}
