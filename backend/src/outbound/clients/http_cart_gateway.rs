//! Reqwest-backed cart gateway adapter.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use uuid::Uuid;

use crate::domain::ports::{CartGateway, CartGatewayError, CartLine};

use super::dto::{CartLineDto, EnvelopeDto, RemoveCartItemsDto};

/// Cart gateway adapter speaking the cart service's REST surface.
pub struct HttpCartGateway {
    client: Client,
    base_url: Url,
}

impl HttpCartGateway {
    /// Build an adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url, CartGatewayError> {
        self.base_url
            .join(path)
            .map_err(|error| CartGatewayError::protocol(error.to_string()))
    }
}

fn map_transport_error(error: reqwest::Error) -> CartGatewayError {
    if error.is_timeout() || error.is_connect() {
        CartGatewayError::unreachable(error.to_string())
    } else {
        CartGatewayError::protocol(error.to_string())
    }
}

fn check_status(status: reqwest::StatusCode) -> Result<(), CartGatewayError> {
    if status.is_server_error() {
        Err(CartGatewayError::unreachable(format!(
            "cart service answered {status}"
        )))
    } else if !status.is_success() {
        Err(CartGatewayError::protocol(format!(
            "cart service answered {status}"
        )))
    } else {
        Ok(())
    }
}

#[async_trait]
impl CartGateway for HttpCartGateway {
    async fn fetch_cart(&self, user_email: &str) -> Result<Vec<CartLine>, CartGatewayError> {
        let response = self
            .client
            .get(self.endpoint("/cart")?)
            .query(&[("email", user_email)])
            .send()
            .await
            .map_err(map_transport_error)?;
        check_status(response.status())?;

        let envelope: EnvelopeDto<Vec<CartLineDto>> = response
            .json()
            .await
            .map_err(|error| CartGatewayError::protocol(error.to_string()))?;

        let lines = envelope.into_result().map_err(CartGatewayError::protocol)?;
        Ok(lines.into_iter().map(CartLine::from).collect())
    }

    async fn remove_items(
        &self,
        user_email: &str,
        cart_item_ids: &[Uuid],
    ) -> Result<(), CartGatewayError> {
        let response = self
            .client
            .post(self.endpoint("/cart/items/remove")?)
            .json(&RemoveCartItemsDto {
                email: user_email,
                cart_item_ids,
            })
            .send()
            .await
            .map_err(map_transport_error)?;
        check_status(response.status())
    }
}
