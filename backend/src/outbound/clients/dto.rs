//! Wire DTOs for collaborator service requests and responses.
//!
//! Every collaborator wraps its payload in a common envelope:
//! `{ "statusCode": 200, "statusMessage": "...", "result": ... }`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::ports::{CartLine, CatalogProduct, UserProfile};

/// Shared response envelope used by every collaborator service.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EnvelopeDto<T> {
    #[serde(default)]
    pub status_message: Option<String>,
    pub result: Option<T>,
}

impl<T> EnvelopeDto<T> {
    /// Unwrap the payload, reporting the envelope's own message when empty.
    pub(crate) fn into_result(self) -> Result<T, String> {
        self.result.ok_or_else(|| {
            self.status_message
                .unwrap_or_else(|| "envelope carried no result".to_owned())
        })
    }
}

/// User profile payload from the user directory service.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserProfileDto {
    pub id: Uuid,
    pub email: String,
    pub address: String,
}

impl From<UserProfileDto> for UserProfile {
    fn from(value: UserProfileDto) -> Self {
        Self {
            id: value.id,
            email: value.email,
            address: value.address,
        }
    }
}

/// Cart line payload from the cart service.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartLineDto {
    pub cart_item_id: Uuid,
    pub product_id: Uuid,
    pub quantity: u32,
}

impl From<CartLineDto> for CartLine {
    fn from(value: CartLineDto) -> Self {
        Self {
            cart_item_id: value.cart_item_id,
            product_id: value.product_id,
            quantity: value.quantity,
        }
    }
}

/// Request body for pruning consumed cart lines.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RemoveCartItemsDto<'a> {
    pub email: &'a str,
    pub cart_item_ids: &'a [Uuid],
}

/// Product payload from the catalog service.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProductDto {
    pub id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub stock_quantity: u32,
    #[serde(default)]
    pub image_path: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

impl From<ProductDto> for CatalogProduct {
    fn from(value: ProductDto) -> Self {
        Self {
            id: value.id,
            name: value.name,
            price: value.price,
            stock_quantity: value.stock_quantity,
            image_path: value.image_path,
            category: value.category,
        }
    }
}

/// Request body for a single-product stock adjustment.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StockAdjustmentDto {
    pub product_id: Uuid,
    pub quantity: u32,
}
