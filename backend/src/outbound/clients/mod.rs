//! Reqwest adapters for the collaborator services.
//!
//! Adapters own transport details only: request serialisation, timeout and
//! HTTP error mapping, and JSON decoding of the shared response envelope
//! into domain port types.

mod dto;
mod http_cart_gateway;
mod http_product_catalog;
mod http_user_directory;

pub use http_cart_gateway::HttpCartGateway;
pub use http_product_catalog::HttpProductCatalog;
pub use http_user_directory::HttpUserDirectory;
