//! Domain ports and supporting types for the hexagonal boundary.

mod cart_gateway;
mod order_commands;
mod order_queries;
mod order_repository;
mod order_views;
mod product_catalog;
mod user_directory;

#[cfg(test)]
pub use cart_gateway::MockCartGateway;
pub use cart_gateway::{CartGateway, CartGatewayError, CartLine, FixtureCartGateway};
#[cfg(test)]
pub use order_commands::MockOrderCommands;
pub use order_commands::{
    CancelOrderRequest, OrderCommands, PlaceOrderRequest, UpdateOrderItemStatusRequest,
    UpdateOrderStatusRequest,
};
#[cfg(test)]
pub use order_queries::MockOrderQueries;
pub use order_queries::{GetOrderRequest, ListOrdersRequest, OrderQueries};
#[cfg(test)]
pub use order_repository::MockOrderRepository;
pub use order_repository::{FixtureOrderRepository, OrderRepository, OrderRepositoryError};
pub use order_views::{OrderItemView, OrderView};
#[cfg(test)]
pub use product_catalog::MockProductCatalog;
pub use product_catalog::{
    CatalogProduct, FixtureProductCatalog, ProductCatalog, ProductCatalogError,
};
#[cfg(test)]
pub use user_directory::MockUserDirectory;
pub use user_directory::{FixtureUserDirectory, UserDirectory, UserDirectoryError, UserProfile};
