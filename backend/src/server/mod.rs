//! Server assembly: database migrations and port wiring.

mod config;

use std::sync::Arc;

use diesel_migrations::{EmbeddedMigrations, embed_migrations};

pub use config::{AppConfig, ConfigError};

use crate::domain::OrderWorkflowService;
use crate::domain::ports::{OrderCommands, OrderQueries};
use crate::inbound::http::state::HttpState;
use crate::outbound::clients::{HttpCartGateway, HttpProductCatalog, HttpUserDirectory};
use crate::outbound::persistence::{DbPool, DieselOrderRepository, PoolConfig, PoolError};

/// SQL migrations embedded at compile time.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Errors raised while wiring the application together.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    /// The database pool could not be built.
    #[error("database pool: {0}")]
    Pool(#[from] PoolError),
    /// An outbound HTTP client could not be constructed.
    #[error("http client: {0}")]
    Client(#[from] reqwest::Error),
    /// Migrations could not be applied.
    #[error("migrations: {message}")]
    Migration {
        /// Underlying failure description.
        message: String,
    },
}

/// Apply pending migrations before the server accepts traffic.
///
/// Diesel migration harnesses are synchronous, so this runs on the blocking
/// thread pool with its own short-lived connection.
pub async fn run_migrations(database_url: &str) -> Result<(), BootstrapError> {
    let url = database_url.to_owned();
    tokio::task::spawn_blocking(move || {
        use diesel::Connection;
        use diesel_migrations::MigrationHarness;

        let mut conn =
            diesel::PgConnection::establish(&url).map_err(|error| BootstrapError::Migration {
                message: error.to_string(),
            })?;
        conn.run_pending_migrations(MIGRATIONS)
            .map(|_| ())
            .map_err(|error| BootstrapError::Migration {
                message: error.to_string(),
            })
    })
    .await
    .map_err(|error| BootstrapError::Migration {
        message: error.to_string(),
    })?
}

/// Wire the database pool, collaborator clients, and workflow service into
/// the HTTP handler state.
pub async fn build_http_state(config: &AppConfig) -> Result<HttpState, BootstrapError> {
    let pool = DbPool::connect(
        PoolConfig::new(config.database_url.clone())
            .with_max_size(config.database_max_connections),
    )
    .await?;

    let repository = Arc::new(DieselOrderRepository::new(pool));
    let cart = Arc::new(HttpCartGateway::new(
        config.cart_service_url.clone(),
        config.upstream_timeout,
    )?);
    let catalog = Arc::new(HttpProductCatalog::new(
        config.product_service_url.clone(),
        config.upstream_timeout,
    )?);
    let directory = Arc::new(HttpUserDirectory::new(
        config.user_service_url.clone(),
        config.upstream_timeout,
    )?);

    let workflow = Arc::new(OrderWorkflowService::new(repository, cart, catalog, directory));
    let commands: Arc<dyn OrderCommands> = workflow.clone();
    let queries: Arc<dyn OrderQueries> = workflow;

    Ok(HttpState::new(commands, queries))
}
