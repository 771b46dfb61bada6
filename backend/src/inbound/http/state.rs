//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on the driving ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{OrderCommands, OrderQueries};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Order mutation workflows.
    pub order_commands: Arc<dyn OrderCommands>,
    /// Order read workflows.
    pub order_queries: Arc<dyn OrderQueries>,
}

impl HttpState {
    /// Construct state from the two driving ports.
    pub fn new(order_commands: Arc<dyn OrderCommands>, order_queries: Arc<dyn OrderQueries>) -> Self {
        Self {
            order_commands,
            order_queries,
        }
    }
}
