//! Ordering microservice backend.
//!
//! Hexagonal layout: the domain owns the order workflow and its ports, the
//! inbound HTTP adapter exposes the REST surface, and the outbound adapters
//! provide PostgreSQL persistence and collaborator HTTP clients.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod outbound;
pub mod server;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
