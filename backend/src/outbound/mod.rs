//! Outbound adapters: PostgreSQL persistence and collaborator HTTP clients.

pub mod clients;
pub mod persistence;
