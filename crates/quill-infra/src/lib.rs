//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`.
//! This crate contains the database, cache, and session integrations.

pub mod auth;
pub mod cache;
pub mod database;

pub use auth::JwtSessionService;
pub use cache::InMemoryCache;
pub use database::{DatabaseConfig, DatabaseConnections, InMemoryStore};
