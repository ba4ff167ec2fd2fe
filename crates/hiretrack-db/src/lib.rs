//! HireTrack Database — SurrealDB connection management and repository
//! implementations.
//!
//! This crate provides:
//! - Connection management ([`DbConfig`], [`DbManager`]) and per-tenant
//!   connection resolution ([`ConnectionRegistry`])
//! - Schema initialization and migrations ([`run_migrations`])
//! - Error types ([`DbError`])
//! - Repository implementations for the `hiretrack-core` traits

pub mod repository;

mod connection;
mod error;
mod schema;

pub use connection::{ConnectionRegistry, DataCenterConnection, DbConfig, DbManager, TenantDatabase};
pub use error::DbError;
pub use schema::{run_migrations, schema_v1};
