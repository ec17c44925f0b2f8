/// Database utilities
///
/// Connection pool construction and migration helpers for PostgreSQL.

pub mod migrations;
pub mod pool;

pub use migrations::run_migrations;
pub use pool::{create_pool, health_check, DatabaseConfig};
