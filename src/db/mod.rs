//! Database connection pool construction.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Create the bounded PostgreSQL connection pool.
///
/// Checkout blocks until a connection is free; the timeout applies to pool
/// construction/connection, not to a per-checkout wait.
pub async fn create_pool(
    database_url: &str,
    min_connections: u32,
    max_connections: u32,
    connect_timeout_secs: u64,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .min_connections(min_connections)
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(connect_timeout_secs))
        .connect(database_url)
        .await
}
