pub mod config;
pub mod db;
pub mod errors;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use sqlx::PgPool;

use services::identity::IdentityClient;
use services::storage::StorageClient;

/// Shared application state passed to all Axum handlers.
///
/// Built once by the process entry point; the pool and the provider clients
/// are injected here instead of living in module-level globals.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: config::AppConfig,
    pub identity: IdentityClient,
    pub storage: StorageClient,
}
