use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_min_connections: u32,
    pub database_max_connections: u32,
    pub database_connect_timeout_secs: u64,
    pub host: String,
    pub port: u16,
    /// Comma-separated list of allowed CORS origins, or "*" for any.
    pub allowed_origins: String,
    /// Base URL of the managed identity/storage provider.
    pub provider_url: String,
    /// Public (anon) API key, sent on end-user auth calls.
    pub provider_anon_key: String,
    /// Service-role key for admin user management and storage writes.
    pub provider_service_key: String,
    /// Object-store bucket holding property images.
    pub storage_bucket: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")?,
            database_min_connections: env::var("DATABASE_MIN_CONNECTIONS")
                .unwrap_or_else(|_| "1".to_string())
                .parse()
                .unwrap_or(1),
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .unwrap_or(5),
            database_connect_timeout_secs: env::var("DATABASE_CONNECT_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap_or(30),
            host: env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("BACKEND_PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .unwrap_or(5000),
            allowed_origins: env::var("ALLOWED_ORIGINS").unwrap_or_else(|_| "*".to_string()),
            provider_url: env::var("PROVIDER_URL")?,
            provider_anon_key: env::var("PROVIDER_ANON_KEY")?,
            provider_service_key: env::var("PROVIDER_SERVICE_KEY")?,
            storage_bucket: env::var("STORAGE_BUCKET")
                .unwrap_or_else(|_| "propiedades".to_string()),
        })
    }
}
