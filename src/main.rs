use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use axum::extract::DefaultBodyLimit;
use casita_azul_api::config::AppConfig;
use casita_azul_api::services::identity::IdentityClient;
use casita_azul_api::services::storage::StorageClient;
use casita_azul_api::{db, routes, AppState};
use mimalloc::MiMalloc;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Upload endpoints accept image files; the default 2 MB body cap is too low.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "casita_azul_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let config = AppConfig::from_env().expect("Failed to load configuration");

    let pool = db::create_pool(
        &config.database_url,
        config.database_min_connections,
        config.database_max_connections,
        config.database_connect_timeout_secs,
    )
    .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let identity = IdentityClient::new(
        &config.provider_url,
        &config.provider_anon_key,
        &config.provider_service_key,
    );
    let storage = StorageClient::new(
        &config.provider_url,
        &config.provider_service_key,
        &config.storage_bucket,
    );

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins(&config.allowed_origins))
        .allow_methods(Any)
        .allow_headers(Any);

    let ip: IpAddr = config
        .host
        .parse()
        .unwrap_or_else(|_| IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    let addr = SocketAddr::new(ip, config.port);
    tracing::info!(host = %addr, "Starting Casita Azul API server");

    let state = AppState {
        db: pool,
        config: config.clone(),
        identity,
        storage,
    };

    let app = routes::api_router()
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn allowed_origins(raw: &str) -> AllowOrigin {
    if raw.trim() == "*" {
        return AllowOrigin::any();
    }
    let origins = raw
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect::<Vec<_>>();
    AllowOrigin::list(origins)
}
