//! Route definitions for the Casita Azul API.

pub mod admin_users;
pub mod agents;
pub mod auth;
pub mod catalog;
pub mod dashboard;
pub mod health;
pub mod images;
pub mod properties;

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::AppState;

/// Assemble the full API surface.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .route("/api/catalogos", get(catalog::list))
        .route(
            "/api/propiedades",
            get(properties::list).post(properties::create),
        )
        .route(
            "/api/propiedades/{id}",
            get(properties::get_by_id)
                .put(properties::update)
                .delete(properties::remove),
        )
        .route("/api/propiedades/{id}/imagenes", post(images::upload))
        .route(
            "/api/propiedades/{id}/imagenes/{imagen_id}",
            delete(images::remove),
        )
        .route(
            "/api/propiedades/{id}/imagenes/{imagen_id}/principal",
            put(images::set_principal),
        )
        .route("/api/dashboard/stats", get(dashboard::stats))
        .route(
            "/api/dashboard/recent-activity",
            get(dashboard::recent_activity),
        )
        .route("/api/agentes", get(agents::list).post(agents::create))
        .route(
            "/api/agentes/{id}",
            put(agents::update).delete(agents::remove),
        )
        .route("/api/register", post(auth::register))
        .route("/api/login", post(auth::login))
        .route("/api/logout", post(auth::logout))
        .route("/api/refresh", post(auth::refresh))
        .route("/api/user", get(auth::user))
        .route(
            "/api/admin/users",
            get(admin_users::list).post(admin_users::create),
        )
        .route("/api/admin/users/{id}", delete(admin_users::remove))
        .route("/api/admin/users/{id}/role", put(admin_users::set_role))
}
