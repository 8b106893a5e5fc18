//! Dashboard routes: aggregated statistics and the recent-activity feed.

use axum::{extract::State, Json};

use crate::errors::AppError;
use crate::services::dashboard::{self, DashboardStats, RecentActivity};
use crate::AppState;

/// GET /api/dashboard/stats — fixed-shape statistics object.
pub async fn stats(State(state): State<AppState>) -> Result<Json<DashboardStats>, AppError> {
    let stats = dashboard::get_stats(&state.db).await?;
    Ok(Json(stats))
}

/// GET /api/dashboard/recent-activity — 10 most recently touched properties.
pub async fn recent_activity(
    State(state): State<AppState>,
) -> Result<Json<Vec<RecentActivity>>, AppError> {
    let rows = dashboard::recent_activity(&state.db).await?;
    Ok(Json(rows))
}
