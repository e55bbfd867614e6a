//! Dashboard handlers.

use aegis_core::telemetry;
use axum::extract::State;
use axum::{Extension, Json};

use crate::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedGuardian;
use crate::models::{DashboardDeviceEntry, DashboardStatsResponse};

/// `GET /api/dashboard/stats`
pub async fn dashboard_stats_handler(
    State(state): State<AppState>,
    Extension(guardian): Extension<AuthenticatedGuardian>,
) -> AppResult<Json<DashboardStatsResponse>> {
    let stats = telemetry::dashboard_stats(&state.pool, &guardian.id).await?;
    Ok(Json(stats.into()))
}

/// `GET /api/dashboard/devices`
pub async fn dashboard_devices_handler(
    State(state): State<AppState>,
    Extension(guardian): Extension<AuthenticatedGuardian>,
) -> AppResult<Json<Vec<DashboardDeviceEntry>>> {
    let rows = telemetry::dashboard_devices(&state.pool, &guardian.id).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}
