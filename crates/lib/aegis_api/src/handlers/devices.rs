//! Device registry handlers.

use aegis_core::{activity, devices};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};

use super::path_id;
use crate::AppState;
use crate::error::AppResult;
use crate::extract::ApiJson;
use crate::middleware::auth::AuthenticatedGuardian;
use crate::models::{
    ActivityResponse, AppendActivityRequest, CreateDeviceRequest, DeviceDetailResponse,
    DeviceResponse, MessageResponse, UpdateDeviceRequest,
};

const DEVICE_NOT_FOUND: &str = "Device not found";

/// `POST /api/device`: pair a device with one of the guardian's tokens.
pub async fn create_device_handler(
    State(state): State<AppState>,
    Extension(guardian): Extension<AuthenticatedGuardian>,
    ApiJson(body): ApiJson<CreateDeviceRequest>,
) -> AppResult<(StatusCode, Json<DeviceResponse>)> {
    let device = devices::pair(
        &state.pool,
        &guardian.id,
        body.into(),
        state.config.pairing_mode(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(device.into())))
}

/// `GET /api/device`: most recently active first.
pub async fn list_devices_handler(
    State(state): State<AppState>,
    Extension(guardian): Extension<AuthenticatedGuardian>,
) -> AppResult<Json<Vec<DeviceResponse>>> {
    let rows = devices::list(&state.pool, &guardian.id).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

/// `GET /api/device/{id}`
pub async fn get_device_handler(
    State(state): State<AppState>,
    Extension(guardian): Extension<AuthenticatedGuardian>,
    Path(id): Path<String>,
) -> AppResult<Json<DeviceResponse>> {
    let device_id = path_id(&id, DEVICE_NOT_FOUND)?;
    let device = devices::get(&state.pool, &guardian.id, &device_id).await?;
    Ok(Json(device.into()))
}

/// `GET /api/device/{id}/details`: device, content breakdown and recent
/// activity in one view.
pub async fn device_details_handler(
    State(state): State<AppState>,
    Extension(guardian): Extension<AuthenticatedGuardian>,
    Path(id): Path<String>,
) -> AppResult<Json<DeviceDetailResponse>> {
    let device_id = path_id(&id, DEVICE_NOT_FOUND)?;
    let details = devices::details(&state.pool, &guardian.id, &device_id).await?;
    Ok(Json(details.into()))
}

/// `PUT /api/device/{id}`
pub async fn update_device_handler(
    State(state): State<AppState>,
    Extension(guardian): Extension<AuthenticatedGuardian>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<UpdateDeviceRequest>,
) -> AppResult<Json<DeviceResponse>> {
    let device_id = path_id(&id, DEVICE_NOT_FOUND)?;
    let device = devices::update(&state.pool, &guardian.id, &device_id, body.into()).await?;
    Ok(Json(device.into()))
}

/// `DELETE /api/device/{id}`
pub async fn delete_device_handler(
    State(state): State<AppState>,
    Extension(guardian): Extension<AuthenticatedGuardian>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let device_id = path_id(&id, DEVICE_NOT_FOUND)?;
    devices::delete(&state.pool, &guardian.id, &device_id).await?;
    Ok(Json(MessageResponse::new("Device deleted successfully")))
}

/// `POST /api/device/{id}/activity`: append one activity entry.
pub async fn append_activity_handler(
    State(state): State<AppState>,
    Extension(guardian): Extension<AuthenticatedGuardian>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<AppendActivityRequest>,
) -> AppResult<(StatusCode, Json<ActivityResponse>)> {
    let device_id = path_id(&id, DEVICE_NOT_FOUND)?;
    let entry = activity::append(&state.pool, &guardian.id, &device_id, body.into()).await?;
    Ok((StatusCode::CREATED, Json(entry.into())))
}
