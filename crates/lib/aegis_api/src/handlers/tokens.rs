//! Pairing token handlers.

use aegis_core::{stats, tokens};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};

use super::path_id;
use crate::AppState;
use crate::error::AppResult;
use crate::extract::ApiJson;
use crate::middleware::auth::AuthenticatedGuardian;
use crate::models::{
    ContentStatsRequest, ContentStatsResponse, CreateTokenRequest, MessageResponse,
    TokenResponse, UpdateTokenRequest,
};

const TOKEN_NOT_FOUND: &str = "Token not found";

/// `POST /api/token`: issue a new pairing token.
pub async fn create_token_handler(
    State(state): State<AppState>,
    Extension(guardian): Extension<AuthenticatedGuardian>,
    ApiJson(body): ApiJson<CreateTokenRequest>,
) -> AppResult<(StatusCode, Json<TokenResponse>)> {
    let days = body.expiry_in_days.unwrap_or_default();
    let token = tokens::issue(&state.pool, &guardian.id, days).await?;
    Ok((StatusCode::CREATED, Json(token.into())))
}

/// `GET /api/token`: all tokens of the guardian, newest first.
pub async fn list_tokens_handler(
    State(state): State<AppState>,
    Extension(guardian): Extension<AuthenticatedGuardian>,
) -> AppResult<Json<Vec<TokenResponse>>> {
    let rows = tokens::list(&state.pool, &guardian.id).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

/// `GET /api/token/{id}`
pub async fn get_token_handler(
    State(state): State<AppState>,
    Extension(guardian): Extension<AuthenticatedGuardian>,
    Path(id): Path<String>,
) -> AppResult<Json<TokenResponse>> {
    let token_id = path_id(&id, TOKEN_NOT_FOUND)?;
    let token = tokens::get(&state.pool, &guardian.id, &token_id).await?;
    Ok(Json(token.into()))
}

/// `PUT /api/token/{id}`: apply the fields present in the body.
pub async fn update_token_handler(
    State(state): State<AppState>,
    Extension(guardian): Extension<AuthenticatedGuardian>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<UpdateTokenRequest>,
) -> AppResult<Json<TokenResponse>> {
    let token_id = path_id(&id, TOKEN_NOT_FOUND)?;
    let token = tokens::update(&state.pool, &guardian.id, &token_id, body.into()).await?;
    Ok(Json(token.into()))
}

/// `DELETE /api/token/{id}`: revoke a token along with its devices.
pub async fn delete_token_handler(
    State(state): State<AppState>,
    Extension(guardian): Extension<AuthenticatedGuardian>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let token_id = path_id(&id, TOKEN_NOT_FOUND)?;
    tokens::delete(&state.pool, &guardian.id, &token_id).await?;
    Ok(Json(MessageResponse::new("Token deleted successfully")))
}

/// `PUT /api/token/{id}/stats`: attach or replace the content stats pushed
/// by the content analyzer.
pub async fn put_token_stats_handler(
    State(state): State<AppState>,
    Extension(guardian): Extension<AuthenticatedGuardian>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<ContentStatsRequest>,
) -> AppResult<Json<ContentStatsResponse>> {
    let token_id = path_id(&id, TOKEN_NOT_FOUND)?;
    let row = stats::upsert_for_token(&state.pool, &guardian.id, &token_id, body.into()).await?;
    Ok(Json(row.into()))
}
