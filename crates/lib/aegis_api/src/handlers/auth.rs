//! Authentication request handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use axum_extra::extract::cookie::CookieJar;

use crate::AppState;
use crate::error::AppResult;
use crate::extract::ApiJson;
use crate::middleware::auth::AuthenticatedGuardian;
use crate::models::{GuardianResponse, LoginRequest, MessageResponse, RegisterRequest};
use crate::services::auth;
use crate::services::cookies::{clear_session_cookie, session_cookie};

/// `POST /api/auth/register`: create an account and start a session.
pub async fn register_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> AppResult<(StatusCode, CookieJar, Json<GuardianResponse>)> {
    let session = auth::register(
        &state.pool,
        &body.name,
        &body.email,
        &body.password,
        state.config.jwt_secret.as_bytes(),
    )
    .await?;
    let jar = jar.add(session_cookie(&session.token, state.config.secure_cookies));
    Ok((StatusCode::CREATED, jar, Json(session.guardian.into())))
}

/// `POST /api/auth/login`: authenticate with email + password.
pub async fn login_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiJson(body): ApiJson<LoginRequest>,
) -> AppResult<(CookieJar, Json<GuardianResponse>)> {
    let session = auth::login(
        &state.pool,
        &body.email,
        &body.password,
        state.config.jwt_secret.as_bytes(),
    )
    .await?;
    let jar = jar.add(session_cookie(&session.token, state.config.secure_cookies));
    Ok((jar, Json(session.guardian.into())))
}

/// `POST /api/auth/logout`: drop the session cookie.
pub async fn logout_handler(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    let jar = jar.add(clear_session_cookie(state.config.secure_cookies));
    (jar, Json(MessageResponse::new("Logged out")))
}

/// `GET /api/auth/me`: the signed-in guardian.
pub async fn me_handler(
    State(state): State<AppState>,
    Extension(guardian): Extension<AuthenticatedGuardian>,
) -> AppResult<Json<GuardianResponse>> {
    let profile = auth::me(&state.pool, &guardian.id).await?;
    Ok(Json(profile.into()))
}
