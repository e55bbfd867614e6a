//! Session middleware: cookie or Bearer token extraction and JWT verification.

use aegis_core::auth::jwt::verify_session_token;
use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use uuid::Uuid;

use crate::AppState;
use crate::error::AppError;
use crate::services::cookies::SESSION_COOKIE;

/// The guardian a request acts for. Inserted into request extensions.
#[derive(Debug, Clone)]
pub struct AuthenticatedGuardian {
    pub id: Uuid,
    pub email: String,
}

/// Session token from the `token` cookie, else from `Authorization: Bearer`.
fn session_token(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(SESSION_COOKIE)
        && !cookie.value().is_empty()
    {
        return Some(cookie.value().to_string());
    }
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// Rejects the request with 401 unless it carries a valid session, then
/// injects [`AuthenticatedGuardian`].
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = session_token(request.headers())
        .ok_or_else(|| AppError::Unauthorized("Not authenticated".into()))?;

    let (id, claims) = verify_session_token(&token, state.config.jwt_secret.as_bytes())
        .ok_or_else(|| AppError::Unauthorized("Invalid or expired session".into()))?;

    request.extensions_mut().insert(AuthenticatedGuardian {
        id,
        email: claims.email,
    });

    Ok(next.run(request).await)
}
