//! Authentication service: register/login flows delegating to `aegis_core::auth`.

use aegis_core::auth::{AuthError, jwt, password, queries};
use aegis_core::models::auth::Guardian;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// A guardian plus the session JWT just issued for them.
#[derive(Debug, Clone)]
pub struct Session {
    pub guardian: Guardian,
    pub token: String,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_registration(name: &str, email: &str, pw: &str) -> AppResult<()> {
    if name.is_empty() || email.is_empty() || pw.is_empty() {
        return Err(AppError::Validation(
            "Name, email and password are required".into(),
        ));
    }
    if !email.contains('@') {
        return Err(AppError::Validation("Invalid email address".into()));
    }
    password::check_strength(pw)?;
    Ok(())
}

fn start_session(guardian: Guardian, jwt_secret: &[u8]) -> AppResult<Session> {
    let token = jwt::generate_session_token(&guardian.id, &guardian.email, jwt_secret)?;
    Ok(Session { guardian, token })
}

/// Create a guardian account and sign them in.
pub async fn register(
    pool: &PgPool,
    name: &str,
    email: &str,
    pw: &str,
    jwt_secret: &[u8],
) -> AppResult<Session> {
    let name = name.trim();
    let email = normalize_email(email);
    validate_registration(name, &email, pw)?;

    if queries::email_exists(pool, &email).await? {
        return Err(AppError::Validation("Email already registered".into()));
    }

    let hash = password::hash_password(pw)?;
    let guardian = queries::create_guardian(pool, &email, name, &hash).await?;
    info!(guardian_id = %guardian.id, "guardian registered");

    start_session(guardian, jwt_secret)
}

/// Authenticate with email + password. Unknown email and wrong password give
/// the same error.
pub async fn login(pool: &PgPool, email: &str, pw: &str, jwt_secret: &[u8]) -> AppResult<Session> {
    let email = normalize_email(email);
    if email.is_empty() || pw.is_empty() {
        return Err(AppError::Validation("Email and password are required".into()));
    }

    let creds = queries::find_guardian_by_email(pool, &email)
        .await?
        .ok_or(AuthError::CredentialError)?;

    if !password::verify_password(pw, &creds.password_hash)? {
        return Err(AuthError::CredentialError.into());
    }

    start_session(creds.into(), jwt_secret)
}

/// The signed-in guardian's profile.
pub async fn me(pool: &PgPool, guardian_id: &Uuid) -> AppResult<Guardian> {
    let guardian = queries::get_guardian_by_id(pool, guardian_id)
        .await?
        .ok_or(AuthError::NotFound)?;
    Ok(guardian)
}
