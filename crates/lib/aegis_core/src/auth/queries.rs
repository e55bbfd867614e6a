//! Guardian table queries.

use sqlx::PgPool;
use uuid::Uuid;

use super::AuthError;
use crate::models::auth::{Guardian, GuardianCredentials};

/// Fetch a guardian with its credential hash, by email.
pub async fn find_guardian_by_email(
    pool: &PgPool,
    email: &str,
) -> Result<Option<GuardianCredentials>, AuthError> {
    let row = sqlx::query_as::<_, GuardianCredentials>(
        "SELECT id, email, name, password_hash FROM guardians WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Insert a guardian. A concurrent registration of the same email surfaces as
/// a validation error from the unique index.
pub async fn create_guardian(
    pool: &PgPool,
    email: &str,
    name: &str,
    password_hash: &str,
) -> Result<Guardian, AuthError> {
    sqlx::query_as::<_, Guardian>(
        "INSERT INTO guardians (email, name, password_hash) VALUES ($1, $2, $3) \
         RETURNING id, email, name",
    )
    .bind(email)
    .bind(name)
    .bind(password_hash)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if e.as_database_error()
            .is_some_and(|db| db.is_unique_violation())
        {
            AuthError::ValidationError("Email already registered".into())
        } else {
            AuthError::DbError(e)
        }
    })
}

/// Check whether an email is already registered.
pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool, AuthError> {
    let exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM guardians WHERE email = $1)")
            .bind(email)
            .fetch_one(pool)
            .await?;
    Ok(exists)
}

/// Fetch a guardian by id.
pub async fn get_guardian_by_id(
    pool: &PgPool,
    guardian_id: &Uuid,
) -> Result<Option<Guardian>, AuthError> {
    let row = sqlx::query_as::<_, Guardian>("SELECT id, email, name FROM guardians WHERE id = $1")
        .bind(guardian_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}
