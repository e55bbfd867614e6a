//! Pairing token management.
//!
//! Tokens are opaque secrets a guardian hands to a companion device. The
//! token string is unique across all guardians; the `UNIQUE` constraint on
//! `pairing_tokens.token` is the authority, so a rejected insert is treated as
//! a collision and re-rolled rather than reported.
//!
//! Expiry is lazy: expired tokens stay in the table and simply fail
//! [`PairingToken::is_valid`].

use chrono::{DateTime, Duration, Utc};
use rand::distr::Alphanumeric;
use rand::{Rng, rng};
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{CoreError, Result};
use crate::models::token::{PairingToken, TokenPatch};
use crate::uuid::uuidv7;

/// Prefix of every issued token string.
pub const TOKEN_PREFIX: &str = "aegis_sk_";

/// Upper bound on generate-and-insert attempts before giving up.
pub const MAX_GENERATION_ATTEMPTS: usize = 10;

/// Column list for `PairingToken`, including the derived connection flag.
/// Expects the token table aliased as `t`.
const TOKEN_COLUMNS: &str = r#"
    t.id, t.token, t.guardian_id, t.device_name, t.content_stats_id,
    t.expires_at, t.is_active, t.created_at, t.updated_at,
    EXISTS(SELECT 1 FROM devices d WHERE d.token_id = t.id) AS has_device_connected
"#;

fn random_alphanumeric(len: usize) -> String {
    rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Generate a candidate token string: `aegis_sk_` + 16 alphanumerics + `_` + 8
/// alphanumerics, drawn from the thread-local CSPRNG.
pub fn generate_token_string() -> String {
    format!(
        "{TOKEN_PREFIX}{}_{}",
        random_alphanumeric(16),
        random_alphanumeric(8)
    )
}

/// Compute `from + days`, rejecting non-positive or unrepresentable values.
pub fn expiry_from(from: DateTime<Utc>, days: i64) -> Result<DateTime<Utc>> {
    if days <= 0 {
        return Err(CoreError::Validation(
            "Valid expiryInDays is required".into(),
        ));
    }
    Duration::try_days(days)
        .and_then(|d| from.checked_add_signed(d))
        .ok_or_else(|| CoreError::Validation("expiryInDays is too large".into()))
}

/// Issue a new active token for a guardian, valid for `expiry_in_days` days.
pub async fn issue(pool: &PgPool, guardian_id: &Uuid, expiry_in_days: i64) -> Result<PairingToken> {
    let expires_at = expiry_from(Utc::now(), expiry_in_days)?;

    for attempt in 1..=MAX_GENERATION_ATTEMPTS {
        let candidate = generate_token_string();

        // ON CONFLICT makes the uniqueness check and the insert one atomic step;
        // a concurrent issuer that raced us to the same string yields no row.
        let inserted = sqlx::query_as::<_, PairingToken>(
            r#"
            INSERT INTO pairing_tokens (id, token, guardian_id, expires_at, is_active)
            VALUES ($1, $2, $3, $4, true)
            ON CONFLICT (token) DO NOTHING
            RETURNING id, token, guardian_id, device_name, content_stats_id,
                      expires_at, is_active, created_at, updated_at,
                      false AS has_device_connected
            "#,
        )
        .bind(uuidv7())
        .bind(&candidate)
        .bind(guardian_id)
        .bind(expires_at)
        .fetch_optional(pool)
        .await?;

        match inserted {
            Some(token) => {
                info!(guardian_id = %guardian_id, token_id = %token.id, %expires_at, "issued pairing token");
                return Ok(token);
            }
            None => debug!(attempt, "pairing token collision, re-rolling"),
        }
    }

    Err(CoreError::Conflict(format!(
        "Could not generate a unique token after {MAX_GENERATION_ATTEMPTS} attempts"
    )))
}

/// List a guardian's tokens, newest first.
pub async fn list(pool: &PgPool, guardian_id: &Uuid) -> Result<Vec<PairingToken>> {
    let sql = format!(
        "SELECT {TOKEN_COLUMNS} FROM pairing_tokens t \
         WHERE t.guardian_id = $1 \
         ORDER BY t.created_at DESC, t.id DESC"
    );
    let rows = sqlx::query_as::<_, PairingToken>(&sql)
        .bind(guardian_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Fetch one token owned by the guardian.
pub async fn get(pool: &PgPool, guardian_id: &Uuid, token_id: &Uuid) -> Result<PairingToken> {
    let sql = format!(
        "SELECT {TOKEN_COLUMNS} FROM pairing_tokens t \
         WHERE t.id = $1 AND t.guardian_id = $2"
    );
    sqlx::query_as::<_, PairingToken>(&sql)
        .bind(token_id)
        .bind(guardian_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(CoreError::token_not_found)
}

/// Apply a partial update. Only fields present in `patch` change.
pub async fn update(
    pool: &PgPool,
    guardian_id: &Uuid,
    token_id: &Uuid,
    patch: TokenPatch,
) -> Result<PairingToken> {
    let expires_at = patch
        .expiry_in_days
        .map(|days| expiry_from(Utc::now(), days))
        .transpose()?;
    let device_name = patch.device_name.map(|n| n.trim().to_string());

    let sql = format!(
        "UPDATE pairing_tokens t \
         SET device_name = COALESCE($3, t.device_name), \
             expires_at = COALESCE($4, t.expires_at), \
             is_active = COALESCE($5, t.is_active), \
             updated_at = now() \
         WHERE t.id = $1 AND t.guardian_id = $2 \
         RETURNING {TOKEN_COLUMNS}"
    );
    let token = sqlx::query_as::<_, PairingToken>(&sql)
        .bind(token_id)
        .bind(guardian_id)
        .bind(device_name)
        .bind(expires_at)
        .bind(patch.is_active)
        .fetch_optional(pool)
        .await?
        .ok_or_else(CoreError::token_not_found)?;

    info!(guardian_id = %guardian_id, token_id = %token_id, is_active = token.is_active, "updated pairing token");
    Ok(token)
}

/// Delete a token together with every device bound to it and their activity.
///
/// Runs in one transaction, children first. Returns the number of devices
/// removed.
pub async fn delete(pool: &PgPool, guardian_id: &Uuid, token_id: &Uuid) -> Result<u64> {
    let mut tx = pool.begin().await?;

    // Row lock blocks concurrent pairings against this token until we commit.
    let owned = sqlx::query_scalar::<_, Uuid>(
        "SELECT id FROM pairing_tokens WHERE id = $1 AND guardian_id = $2 FOR UPDATE",
    )
    .bind(token_id)
    .bind(guardian_id)
    .fetch_optional(&mut *tx)
    .await?;

    if owned.is_none() {
        return Err(CoreError::token_not_found());
    }

    sqlx::query(
        "DELETE FROM activity_logs \
         WHERE device_id IN (SELECT id FROM devices WHERE token_id = $1)",
    )
    .bind(token_id)
    .execute(&mut *tx)
    .await?;

    let devices_removed = sqlx::query("DELETE FROM devices WHERE token_id = $1")
        .bind(token_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    sqlx::query("DELETE FROM pairing_tokens WHERE id = $1")
        .bind(token_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    info!(guardian_id = %guardian_id, token_id = %token_id, devices_removed, "deleted pairing token");
    Ok(devices_removed)
}

/// Resolve a token string to its record iff it is currently usable.
pub async fn find_valid_by_secret(pool: &PgPool, token: &str) -> Result<Option<PairingToken>> {
    let sql = format!(
        "SELECT {TOKEN_COLUMNS} FROM pairing_tokens t \
         WHERE t.token = $1 AND t.is_active AND t.expires_at > now()"
    );
    let row = sqlx::query_as::<_, PairingToken>(&sql)
        .bind(token)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}
