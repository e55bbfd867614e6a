//! Device registry.
//!
//! A device is created by presenting a pairing token the guardian owns, and
//! stays bound to that token for life. Every query is scoped by guardian id.

use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::activity::{self, DETAIL_ACTIVITY_LIMIT};
use crate::error::{CoreError, Result};
use crate::models::activity::ActivityRow;
use crate::models::device::{ConnectionType, DevicePatch, DeviceRow, NewDevice, UNKNOWN};
use crate::stats;
use crate::telemetry::{self, BlockedContent, TimeUsage};
use crate::tokens;
use crate::uuid::{parse_id, uuidv7};

const DEVICE_COLUMNS: &str = r#"
    id, guardian_id, token_id, name, device_type, risk_score, total_screen_time,
    battery_level, connection_type, is_active, last_active, os_version, owner,
    created_at, updated_at
"#;

/// How strictly `pair` checks the presented token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PairingMode {
    /// Ownership only. Inactive or expired tokens can still pair.
    #[default]
    Loose,
    /// Ownership plus validity: the token must be active and unexpired.
    Strict,
}

/// Composed read-only detail view for one device.
#[derive(Debug, Clone)]
pub struct DeviceDetails {
    pub device: DeviceRow,
    pub blocked_content: Vec<BlockedContent>,
    pub time_usage: Vec<TimeUsage>,
    /// Newest first, at most [`DETAIL_ACTIVITY_LIMIT`] entries.
    pub activity: Vec<ActivityRow>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Pair a new device against one of the guardian's tokens.
pub async fn pair(
    pool: &PgPool,
    guardian_id: &Uuid,
    input: NewDevice,
    mode: PairingMode,
) -> Result<DeviceRow> {
    let (Some(name), Some(device_type), Some(raw_token_id)) = (
        non_empty(input.name),
        non_empty(input.device_type),
        non_empty(input.token_id),
    ) else {
        return Err(CoreError::Validation(
            "Name, type, and tokenId are required".into(),
        ));
    };

    let connection_type = match non_empty(input.connection_type) {
        Some(raw) => raw.parse::<ConnectionType>()?,
        None => ConnectionType::Unknown,
    };
    let os_version = non_empty(input.os_version).unwrap_or_else(|| UNKNOWN.to_string());
    let owner = non_empty(input.owner).unwrap_or_else(|| UNKNOWN.to_string());

    let token_id = parse_id(&raw_token_id).ok_or_else(CoreError::token_not_found)?;

    if mode == PairingMode::Strict {
        let token = tokens::get(pool, guardian_id, &token_id).await?;
        if !token.is_valid() {
            return Err(CoreError::Validation(
                "Token is inactive or expired".into(),
            ));
        }
    }

    // Ownership check and insert in one statement: no row comes back unless
    // the token exists and belongs to this guardian.
    let sql = format!(
        "INSERT INTO devices (id, guardian_id, token_id, name, device_type, os_version, \
                              connection_type, owner, risk_score, total_screen_time, \
                              battery_level, is_active, last_active) \
         SELECT $1, t.guardian_id, t.id, $4, $5, $6, $7, $8, 0, 0, 100, true, now() \
         FROM pairing_tokens t \
         WHERE t.id = $3 AND t.guardian_id = $2 \
         RETURNING {DEVICE_COLUMNS}"
    );
    let device = sqlx::query_as::<_, DeviceRow>(&sql)
        .bind(uuidv7())
        .bind(guardian_id)
        .bind(token_id)
        .bind(&name)
        .bind(&device_type)
        .bind(&os_version)
        .bind(connection_type.as_str())
        .bind(&owner)
        .fetch_optional(pool)
        .await
        .map_err(|e| CoreError::from_write(e, CoreError::token_not_found))?
        .ok_or_else(CoreError::token_not_found)?;

    info!(guardian_id = %guardian_id, device_id = %device.id, token_id = %token_id, "paired device");
    Ok(device)
}

/// List a guardian's devices, most recently active first.
pub async fn list(pool: &PgPool, guardian_id: &Uuid) -> Result<Vec<DeviceRow>> {
    let sql = format!(
        "SELECT {DEVICE_COLUMNS} FROM devices \
         WHERE guardian_id = $1 \
         ORDER BY last_active DESC, id DESC"
    );
    let rows = sqlx::query_as::<_, DeviceRow>(&sql)
        .bind(guardian_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Fetch one device owned by the guardian.
pub async fn get(pool: &PgPool, guardian_id: &Uuid, device_id: &Uuid) -> Result<DeviceRow> {
    let sql = format!("SELECT {DEVICE_COLUMNS} FROM devices WHERE id = $1 AND guardian_id = $2");
    sqlx::query_as::<_, DeviceRow>(&sql)
        .bind(device_id)
        .bind(guardian_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(CoreError::device_not_found)
}

/// Compose the detail view: device, content breakdown and recent activity.
///
/// Content stats are best-effort; if they cannot be loaded the breakdowns
/// come back empty. Device and activity failures are errors.
pub async fn details(pool: &PgPool, guardian_id: &Uuid, device_id: &Uuid) -> Result<DeviceDetails> {
    let device = get(pool, guardian_id, device_id).await?;
    let activity = activity::recent(pool, &device.id, DETAIL_ACTIVITY_LIMIT).await?;

    let content_types = match stats::for_token(pool, &device.token_id).await {
        Ok(Some(stats)) => stats.content_types.0,
        Ok(None) => Vec::new(),
        Err(e) => {
            warn!(device_id = %device.id, "content stats unavailable, serving empty breakdown: {e}");
            Vec::new()
        }
    };

    Ok(DeviceDetails {
        blocked_content: telemetry::blocked_content(&content_types),
        time_usage: telemetry::time_usage(&content_types),
        device,
        activity,
    })
}

/// Apply a partial update and refresh `last_active`, even when the patch is
/// empty.
pub async fn update(
    pool: &PgPool,
    guardian_id: &Uuid,
    device_id: &Uuid,
    patch: DevicePatch,
) -> Result<DeviceRow> {
    patch.validate()?;
    let trim = |v: Option<String>| v.map(|s| s.trim().to_string());

    let sql = format!(
        "UPDATE devices \
         SET name = COALESCE($3, name), \
             device_type = COALESCE($4, device_type), \
             risk_score = COALESCE($5, risk_score), \
             total_screen_time = COALESCE($6, total_screen_time), \
             os_version = COALESCE($7, os_version), \
             battery_level = COALESCE($8, battery_level), \
             is_active = COALESCE($9, is_active), \
             connection_type = COALESCE($10, connection_type), \
             owner = COALESCE($11, owner), \
             last_active = now(), \
             updated_at = now() \
         WHERE id = $1 AND guardian_id = $2 \
         RETURNING {DEVICE_COLUMNS}"
    );
    let device = sqlx::query_as::<_, DeviceRow>(&sql)
        .bind(device_id)
        .bind(guardian_id)
        .bind(trim(patch.name))
        .bind(trim(patch.device_type))
        .bind(patch.risk_score)
        .bind(patch.total_screen_time)
        .bind(trim(patch.os_version))
        .bind(patch.battery_level)
        .bind(patch.is_active)
        .bind(patch.connection_type.map(ConnectionType::as_str))
        .bind(trim(patch.owner))
        .fetch_optional(pool)
        .await
        .map_err(|e| CoreError::from_write(e, CoreError::device_not_found))?
        .ok_or_else(CoreError::device_not_found)?;

    Ok(device)
}

/// Delete a device and its activity in one transaction.
pub async fn delete(pool: &PgPool, guardian_id: &Uuid, device_id: &Uuid) -> Result<()> {
    let mut tx = pool.begin().await?;

    let owned = sqlx::query_scalar::<_, Uuid>(
        "SELECT id FROM devices WHERE id = $1 AND guardian_id = $2 FOR UPDATE",
    )
    .bind(device_id)
    .bind(guardian_id)
    .fetch_optional(&mut *tx)
    .await?;

    if owned.is_none() {
        return Err(CoreError::device_not_found());
    }

    let activity_removed = sqlx::query("DELETE FROM activity_logs WHERE device_id = $1")
        .bind(device_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    sqlx::query("DELETE FROM devices WHERE id = $1")
        .bind(device_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    info!(guardian_id = %guardian_id, device_id = %device_id, activity_removed, "deleted device");
    Ok(())
}
