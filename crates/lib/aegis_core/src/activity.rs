//! Per-device activity log. Append-only; read newest first.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{CoreError, Result};
use crate::models::activity::{ActivityRow, NewActivity, RiskLevel};
use crate::uuid::uuidv7;

/// Number of entries shown in a device detail view.
pub const DETAIL_ACTIVITY_LIMIT: i64 = 50;

/// Append one entry to a device the guardian owns.
pub async fn append(
    pool: &PgPool,
    guardian_id: &Uuid,
    device_id: &Uuid,
    input: NewActivity,
) -> Result<ActivityRow> {
    let action = input.action.as_deref().map(str::trim).unwrap_or_default();
    let details = input.details.as_deref().map(str::trim).unwrap_or_default();
    if action.is_empty() || details.is_empty() {
        return Err(CoreError::Validation(
            "action and details are required".into(),
        ));
    }
    let risk_level = match input.risk_level.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => raw.parse::<RiskLevel>()?,
        _ => RiskLevel::default(),
    };
    let occurred_at = input.time.unwrap_or_else(Utc::now);

    sqlx::query_as::<_, ActivityRow>(
        r#"
        INSERT INTO activity_logs (id, device_id, occurred_at, action, risk_level, details)
        SELECT $1, d.id, $4, $5, $6, $7
        FROM devices d
        WHERE d.id = $2 AND d.guardian_id = $3
        RETURNING id, device_id, occurred_at, action, risk_level, details, created_at
        "#,
    )
    .bind(uuidv7())
    .bind(device_id)
    .bind(guardian_id)
    .bind(occurred_at)
    .bind(action)
    .bind(risk_level.as_str())
    .bind(details)
    .fetch_optional(pool)
    .await
    .map_err(|e| CoreError::from_write(e, CoreError::device_not_found))?
    .ok_or_else(CoreError::device_not_found)
}

/// Most recent entries for a device, newest first.
///
/// Not ownership-scoped: callers resolve the device through
/// `devices::get` first.
pub async fn recent(pool: &PgPool, device_id: &Uuid, limit: i64) -> Result<Vec<ActivityRow>> {
    let rows = sqlx::query_as::<_, ActivityRow>(
        r#"
        SELECT id, device_id, occurred_at, action, risk_level, details, created_at
        FROM activity_logs
        WHERE device_id = $1
        ORDER BY occurred_at DESC, id DESC
        LIMIT $2
        "#,
    )
    .bind(device_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
