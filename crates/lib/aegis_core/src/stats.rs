//! Content statistics attached to pairing tokens.
//!
//! The records are produced by an external content analyzer; this module
//! stores what it pushes and reads it back for the telemetry views.

use sqlx::PgPool;
use sqlx::types::Json;
use tracing::info;
use uuid::Uuid;

use crate::error::{CoreError, Result};
use crate::models::activity::RiskLevel;
use crate::models::stats::{ContentStatsInput, ContentStatsRow};
use crate::uuid::uuidv7;

/// Reject payloads the schema would refuse, with a readable message.
fn validate(input: &ContentStatsInput) -> Result<RiskLevel> {
    if input.total_time < 0 {
        return Err(CoreError::Validation("totalTime must not be negative".into()));
    }
    if !(0..=100).contains(&input.risk_score) {
        return Err(CoreError::Validation(
            "riskScore must be between 0 and 100".into(),
        ));
    }
    for ct in &input.content_types {
        if ct.name.trim().is_empty() {
            return Err(CoreError::Validation(
                "contentTypes[].name must not be empty".into(),
            ));
        }
        if !ct.percentage.is_finite() || !(0.0..=100.0).contains(&ct.percentage) {
            return Err(CoreError::Validation(format!(
                "percentage for '{}' must be between 0 and 100",
                ct.name
            )));
        }
        if ct.time_spent < 0 {
            return Err(CoreError::Validation(format!(
                "timeSpent for '{}' must not be negative",
                ct.name
            )));
        }
    }
    match input.risk_level.as_deref() {
        Some(raw) => raw.parse(),
        None => Ok(RiskLevel::default()),
    }
}

/// Stats attached to a token, if any.
pub async fn for_token(pool: &PgPool, token_id: &Uuid) -> Result<Option<ContentStatsRow>> {
    let row = sqlx::query_as::<_, ContentStatsRow>(
        r#"
        SELECT s.id, s.content_types, s.total_time, s.risk_score, s.risk_level, s.last_updated
        FROM content_stats s
        JOIN pairing_tokens t ON t.content_stats_id = s.id
        WHERE t.id = $1
        "#,
    )
    .bind(token_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Create or replace the stats attached to a token the guardian owns.
pub async fn upsert_for_token(
    pool: &PgPool,
    guardian_id: &Uuid,
    token_id: &Uuid,
    input: ContentStatsInput,
) -> Result<ContentStatsRow> {
    let risk_level = validate(&input)?;
    let mut tx = pool.begin().await?;

    let attached = sqlx::query_scalar::<_, Option<Uuid>>(
        "SELECT content_stats_id FROM pairing_tokens \
         WHERE id = $1 AND guardian_id = $2 FOR UPDATE",
    )
    .bind(token_id)
    .bind(guardian_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(CoreError::token_not_found)?;

    let row = match attached {
        Some(stats_id) => {
            sqlx::query_as::<_, ContentStatsRow>(
                r#"
                UPDATE content_stats
                SET content_types = $2, total_time = $3, risk_score = $4,
                    risk_level = $5, last_updated = now()
                WHERE id = $1
                RETURNING id, content_types, total_time, risk_score, risk_level, last_updated
                "#,
            )
            .bind(stats_id)
            .bind(Json(&input.content_types))
            .bind(input.total_time)
            .bind(input.risk_score)
            .bind(risk_level.as_str())
            .fetch_one(&mut *tx)
            .await?
        }
        None => {
            let row = sqlx::query_as::<_, ContentStatsRow>(
                r#"
                INSERT INTO content_stats (id, content_types, total_time, risk_score, risk_level)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id, content_types, total_time, risk_score, risk_level, last_updated
                "#,
            )
            .bind(uuidv7())
            .bind(Json(&input.content_types))
            .bind(input.total_time)
            .bind(input.risk_score)
            .bind(risk_level.as_str())
            .fetch_one(&mut *tx)
            .await?;

            sqlx::query(
                "UPDATE pairing_tokens SET content_stats_id = $1, updated_at = now() WHERE id = $2",
            )
            .bind(row.id)
            .bind(token_id)
            .execute(&mut *tx)
            .await?;

            row
        }
    };

    tx.commit().await?;

    info!(guardian_id = %guardian_id, token_id = %token_id, stats_id = %row.id, "stored content stats");
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::stats::ContentTypeStat;

    fn input(percentage: f64, time_spent: i64) -> ContentStatsInput {
        ContentStatsInput {
            content_types: vec![ContentTypeStat {
                name: "Social Media".into(),
                percentage,
                time_spent,
            }],
            total_time: 120,
            risk_score: 40,
            risk_level: Some("medium".into()),
        }
    }

    #[test]
    fn valid_payload_passes() {
        assert_eq!(validate(&input(40.0, 120)).unwrap(), RiskLevel::Medium);
    }

    #[test]
    fn missing_risk_level_defaults_to_low() {
        let mut payload = input(10.0, 5);
        payload.risk_level = None;
        assert_eq!(validate(&payload).unwrap(), RiskLevel::Low);
    }

    #[test]
    fn out_of_range_payloads_fail() {
        assert!(validate(&input(140.0, 10)).is_err());
        assert!(validate(&input(f64::NAN, 10)).is_err());
        assert!(validate(&input(10.0, -1)).is_err());

        let mut payload = input(10.0, 5);
        payload.risk_score = 101;
        assert!(validate(&payload).is_err());

        let mut payload = input(10.0, 5);
        payload.risk_level = Some("severe".into());
        assert!(validate(&payload).is_err());
    }
}
