//! Dashboard rollups and content breakdowns.
//!
//! The arithmetic is kept in plain functions over slices so the formulas can
//! be checked without a database; the async functions only fetch rows.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::stats::ContentTypeStat;

/// Guardian-level summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_devices: i64,
    /// Minutes across all devices.
    pub total_screen_time: i64,
    /// Rounded mean risk score; 0 when there are no devices.
    pub average_risk_score: i64,
}

impl DashboardStats {
    pub fn formatted_screen_time(&self) -> String {
        format_screen_time(self.total_screen_time)
    }
}

/// Per-device row of the dashboard list.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DeviceSummary {
    pub id: Uuid,
    pub name: String,
    pub risk_score: i32,
    pub last_active: DateTime<Utc>,
    pub is_active: bool,
}

/// "Blocked content" row derived from a content category.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockedContent {
    pub category: String,
    /// Approximation: `round(percentage * 4)`. Not a real event count.
    pub count: i64,
    pub percentage: f64,
}

/// "Time usage" row derived from a content category.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeUsage {
    pub app: String,
    pub category: String,
    pub minutes: i64,
    pub percentage: f64,
}

/// Format minutes as `"{h}h {m}m"`.
pub fn format_screen_time(minutes: i64) -> String {
    let minutes = minutes.max(0);
    format!("{}h {}m", minutes / 60, minutes % 60)
}

/// Date part of a timestamp, `YYYY-MM-DD` (UTC).
pub fn format_date(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d").to_string()
}

/// Clock part of a timestamp, `HH:MM` (UTC, 24h).
pub fn format_clock(ts: DateTime<Utc>) -> String {
    ts.format("%H:%M").to_string()
}

/// Fold `(risk_score, total_screen_time)` pairs into dashboard totals. The
/// screen-time total saturates at `i64::MAX`.
pub fn summarize(devices: &[(i32, i64)]) -> DashboardStats {
    let total_devices = devices.len() as i64;
    let total_screen_time = devices
        .iter()
        .fold(0i64, |acc, (_, minutes)| acc.saturating_add(*minutes));
    let average_risk_score = if devices.is_empty() {
        0
    } else {
        let sum: i64 = devices.iter().map(|(score, _)| i64::from(*score)).sum();
        (sum as f64 / total_devices as f64).round() as i64
    };
    DashboardStats {
        total_devices,
        total_screen_time,
        average_risk_score,
    }
}

/// Estimated blocked-item count for a category share.
pub fn blocked_count(percentage: f64) -> i64 {
    (percentage * 4.0).round() as i64
}

pub fn blocked_content(content_types: &[ContentTypeStat]) -> Vec<BlockedContent> {
    content_types
        .iter()
        .map(|ct| BlockedContent {
            category: ct.name.clone(),
            count: blocked_count(ct.percentage),
            percentage: ct.percentage,
        })
        .collect()
}

pub fn time_usage(content_types: &[ContentTypeStat]) -> Vec<TimeUsage> {
    content_types
        .iter()
        .map(|ct| TimeUsage {
            app: ct.name.clone(),
            category: ct.name.clone(),
            minutes: ct.time_spent,
            percentage: ct.percentage,
        })
        .collect()
}

/// Device count, total screen time and average risk for a guardian.
pub async fn dashboard_stats(pool: &PgPool, guardian_id: &Uuid) -> Result<DashboardStats> {
    let rows = sqlx::query_as::<_, (i32, i64)>(
        "SELECT risk_score, total_screen_time FROM devices WHERE guardian_id = $1",
    )
    .bind(guardian_id)
    .fetch_all(pool)
    .await?;
    Ok(summarize(&rows))
}

/// Reduced device list for the dashboard, most recently active first.
pub async fn dashboard_devices(pool: &PgPool, guardian_id: &Uuid) -> Result<Vec<DeviceSummary>> {
    let rows = sqlx::query_as::<_, DeviceSummary>(
        r#"
        SELECT id, name, risk_score, last_active, is_active
        FROM devices
        WHERE guardian_id = $1
        ORDER BY last_active DESC, id DESC
        "#,
    )
    .bind(guardian_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
