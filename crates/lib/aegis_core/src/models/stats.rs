//! Content statistics models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;

/// One content category in a stats rollup. Stored as JSONB, so the field
/// names follow the analyzer's camelCase payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentTypeStat {
    pub name: String,
    #[serde(default)]
    pub percentage: f64,
    /// Minutes.
    #[serde(default)]
    pub time_spent: i64,
}

/// Row returned by content-stats queries.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ContentStatsRow {
    pub id: Uuid,
    pub content_types: Json<Vec<ContentTypeStat>>,
    pub total_time: i64,
    pub risk_score: i32,
    pub risk_level: String,
    pub last_updated: DateTime<Utc>,
}

/// Replacement payload pushed by the content analyzer.
#[derive(Debug, Clone, Default)]
pub struct ContentStatsInput {
    pub content_types: Vec<ContentTypeStat>,
    pub total_time: i64,
    pub risk_score: i32,
    pub risk_level: Option<String>,
}
