//! Wire types for the HTTP API.
//!
//! Field names are camelCase on the wire. Request bodies use `Option` for
//! every field a client may omit so handlers can tell "absent" from `0` or
//! `false`.

use aegis_core::devices::DeviceDetails;
use aegis_core::models::activity::{ActivityRow, NewActivity};
use aegis_core::models::auth::Guardian;
use aegis_core::models::device::{ConnectionType, DevicePatch, DeviceRow, NewDevice};
use aegis_core::models::stats::{ContentStatsInput, ContentStatsRow, ContentTypeStat};
use aegis_core::models::token::{PairingToken, TokenPatch};
use aegis_core::telemetry::{
    self, BlockedContent, DashboardStats, DeviceSummary, TimeUsage,
};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};
use uuid::Uuid;

fn rfc3339(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Whole-number percentages go out as integers (`40`, not `40.0`).
fn percentage<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.fract() == 0.0 && value.abs() <= 1e15 {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GuardianResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<Guardian> for GuardianResponse {
    fn from(g: Guardian) -> Self {
        Self {
            id: g.id,
            name: g.name,
            email: g.email,
        }
    }
}

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTokenRequest {
    pub expiry_in_days: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTokenRequest {
    pub device_name: Option<String>,
    pub expiry_in_days: Option<i64>,
    pub is_active: Option<bool>,
}

impl From<UpdateTokenRequest> for TokenPatch {
    fn from(req: UpdateTokenRequest) -> Self {
        Self {
            device_name: req.device_name,
            expiry_in_days: req.expiry_in_days,
            is_active: req.is_active,
        }
    }
}

/// Token as shown to the dashboard. Dates are `YYYY-MM-DD` (UTC). Stored
/// fields such as `deviceName` are not projected.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub id: Uuid,
    pub token: String,
    pub is_active: bool,
    pub has_device_connected: bool,
    pub expires_at: String,
    pub created_at: String,
}

impl From<PairingToken> for TokenResponse {
    fn from(t: PairingToken) -> Self {
        Self {
            id: t.id,
            token: t.token,
            is_active: t.is_active,
            has_device_connected: t.has_device_connected,
            expires_at: telemetry::format_date(t.expires_at),
            created_at: telemetry::format_date(t.created_at),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentStatsRequest {
    #[serde(default)]
    pub content_types: Vec<ContentTypeStat>,
    #[serde(default)]
    pub total_time: i64,
    #[serde(default)]
    pub risk_score: i32,
    pub risk_level: Option<String>,
}

impl From<ContentStatsRequest> for ContentStatsInput {
    fn from(req: ContentStatsRequest) -> Self {
        Self {
            content_types: req.content_types,
            total_time: req.total_time,
            risk_score: req.risk_score,
            risk_level: req.risk_level,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentStatsResponse {
    pub id: Uuid,
    pub content_types: Vec<ContentTypeStat>,
    pub total_time: i64,
    pub risk_score: i32,
    pub risk_level: String,
    pub last_updated: String,
}

impl From<ContentStatsRow> for ContentStatsResponse {
    fn from(row: ContentStatsRow) -> Self {
        Self {
            id: row.id,
            content_types: row.content_types.0,
            total_time: row.total_time,
            risk_score: row.risk_score,
            risk_level: row.risk_level,
            last_updated: rfc3339(row.last_updated),
        }
    }
}

// ---------------------------------------------------------------------------
// Devices
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeviceRequest {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub device_type: Option<String>,
    pub token_id: Option<String>,
    pub os_version: Option<String>,
    pub connection_type: Option<String>,
    pub owner: Option<String>,
}

impl From<CreateDeviceRequest> for NewDevice {
    fn from(req: CreateDeviceRequest) -> Self {
        Self {
            name: req.name,
            device_type: req.device_type,
            token_id: req.token_id,
            os_version: req.os_version,
            connection_type: req.connection_type,
            owner: req.owner,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDeviceRequest {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub device_type: Option<String>,
    pub risk_score: Option<i32>,
    pub total_screen_time: Option<i64>,
    pub os_version: Option<String>,
    pub battery_level: Option<i32>,
    pub is_active: Option<bool>,
    pub connection_type: Option<ConnectionType>,
    pub owner: Option<String>,
}

impl From<UpdateDeviceRequest> for DevicePatch {
    fn from(req: UpdateDeviceRequest) -> Self {
        Self {
            name: req.name,
            device_type: req.device_type,
            risk_score: req.risk_score,
            total_screen_time: req.total_screen_time,
            os_version: req.os_version,
            battery_level: req.battery_level,
            is_active: req.is_active,
            connection_type: req.connection_type,
            owner: req.owner,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceResponse {
    pub id: Uuid,
    pub token_id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub device_type: String,
    pub risk_score: i32,
    /// Minutes.
    pub total_screen_time: i64,
    pub battery_level: i32,
    pub connection_type: String,
    pub is_active: bool,
    pub last_active: String,
    pub os_version: String,
    pub owner: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<DeviceRow> for DeviceResponse {
    fn from(d: DeviceRow) -> Self {
        Self {
            id: d.id,
            token_id: d.token_id,
            name: d.name,
            device_type: d.device_type,
            risk_score: d.risk_score,
            total_screen_time: d.total_screen_time,
            battery_level: d.battery_level,
            connection_type: d.connection_type,
            is_active: d.is_active,
            last_active: rfc3339(d.last_active),
            os_version: d.os_version,
            owner: d.owner,
            created_at: rfc3339(d.created_at),
            updated_at: rfc3339(d.updated_at),
        }
    }
}

/// Device block of the detail view. Screen time is pre-formatted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceDetailInfo {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub device_type: String,
    pub risk_score: i32,
    pub last_active: String,
    pub total_screen_time: String,
    pub os_version: String,
    pub battery_level: i32,
    pub is_active: bool,
    pub connection_type: String,
    pub owner: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BlockedContentEntry {
    pub category: String,
    pub count: i64,
    #[serde(serialize_with = "percentage")]
    pub percentage: f64,
}

impl From<BlockedContent> for BlockedContentEntry {
    fn from(b: BlockedContent) -> Self {
        Self {
            category: b.category,
            count: b.count,
            percentage: b.percentage,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TimeUsageEntry {
    pub app: String,
    pub category: String,
    pub minutes: i64,
    #[serde(serialize_with = "percentage")]
    pub percentage: f64,
}

impl From<TimeUsage> for TimeUsageEntry {
    fn from(t: TimeUsage) -> Self {
        Self {
            app: t.app,
            category: t.category,
            minutes: t.minutes,
            percentage: t.percentage,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLogEntry {
    /// `HH:MM`, UTC.
    pub time: String,
    pub action: String,
    pub risk_level: String,
    pub details: String,
}

impl From<ActivityRow> for ActivityLogEntry {
    fn from(a: ActivityRow) -> Self {
        Self {
            time: telemetry::format_clock(a.occurred_at),
            action: a.action,
            risk_level: a.risk_level,
            details: a.details,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceDetailResponse {
    pub device: DeviceDetailInfo,
    pub blocked_content: Vec<BlockedContentEntry>,
    pub activity_logs: Vec<ActivityLogEntry>,
    pub time_usage: Vec<TimeUsageEntry>,
}

impl From<DeviceDetails> for DeviceDetailResponse {
    fn from(details: DeviceDetails) -> Self {
        let d = details.device;
        Self {
            device: DeviceDetailInfo {
                id: d.id,
                name: d.name,
                device_type: d.device_type,
                risk_score: d.risk_score,
                last_active: rfc3339(d.last_active),
                total_screen_time: telemetry::format_screen_time(d.total_screen_time),
                os_version: d.os_version,
                battery_level: d.battery_level,
                is_active: d.is_active,
                connection_type: d.connection_type,
                owner: d.owner,
            },
            blocked_content: details.blocked_content.into_iter().map(Into::into).collect(),
            activity_logs: details.activity.into_iter().map(Into::into).collect(),
            time_usage: details.time_usage.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendActivityRequest {
    pub time: Option<DateTime<Utc>>,
    pub action: Option<String>,
    pub risk_level: Option<String>,
    pub details: Option<String>,
}

impl From<AppendActivityRequest> for NewActivity {
    fn from(req: AppendActivityRequest) -> Self {
        Self {
            time: req.time,
            action: req.action,
            risk_level: req.risk_level,
            details: req.details,
        }
    }
}

/// Stored activity entry, as returned by the append endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityResponse {
    pub id: Uuid,
    pub device_id: Uuid,
    pub time: String,
    pub action: String,
    pub risk_level: String,
    pub details: String,
}

impl From<ActivityRow> for ActivityResponse {
    fn from(a: ActivityRow) -> Self {
        Self {
            id: a.id,
            device_id: a.device_id,
            time: rfc3339(a.occurred_at),
            action: a.action,
            risk_level: a.risk_level,
            details: a.details,
        }
    }
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStatsResponse {
    pub total_devices: i64,
    /// `"{h}h {m}m"`.
    pub total_screen_time: String,
    pub average_risk_score: i64,
}

impl From<DashboardStats> for DashboardStatsResponse {
    fn from(s: DashboardStats) -> Self {
        Self {
            total_devices: s.total_devices,
            total_screen_time: s.formatted_screen_time(),
            average_risk_score: s.average_risk_score,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardDeviceEntry {
    pub id: Uuid,
    pub name: String,
    pub risk_score: i32,
    /// `YYYY-MM-DD`, UTC.
    pub last_active: String,
    pub is_active: bool,
}

impl From<DeviceSummary> for DashboardDeviceEntry {
    fn from(d: DeviceSummary) -> Self {
        Self {
            id: d.id,
            name: d.name,
            risk_score: d.risk_score,
            last_active: telemetry::format_date(d.last_active),
            is_active: d.is_active,
        }
    }
}

// ---------------------------------------------------------------------------
// Misc
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub db_connected: bool,
}
