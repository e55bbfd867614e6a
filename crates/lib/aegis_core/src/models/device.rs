//! Device models.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;

/// Placeholder for free-text device fields the companion did not report.
pub const UNKNOWN: &str = "Unknown";

/// How a device reaches the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConnectionType {
    #[serde(rename = "Wi-Fi")]
    WiFi,
    Cellular,
    Ethernet,
    #[default]
    Unknown,
}

impl ConnectionType {
    pub fn as_str(self) -> &'static str {
        match self {
            ConnectionType::WiFi => "Wi-Fi",
            ConnectionType::Cellular => "Cellular",
            ConnectionType::Ethernet => "Ethernet",
            ConnectionType::Unknown => UNKNOWN,
        }
    }
}

impl fmt::Display for ConnectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConnectionType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Wi-Fi" => Ok(ConnectionType::WiFi),
            "Cellular" => Ok(ConnectionType::Cellular),
            "Ethernet" => Ok(ConnectionType::Ethernet),
            "Unknown" => Ok(ConnectionType::Unknown),
            other => Err(CoreError::Validation(format!(
                "Invalid connectionType '{other}': expected one of Wi-Fi, Cellular, Ethernet, Unknown"
            ))),
        }
    }
}

/// Row returned by device queries.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DeviceRow {
    pub id: Uuid,
    pub guardian_id: Uuid,
    pub token_id: Uuid,
    pub name: String,
    pub device_type: String,
    pub risk_score: i32,
    /// Minutes.
    pub total_screen_time: i64,
    pub battery_level: i32,
    pub connection_type: String,
    pub is_active: bool,
    pub last_active: DateTime<Utc>,
    pub os_version: String,
    pub owner: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for pairing a new device. Required fields are still optional here so
/// that missing values surface as validation errors rather than decode errors.
#[derive(Debug, Clone, Default)]
pub struct NewDevice {
    pub name: Option<String>,
    pub device_type: Option<String>,
    pub token_id: Option<String>,
    pub os_version: Option<String>,
    pub connection_type: Option<String>,
    pub owner: Option<String>,
}

/// Partial device update. `None` leaves the field untouched; `Some(0)` and
/// `Some(false)` are applied like any other value.
#[derive(Debug, Clone, Default)]
pub struct DevicePatch {
    pub name: Option<String>,
    pub device_type: Option<String>,
    pub risk_score: Option<i32>,
    pub total_screen_time: Option<i64>,
    pub os_version: Option<String>,
    pub battery_level: Option<i32>,
    pub is_active: Option<bool>,
    pub connection_type: Option<ConnectionType>,
    pub owner: Option<String>,
}

impl DevicePatch {
    /// Check ranges and non-empty strings before touching the store.
    pub fn validate(&self) -> Result<(), CoreError> {
        if let Some(score) = self.risk_score
            && !(0..=100).contains(&score)
        {
            return Err(CoreError::Validation(
                "riskScore must be between 0 and 100".into(),
            ));
        }
        if let Some(level) = self.battery_level
            && !(0..=100).contains(&level)
        {
            return Err(CoreError::Validation(
                "batteryLevel must be between 0 and 100".into(),
            ));
        }
        if let Some(minutes) = self.total_screen_time
            && minutes < 0
        {
            return Err(CoreError::Validation(
                "totalScreenTime must not be negative".into(),
            ));
        }
        for (field, value) in [("name", &self.name), ("type", &self.device_type)] {
            if let Some(v) = value
                && v.trim().is_empty()
            {
                return Err(CoreError::Validation(format!("{field} must not be empty")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_type_parses_known_values() {
        assert_eq!("Wi-Fi".parse::<ConnectionType>().unwrap(), ConnectionType::WiFi);
        assert_eq!(
            "Cellular".parse::<ConnectionType>().unwrap(),
            ConnectionType::Cellular
        );
        assert_eq!(
            "Ethernet".parse::<ConnectionType>().unwrap(),
            ConnectionType::Ethernet
        );
        assert_eq!(
            "Unknown".parse::<ConnectionType>().unwrap(),
            ConnectionType::Unknown
        );
    }

    #[test]
    fn connection_type_rejects_unknown_spelling() {
        let err = "wifi".parse::<ConnectionType>().unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn connection_type_serializes_with_hyphen() {
        let json = serde_json::to_string(&ConnectionType::WiFi).unwrap();
        assert_eq!(json, "\"Wi-Fi\"");
        assert_eq!(ConnectionType::default().as_str(), "Unknown");
    }

    #[test]
    fn patch_accepts_zero_and_bounds() {
        let patch = DevicePatch {
            risk_score: Some(0),
            battery_level: Some(100),
            total_screen_time: Some(0),
            is_active: Some(false),
            ..Default::default()
        };
        assert!(patch.validate().is_ok());
    }

    #[test]
    fn patch_rejects_out_of_range_values() {
        for patch in [
            DevicePatch {
                risk_score: Some(101),
                ..Default::default()
            },
            DevicePatch {
                risk_score: Some(-1),
                ..Default::default()
            },
            DevicePatch {
                battery_level: Some(120),
                ..Default::default()
            },
            DevicePatch {
                total_screen_time: Some(-5),
                ..Default::default()
            },
            DevicePatch {
                name: Some("   ".into()),
                ..Default::default()
            },
        ] {
            assert!(matches!(patch.validate(), Err(CoreError::Validation(_))));
        }
    }
}
