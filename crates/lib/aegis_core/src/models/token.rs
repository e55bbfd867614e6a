//! Pairing token models.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A pairing token together with its derived `has_device_connected` flag.
///
/// `has_device_connected` is computed at query time (`EXISTS` over
/// `devices`) and never stored.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PairingToken {
    pub id: Uuid,
    pub token: String,
    pub guardian_id: Uuid,
    pub device_name: Option<String>,
    pub content_stats_id: Option<Uuid>,
    pub expires_at: DateTime<Utc>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub has_device_connected: bool,
}

impl PairingToken {
    /// A token can be used for pairing iff it is active and not yet expired.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.expires_at > now
    }

    /// Validity against the current wall clock.
    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }
}

/// Partial update for a token. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct TokenPatch {
    pub device_name: Option<String>,
    /// Resets expiry to now + N days (not added to the current expiry).
    pub expiry_in_days: Option<i64>,
    pub is_active: Option<bool>,
}
