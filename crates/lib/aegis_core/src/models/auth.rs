//! Identity domain models.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A guardian account (the parent/administrator owning tokens and devices).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Guardian {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

/// Guardian row including the credential hash, for login only.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GuardianCredentials {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub password_hash: String,
}

impl From<GuardianCredentials> for Guardian {
    fn from(row: GuardianCredentials) -> Self {
        Self {
            id: row.id,
            email: row.email,
            name: row.name,
        }
    }
}

/// Claims carried by the session JWT.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Guardian id.
    pub sub: String,
    /// Guardian email.
    pub email: String,
    /// Expiry (unix timestamp).
    pub exp: i64,
    /// Issued at (unix timestamp).
    pub iat: i64,
}
