//! Request handlers.

pub mod auth;
pub mod dashboard;
pub mod devices;
pub mod health;
pub mod tokens;

use aegis_core::uuid::parse_id;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Path ids that are not UUIDs are reported as missing entities.
pub(crate) fn path_id(raw: &str, not_found: &str) -> AppResult<Uuid> {
    parse_id(raw).ok_or_else(|| AppError::NotFound(not_found.to_string()))
}
