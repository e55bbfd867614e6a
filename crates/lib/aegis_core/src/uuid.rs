//! Identifier helpers.
//!
//! Tokens, devices, activity entries and stats use UUIDv7 generated app-side
//! so that ids sort by creation time and can break ordering ties. Guardians
//! use PostgreSQL's `gen_random_uuid()`.

use uuid::Uuid;

/// Generate a new UUIDv7 (timestamp-sortable).
pub fn uuidv7() -> Uuid {
    Uuid::now_v7()
}

/// Parse a caller-supplied id. `None` for anything that is not a UUID, so
/// callers can report it exactly like a missing entity.
pub fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}
