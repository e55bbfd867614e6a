//! Domain models.
//!
//! Row types map directly onto the SQL schema; wire shapes (camelCase JSON)
//! live in `aegis_api::models`.

pub mod activity;
pub mod auth;
pub mod device;
pub mod stats;
pub mod token;
