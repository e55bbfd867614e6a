//! # aegis_core
//!
//! Core domain logic for Aegis: guardian identity, pairing tokens, the device
//! registry, activity logs and telemetry rollups.
//!
//! Every operation takes the acting guardian's id explicitly and scopes its
//! queries by it.

pub mod activity;
pub mod auth;
pub mod devices;
pub mod error;
pub mod migrate;
pub mod models;
pub mod stats;
pub mod telemetry;
pub mod tokens;
pub mod uuid;

pub use error::{CoreError, Result};

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_not_empty() {
        assert!(!version().is_empty());
    }
}
