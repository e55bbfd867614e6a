//! API server configuration.

use aegis_core::auth::jwt::resolve_jwt_secret;
use aegis_core::devices::PairingMode;

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:5000").
    pub bind_addr: String,
    /// PostgreSQL connection URL.
    pub pg_connection_url: String,
    /// Session JWT signing secret.
    pub jwt_secret: String,
    /// Require pairing tokens to be active and unexpired, not just owned.
    pub strict_pairing: bool,
    /// Mark the session cookie `Secure` (HTTPS deployments).
    pub secure_cookies: bool,
    /// Dashboard origin allowed to send credentialed requests. `None` allows
    /// any origin without credentials.
    pub cors_origin: Option<String>,
}

impl ApiConfig {
    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable                       | Default                            |
    /// |--------------------------------|------------------------------------|
    /// | `BIND_ADDR`                    | `127.0.0.1:5000`                   |
    /// | `DATABASE_URL`                 | `postgres://localhost:5432/aegis`  |
    /// | `JWT_SECRET` / `AUTH_SECRET`   | generated & persisted to file      |
    /// | `AEGIS_STRICT_PAIRING`         | `false`                            |
    /// | `AEGIS_SECURE_COOKIES`         | `false`                            |
    /// | `FRONTEND_URL`                 | unset                              |
    pub fn from_env() -> Self {
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:5000".into()),
            pg_connection_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost:5432/aegis".into()),
            jwt_secret: resolve_jwt_secret(),
            strict_pairing: env_flag("AEGIS_STRICT_PAIRING"),
            secure_cookies: env_flag("AEGIS_SECURE_COOKIES"),
            cors_origin: std::env::var("FRONTEND_URL").ok().filter(|s| !s.is_empty()),
        }
    }

    pub fn pairing_mode(&self) -> PairingMode {
        if self.strict_pairing {
            PairingMode::Strict
        } else {
            PairingMode::Loose
        }
    }
}

/// `1`, `true`, `yes` and `on` (any case) count as set.
fn env_flag(name: &str) -> bool {
    std::env::var(name).is_ok_and(|v| parse_flag(&v))
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
