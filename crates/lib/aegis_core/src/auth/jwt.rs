//! Session token issuance and verification (HS256).

use std::path::PathBuf;

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::distr::Alphanumeric;
use rand::{Rng, rng};
use tracing::{info, warn};
use uuid::Uuid;

use super::AuthError;
use crate::models::auth::SessionClaims;

/// Session lifetime: 7 days.
pub const SESSION_EXPIRY_DAYS: i64 = 7;

/// Sign a session token for a guardian.
pub fn generate_session_token(
    guardian_id: &Uuid,
    email: &str,
    secret: &[u8],
) -> Result<String, AuthError> {
    let now = Utc::now();
    let claims = SessionClaims {
        sub: guardian_id.to_string(),
        email: email.to_string(),
        exp: (now + Duration::days(SESSION_EXPIRY_DAYS)).timestamp(),
        iat: now.timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|e| AuthError::TokenError(format!("jwt encode: {e}")))
}

/// Verify a session token. `None` for bad signatures, expired tokens and
/// subjects that are not guardian ids.
pub fn verify_session_token(token: &str, secret: &[u8]) -> Option<(Uuid, SessionClaims)> {
    let key = DecodingKey::from_secret(secret);
    let claims = decode::<SessionClaims>(token, &key, &Validation::default())
        .ok()?
        .claims;
    let guardian_id = Uuid::parse_str(&claims.sub).ok()?;
    Some((guardian_id, claims))
}

/// Resolve the signing secret: `JWT_SECRET` → `AUTH_SECRET` → persisted file,
/// generating and persisting one on first run.
pub fn resolve_jwt_secret() -> String {
    for var in ["JWT_SECRET", "AUTH_SECRET"] {
        if let Ok(secret) = std::env::var(var)
            && !secret.is_empty()
        {
            return secret;
        }
    }

    let secret_path = jwt_secret_path();
    if let Ok(existing) = std::fs::read_to_string(&secret_path) {
        let trimmed = existing.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let secret: String = rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect();
    let persisted = secret_path
        .parent()
        .map_or(Ok(()), std::fs::create_dir_all)
        .and_then(|()| std::fs::write(&secret_path, &secret));
    match persisted {
        Ok(()) => info!(path = %secret_path.display(), "generated new JWT secret"),
        Err(e) => warn!(path = %secret_path.display(), "JWT secret not persisted, sessions end on restart: {e}"),
    }
    secret
}

/// `$DATA_DIR/aegis/jwt-secret`.
fn jwt_secret_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("aegis")
        .join("jwt-secret")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret";

    #[test]
    fn session_token_round_trips() {
        let id = Uuid::new_v4();
        let token = generate_session_token(&id, "parent@example.com", SECRET).unwrap();
        let (guardian_id, claims) = verify_session_token(&token, SECRET).expect("valid token");
        assert_eq!(guardian_id, id);
        assert_eq!(claims.email, "parent@example.com");
        assert_eq!(claims.exp - claims.iat, SESSION_EXPIRY_DAYS * 24 * 60 * 60);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = generate_session_token(&Uuid::new_v4(), "a@b.c", SECRET).unwrap();
        assert!(verify_session_token(&token, b"other-secret").is_none());
    }

    #[test]
    fn expired_token_is_rejected() {
        let past = Utc::now() - Duration::days(30);
        let claims = SessionClaims {
            sub: Uuid::new_v4().to_string(),
            email: "a@b.c".into(),
            exp: (past + Duration::days(1)).timestamp(),
            iat: past.timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();
        assert!(verify_session_token(&token, SECRET).is_none());
    }

    #[test]
    fn non_uuid_subject_is_rejected() {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: "admin".into(),
            email: "a@b.c".into(),
            exp: (now + Duration::hours(1)).timestamp(),
            iat: now.timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();
        assert!(verify_session_token(&token, SECRET).is_none());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(verify_session_token("not.a.jwt", SECRET).is_none());
    }
}
