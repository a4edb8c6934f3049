//! Stateless operator session tokens.
//!
//! A token is the standard base64 encoding of `identity:issued_at_ms:tag`,
//! where `tag` is a keyed BLAKE3 hash of `identity:issued_at_ms` under a key
//! derived from the operator secret. Validation needs nothing but the token,
//! the clock and the operator config, so there is no session table and no
//! server-side revocation.

use crate::types::OperatorCredentials;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use error::AuthError;
use std::time::{Duration, SystemTime};

pub mod error {
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum AuthError {
        #[error("Invalid credentials")]
        InvalidCredentials,
    }
}

const KEY_CONTEXT: &str = "showcase 2025-01 operator session token v1";

/// The facts carried by a valid token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub identity: String,
    /// Milliseconds since the Unix epoch at login.
    pub issued_at_ms: u64,
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub session: Session,
}

pub struct CredentialIssuer {
    operator: OperatorCredentials,
    ttl: Duration,
    mac_key: [u8; 32],
}

impl CredentialIssuer {
    pub fn new(operator: OperatorCredentials, ttl: Duration) -> Self {
        let mac_key = blake3::derive_key(KEY_CONTEXT, operator.secret.as_bytes());
        Self {
            operator,
            ttl,
            mac_key,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Checks the claimed identity/secret against the operator pair and mints
    /// a token stamped with `now`.
    pub fn issue(
        &self,
        identity: &str,
        secret: &str,
        now: SystemTime,
    ) -> Result<IssuedToken, AuthError> {
        if identity != self.operator.identity || secret != self.operator.secret {
            tracing::warn!(identity, "operator login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        let issued_at_ms = unix_millis(now);
        let payload = format!("{identity}:{issued_at_ms}");
        let tag = self.tag(&payload);
        let token = STANDARD.encode(format!("{payload}:{}", tag.to_hex()));

        tracing::info!(identity, issued_at_ms, "operator session issued");
        Ok(IssuedToken {
            token,
            session: Session {
                identity: identity.to_string(),
                issued_at_ms,
            },
        })
    }

    pub fn validate(&self, token: &str, now: SystemTime) -> bool {
        self.session(token, now).is_some()
    }

    /// Decodes and verifies a token. Returns `None` for anything malformed,
    /// forged, foreign or expired; never errors.
    ///
    /// A token is still valid when exactly `ttl` has elapsed. Tokens stamped
    /// ahead of `now` count as zero elapsed.
    pub fn session(&self, token: &str, now: SystemTime) -> Option<Session> {
        let decoded = STANDARD.decode(token).ok()?;
        let decoded = String::from_utf8(decoded).ok()?;

        let (payload, tag_hex) = decoded.rsplit_once(':')?;
        // Only the canonical lowercase tag is accepted.
        let tag = blake3::Hash::from_hex(tag_hex).ok()?;
        if tag != self.tag(payload) || tag.to_hex().as_str() != tag_hex {
            return None;
        }

        let (identity, timestamp) = payload.rsplit_once(':')?;
        if identity != self.operator.identity {
            return None;
        }
        let issued_at_ms: u64 = timestamp.parse().ok()?;

        let elapsed_ms = unix_millis(now).saturating_sub(issued_at_ms);
        if u128::from(elapsed_ms) > self.ttl.as_millis() {
            return None;
        }

        Some(Session {
            identity: identity.to_string(),
            issued_at_ms,
        })
    }

    fn tag(&self, payload: &str) -> blake3::Hash {
        blake3::keyed_hash(&self.mac_key, payload.as_bytes())
    }
}

/// Milliseconds since the Unix epoch, clamped to zero for pre-epoch clocks.
pub fn unix_millis(time: SystemTime) -> u64 {
    time.duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}
