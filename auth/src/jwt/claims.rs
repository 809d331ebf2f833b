use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use super::errors::JwtError;

/// Session token claims.
///
/// Registered RFC 7519 claims only: the subject is the username the token
/// was issued to, and `jti` keeps tokens issued within the same second distinct.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,

    /// Issued at (Unix timestamp, seconds)
    pub iat: i64,

    /// Expiration time (Unix timestamp, seconds)
    pub exp: i64,

    /// JWT ID (unique token identifier)
    pub jti: String,
}

impl Claims {
    /// Create claims for a subject valid for `validity` from `issued_at`.
    ///
    /// # Arguments
    /// * `subject` - Username the token is bound to
    /// * `issued_at` - Issuance instant
    /// * `validity` - Length of the validity window
    ///
    /// # Returns
    /// Claims with sub, iat, exp and a random jti set
    ///
    /// # Errors
    /// * `EncodingFailed` - Expiration falls outside the representable date range
    pub fn for_subject(
        subject: impl ToString,
        issued_at: DateTime<Utc>,
        validity: Duration,
    ) -> Result<Self, JwtError> {
        let expiration = issued_at.checked_add_signed(validity).ok_or_else(|| {
            JwtError::EncodingFailed("expiration is out of range".to_string())
        })?;

        Ok(Self {
            sub: subject.to_string(),
            iat: issued_at.timestamp(),
            exp: expiration.timestamp(),
            jti: Uuid::new_v4().to_string(),
        })
    }

    /// Expiration as milliseconds since the Unix epoch.
    pub fn expires_at_millis(&self) -> i64 {
        self.exp.saturating_mul(1000)
    }

    /// Check if the token is expired at `now`.
    ///
    /// A token is expired from the exact instant of its `exp` onwards.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.remaining(now).is_none()
    }

    /// Time left until expiration, or `None` once expired.
    pub fn remaining(&self, now: DateTime<Utc>) -> Option<std::time::Duration> {
        let remaining_ms = self.expires_at_millis() - now.timestamp_millis();
        if remaining_ms > 0 {
            Some(std::time::Duration::from_millis(remaining_ms as u64))
        } else {
            None
        }
    }
}
