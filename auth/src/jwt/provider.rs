use std::sync::Arc;

use chrono::Duration;
use chrono::Utc;

use super::claims::Claims;
use super::clock::Clock;
use super::clock::SystemClock;
use super::errors::JwtError;
use super::handler::JwtHandler;

/// Immutable token settings, loaded once at startup.
#[derive(Clone)]
pub struct TokenConfig {
    secret: Vec<u8>,
    validity: Duration,
}

impl TokenConfig {
    /// Minimum HS256 secret length in bytes.
    pub const MIN_SECRET_LENGTH: usize = 32;

    /// Build token settings from a signing secret and a validity window.
    ///
    /// # Errors
    /// * `InvalidKey` - Secret is shorter than 32 bytes
    /// * `InvalidValidity` - Validity window is zero or negative, or an
    ///   expiration that far ahead is not representable
    pub fn new(secret: impl Into<Vec<u8>>, validity: Duration) -> Result<Self, JwtError> {
        let secret = secret.into();
        if secret.len() < Self::MIN_SECRET_LENGTH {
            return Err(JwtError::InvalidKey(format!(
                "secret must be at least {} bytes, got {}",
                Self::MIN_SECRET_LENGTH,
                secret.len()
            )));
        }
        if validity <= Duration::zero() {
            return Err(JwtError::InvalidValidity(format!(
                "validity must be positive, got {}ms",
                validity.num_milliseconds()
            )));
        }
        if Utc::now().checked_add_signed(validity).is_none() {
            return Err(JwtError::InvalidValidity(format!(
                "validity of {}s reaches past the latest representable date",
                validity.num_seconds()
            )));
        }

        Ok(Self { secret, validity })
    }

    pub fn validity(&self) -> Duration {
        self.validity
    }
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"<redacted>")
            .field("validity", &self.validity)
            .finish()
    }
}

/// Issues and validates session tokens.
///
/// A token is valid while its signature verifies and the clock is strictly
/// before its `exp`. Validation never fails loudly: malformed, forged and
/// expired tokens all report as invalid.
pub struct TokenProvider {
    handler: JwtHandler,
    validity: Duration,
    clock: Arc<dyn Clock>,
}

impl TokenProvider {
    /// Create a provider backed by the system clock.
    pub fn new(config: TokenConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a provider reading time from `clock`.
    pub fn with_clock(config: TokenConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            handler: JwtHandler::new(&config.secret),
            validity: config.validity,
            clock,
        }
    }

    /// Issue a signed token bound to `subject`, expiring one validity window from now.
    ///
    /// # Errors
    /// * `EncodingFailed` - Expiration is out of range or token signing failed
    pub fn issue(&self, subject: &str) -> Result<String, JwtError> {
        let claims = Claims::for_subject(subject, self.clock.now(), self.validity)?;
        self.handler.encode(&claims)
    }

    /// Whether `token` is currently valid (signature and expiry).
    pub fn validate(&self, token: &str) -> bool {
        self.claims(token).is_ok()
    }

    /// Time until `token` expires, or `None` when it is invalid or already expired.
    pub fn remaining_lifetime(&self, token: &str) -> Option<std::time::Duration> {
        self.claims(token)
            .ok()
            .and_then(|claims| claims.remaining(self.clock.now()))
    }

    /// Subject of a currently valid token.
    ///
    /// # Errors
    /// * `DecodingFailed` - Token is malformed or its signature does not verify
    /// * `TokenExpired` - Token is past its expiration
    pub fn subject(&self, token: &str) -> Result<String, JwtError> {
        self.claims(token).map(|claims| claims.sub)
    }

    fn claims(&self, token: &str) -> Result<Claims, JwtError> {
        let claims: Claims = self.handler.decode(token)?;
        if claims.is_expired(self.clock.now()) {
            return Err(JwtError::TokenExpired);
        }
        Ok(claims)
    }
}
