use std::sync::OnceLock;

use crate::jwt::JwtError;
use crate::jwt::TokenConfig;
use crate::jwt::TokenProvider;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password verification and token issuance.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_provider: TokenProvider,
    dummy_hash: OnceLock<Option<String>>,
}

const DUMMY_PASSWORD: &str = "dummy-password-for-unknown-users";

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create an authenticator issuing tokens with the system clock.
    pub fn new(config: TokenConfig) -> Self {
        Self::with_token_provider(TokenProvider::new(config))
    }

    pub fn with_token_provider(token_provider: TokenProvider) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            token_provider,
            dummy_hash: OnceLock::new(),
        }
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify credentials and issue a token bound to `subject`.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `subject` - Username the token is issued to
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored hash could not be parsed
    /// * `JwtError` - Token signing failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        subject: &str,
    ) -> Result<String, AuthenticationError> {
        if !self.password_hasher.verify(password, stored_hash)? {
            return Err(AuthenticationError::InvalidCredentials);
        }

        Ok(self.token_provider.issue(subject)?)
    }

    /// Run one password verification against a throwaway hash.
    ///
    /// Login for an unknown username calls this so it costs the same Argon2
    /// work as a wrong password for a known one.
    pub fn verify_dummy(&self, password: &str) {
        let dummy_hash = self
            .dummy_hash
            .get_or_init(|| self.password_hasher.hash(DUMMY_PASSWORD).ok());

        if let Some(hash) = dummy_hash {
            let _ = self.password_hasher.verify(password, hash);
        }
    }

    /// Whether `token` is currently valid.
    pub fn validate_token(&self, token: &str) -> bool {
        self.token_provider.validate(token)
    }

    /// Remaining validity of `token`; `None` if it is invalid or expired.
    pub fn remaining_lifetime(&self, token: &str) -> Option<std::time::Duration> {
        self.token_provider.remaining_lifetime(token)
    }

    /// Subject of a currently valid token.
    pub fn token_subject(&self, token: &str) -> Result<String, JwtError> {
        self.token_provider.subject(token)
    }
}
