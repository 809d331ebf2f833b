use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use chrono::Utc;

use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::user::errors::UserError;
use crate::user::ports::AuthServicePort;
use crate::user::ports::RevocationStore;
use crate::user::ports::UserRepository;

/// Value stored against a revoked token in the denylist.
pub const LOGOUT_MARKER: &str = "logout";

/// Domain service implementation for registration and session lifecycle.
///
/// Concrete implementation of AuthServicePort with dependency injection.
pub struct AuthService<UR, RS>
where
    UR: UserRepository,
    RS: RevocationStore,
{
    repository: Arc<UR>,
    revocation_store: Arc<RS>,
    authenticator: Arc<Authenticator>,
}

impl<UR, RS> AuthService<UR, RS>
where
    UR: UserRepository,
    RS: RevocationStore,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Credential store
    /// * `revocation_store` - Token denylist
    /// * `authenticator` - Password hashing and token issuance
    pub fn new(
        repository: Arc<UR>,
        revocation_store: Arc<RS>,
        authenticator: Arc<Authenticator>,
    ) -> Self {
        Self {
            repository,
            revocation_store,
            authenticator,
        }
    }
}

#[async_trait]
impl<UR, RS> AuthServicePort for AuthService<UR, RS>
where
    UR: UserRepository,
    RS: RevocationStore,
{
    async fn register(&self, username: String, password: String) -> Result<User, UserError> {
        let command = RegisterCommand::new(username, password)?;

        if self
            .repository
            .exists_by_username(&command.username)
            .await?
        {
            return Err(UserError::UsernameConflict(command.username.to_string()));
        }

        let password_hash = self
            .authenticator
            .hash_password(command.password.as_str())
            .map_err(|e| UserError::Password(e.to_string()))?;

        let user = User {
            id: UserId::new(),
            username: command.username,
            password_hash,
            created_at: Utc::now(),
        };

        let created_user = self.repository.create(user).await?;
        tracing::info!(
            user_id = %created_user.id,
            username = %created_user.username,
            "User registered"
        );

        Ok(created_user)
    }

    async fn login(&self, username: &str, password: &str) -> Result<String, UserError> {
        // Too short to have been registered.
        let Ok(username) = Username::new(username.to_string()) else {
            self.authenticator.verify_dummy(password);
            return Err(UserError::AuthenticationFailed);
        };

        let Some(user) = self.repository.find_by_username(&username).await? else {
            // Same hashing cost as a wrong password, so misses are not timeable.
            self.authenticator.verify_dummy(password);
            return Err(UserError::AuthenticationFailed);
        };

        let token = self
            .authenticator
            .authenticate(password, &user.password_hash, user.username.as_str())
            .map_err(|e| match e {
                AuthenticationError::InvalidCredentials => UserError::AuthenticationFailed,
                AuthenticationError::PasswordError(err) => UserError::Password(err.to_string()),
                AuthenticationError::JwtError(err) => UserError::Token(err.to_string()),
            })?;

        tracing::info!(user_id = %user.id, username = %user.username, "User logged in");
        Ok(token)
    }

    async fn logout(&self, token: &str) -> Result<(), UserError> {
        if !self.authenticator.validate_token(token) {
            tracing::debug!("Logout with invalid token ignored");
            return Ok(());
        }

        // The token may expire between validation and this point.
        let remaining = match self.authenticator.remaining_lifetime(token) {
            Some(remaining) if !remaining.is_zero() => remaining,
            _ => {
                tracing::debug!("Logout with expired token ignored");
                return Ok(());
            }
        };

        self.revocation_store
            .set_with_ttl(token, LOGOUT_MARKER, remaining)
            .await?;

        tracing::info!(ttl_ms = remaining.as_millis() as u64, "Token revoked");
        Ok(())
    }

    async fn authenticate(&self, token: &str) -> Result<User, UserError> {
        let subject = self
            .authenticator
            .token_subject(token)
            .map_err(|_| UserError::AuthenticationFailed)?;

        if self.revocation_store.exists(token).await? {
            tracing::debug!(username = %subject, "Revoked token presented");
            return Err(UserError::AuthenticationFailed);
        }

        let username =
            Username::new(subject).map_err(|_| UserError::AuthenticationFailed)?;

        self.repository
            .find_by_username(&username)
            .await?
            .ok_or(UserError::AuthenticationFailed)
    }
}
