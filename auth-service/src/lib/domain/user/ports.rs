use std::time::Duration;

use async_trait::async_trait;

use crate::domain::user::models::User;
use crate::domain::user::models::Username;
use crate::user::errors::RevocationStoreError;
use crate::user::errors::UserError;

/// Port for authentication service operations.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new user.
    ///
    /// # Arguments
    /// * `username` - Raw username (at least 4 characters)
    /// * `password` - Raw password (at least 4 characters)
    ///
    /// # Returns
    /// Created user entity
    ///
    /// # Errors
    /// * `BadUsername` - Username too short (checked first)
    /// * `BadPassword` - Password too short
    /// * `UsernameConflict` - Username is already taken
    /// * `DatabaseError` - Database operation failed
    async fn register(&self, username: String, password: String) -> Result<User, UserError>;

    /// Verify credentials and issue a session token.
    ///
    /// # Returns
    /// Signed session token bound to the username
    ///
    /// # Errors
    /// * `AuthenticationFailed` - Unknown username or wrong password (indistinguishable)
    /// * `DatabaseError` - Database operation failed
    async fn login(&self, username: &str, password: &str) -> Result<String, UserError>;

    /// Revoke a session token until its natural expiry.
    ///
    /// Invalid, malformed and expired tokens are accepted as a no-op.
    ///
    /// # Errors
    /// * `RevocationStore` - Denylist write failed
    async fn logout(&self, token: &str) -> Result<(), UserError>;

    /// Resolve the user behind a session token.
    ///
    /// # Errors
    /// * `AuthenticationFailed` - Token invalid, expired, revoked, or its user no longer exists
    /// * `RevocationStore` - Denylist lookup failed
    /// * `DatabaseError` - Database operation failed
    async fn authenticate(&self, token: &str) -> Result<User, UserError>;
}

/// Persistence operations for user aggregate.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Whether a user with this username exists.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn exists_by_username(&self, username: &Username) -> Result<bool, UserError>;

    /// Retrieve user by username.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError>;

    /// Persist new user to storage.
    ///
    /// Uniqueness of the username is enforced atomically by the store.
    ///
    /// # Errors
    /// * `UsernameConflict` - Username is already taken
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, user: User) -> Result<User, UserError>;
}

/// Key-value denylist with per-entry expiry.
#[async_trait]
pub trait RevocationStore: Send + Sync + 'static {
    /// Store `value` under `key`, expiring after `ttl`, as one atomic write.
    ///
    /// Overwrites any existing entry and its expiry.
    ///
    /// # Errors
    /// * `Unavailable` - Store could not be reached
    /// * `CommandFailed` - Store rejected the write
    async fn set_with_ttl(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<(), RevocationStoreError>;

    /// Whether an unexpired entry exists for `key`.
    ///
    /// # Errors
    /// * `Unavailable` - Store could not be reached
    /// * `CommandFailed` - Store rejected the lookup
    async fn exists(&self, key: &str) -> Result<bool, RevocationStoreError>;
}
