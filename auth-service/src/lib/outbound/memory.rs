//! In-memory adapters for the credential store and the token denylist.
//!
//! Both satisfy the same contracts as the Postgres and Redis adapters and are
//! used by tests and for running the service without external stores.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::domain::user::models::User;
use crate::domain::user::models::Username;
use crate::domain::user::ports::RevocationStore;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::RevocationStoreError;
use crate::user::errors::UserError;

/// Credential store keyed by username.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<String, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn exists_by_username(&self, username: &Username) -> Result<bool, UserError> {
        Ok(self.users.lock().await.contains_key(username.as_str()))
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        Ok(self.users.lock().await.get(username.as_str()).cloned())
    }

    async fn create(&self, user: User) -> Result<User, UserError> {
        // Check and insert under one lock, like a unique constraint.
        let mut users = self.users.lock().await;
        if users.contains_key(user.username.as_str()) {
            return Err(UserError::UsernameConflict(user.username.to_string()));
        }
        users.insert(user.username.as_str().to_string(), user.clone());
        Ok(user)
    }
}

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Instant,
}

/// Denylist with per-entry expiry.
///
/// Expired entries are dropped when their key is read and swept on every
/// write, so the map stays bounded by the tokens revoked within one
/// validity window.
#[derive(Default)]
pub struct InMemoryRevocationStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl InMemoryRevocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value stored under `key`, if present and unexpired.
    pub async fn get(&self, key: &str) -> Option<String> {
        let mut entries = self.entries.lock().await;
        Self::live(&mut entries, key).map(|entry| entry.value.clone())
    }

    /// Time left before the entry under `key` expires.
    pub async fn ttl(&self, key: &str) -> Option<Duration> {
        let mut entries = self.entries.lock().await;
        Self::live(&mut entries, key)
            .map(|entry| entry.expires_at.saturating_duration_since(Instant::now()))
    }

    /// Number of unexpired entries.
    pub async fn len(&self) -> usize {
        let mut entries = self.entries.lock().await;
        Self::sweep(&mut entries);
        entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn sweep(entries: &mut HashMap<String, Entry>) {
        let now = Instant::now();
        entries.retain(|_, entry| entry.expires_at > now);
    }

    fn live<'a>(entries: &'a mut HashMap<String, Entry>, key: &str) -> Option<&'a Entry> {
        let expired = entries
            .get(key)
            .is_some_and(|entry| entry.expires_at <= Instant::now());
        if expired {
            entries.remove(key);
        }
        entries.get(key)
    }
}

#[async_trait]
impl RevocationStore for InMemoryRevocationStore {
    async fn set_with_ttl(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<(), RevocationStoreError> {
        let mut entries = self.entries.lock().await;
        Self::sweep(&mut entries);
        if ttl.is_zero() {
            entries.remove(key);
            return Ok(());
        }
        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool, RevocationStoreError> {
        let mut entries = self.entries.lock().await;
        Ok(Self::live(&mut entries, key).is_some())
    }
}
