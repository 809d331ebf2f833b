use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use redis::RedisError;

use crate::domain::user::ports::RevocationStore;
use crate::user::errors::RevocationStoreError;

/// Redis-backed token denylist.
///
/// Entries are written with `SET key value PX <ms>` so the value and its
/// expiry land in one command; Redis evicts them when the token would have
/// expired anyway.
#[derive(Clone)]
pub struct RedisRevocationStore {
    conn: ConnectionManager,
}

impl RedisRevocationStore {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }

    /// Open a managed connection to `url`.
    ///
    /// # Errors
    /// * `Unavailable` - URL is invalid or the server cannot be reached
    pub async fn connect(url: &str) -> Result<Self, RevocationStoreError> {
        let client = redis::Client::open(url).map_err(unavailable)?;
        let conn = ConnectionManager::new(client).await.map_err(unavailable)?;
        Ok(Self::new(conn))
    }
}

fn unavailable(e: RedisError) -> RevocationStoreError {
    RevocationStoreError::Unavailable(e.to_string())
}

fn command_failed(e: RedisError) -> RevocationStoreError {
    if e.is_io_error() || e.is_connection_dropped() || e.is_timeout() {
        unavailable(e)
    } else {
        RevocationStoreError::CommandFailed(e.to_string())
    }
}

#[async_trait]
impl RevocationStore for RedisRevocationStore {
    async fn set_with_ttl(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<(), RevocationStoreError> {
        // PX rejects 0; anything shorter than a millisecond has nothing left to revoke.
        let ttl_ms = ttl.as_millis().min(u64::MAX as u128) as u64;
        if ttl_ms == 0 {
            return Ok(());
        }

        let mut conn = self.conn.clone();
        let _: () = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("PX")
            .arg(ttl_ms)
            .query_async(&mut conn)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Redis SET PX failed");
                command_failed(e)
            })?;

        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool, RevocationStoreError> {
        let mut conn = self.conn.clone();
        conn.exists(key).await.map_err(|e| {
            tracing::error!(error = %e, "Redis EXISTS failed");
            command_failed(e)
        })
    }
}
