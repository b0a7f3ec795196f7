//! Redis implementation of `KeyValueStore`.

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;

use giftthanks_core::store::{KeyValueStore, Result, StoreError};

use super::error::map_redis_error;

/// How long to wait for the initial connection before giving up.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Redis store backend using connection manager for pooling.
#[derive(Clone)]
pub struct RedisStore {
    conn: redis::aio::ConnectionManager,
}

impl RedisStore {
    /// Creates a new Redis connection.
    ///
    /// # Arguments
    ///
    /// * `url` - Redis connection URL (e.g., "redis://localhost:6379")
    ///
    /// # Errors
    ///
    /// Returns `StoreError::ConnectionFailed` if the connection cannot be
    /// established within five seconds.
    pub async fn new(url: &str) -> Result<Self> {
        let client = redis::Client::open(url).map_err(map_redis_error)?;
        let conn = tokio::time::timeout(CONNECT_TIMEOUT, redis::aio::ConnectionManager::new(client))
            .await
            .map_err(|_| {
                StoreError::ConnectionFailed(format!(
                    "timed out after {}s",
                    CONNECT_TIMEOUT.as_secs()
                ))
            })?
            .map_err(map_redis_error)?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn ping(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(map_redis_error)?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.conn.clone();
        let result: Option<Vec<u8>> = conn.get(key).await.map_err(map_redis_error)?;
        Ok(result)
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(key, value)
            .await
            .map_err(map_redis_error)?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(key).await.map_err(map_redis_error)?;
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let mut conn = self.conn.clone();
        let exists: bool = conn.exists(key).await.map_err(map_redis_error)?;
        Ok(exists)
    }

    async fn keys(&self) -> Result<Vec<String>> {
        let mut conn = self.conn.clone();
        let keys: Vec<Vec<u8>> = conn.keys("*").await.map_err(map_redis_error)?;
        Ok(utf8_keys(keys))
    }

    async fn incr(&self, key: &str) -> Result<i64> {
        let mut conn = self.conn.clone();
        let value: i64 = conn.incr(key, 1).await.map_err(map_redis_error)?;
        Ok(value)
    }

    async fn flush_all(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: () = redis::cmd("FLUSHALL")
            .query_async(&mut conn)
            .await
            .map_err(map_redis_error)?;
        Ok(())
    }
}

/// Keeps the keys that are valid UTF-8. Other clients sharing the database
/// may write binary keys, and those are never records.
fn utf8_keys(raw: Vec<Vec<u8>>) -> Vec<String> {
    raw.into_iter()
        .filter_map(|key| match String::from_utf8(key) {
            Ok(key) => Some(key),
            Err(err) => {
                let lossy = String::from_utf8_lossy(err.as_bytes()).into_owned();
                tracing::warn!(key = %lossy, "Skipping key that is not valid UTF-8");
                None
            }
        })
        .collect()
}
