//! In-memory key-value store.
//!
//! Backs the `memory` backend and stands in for Redis in tests. Data is lost
//! when the last clone is dropped.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{KeyValueStore, Result, StoreError};

/// Key-value store held in a `HashMap` behind `Arc<RwLock<_>>`.
///
/// Counters are stored as decimal strings, the way Redis stores them, so
/// `incr` on a non-numeric value fails. `keys` returns `HashMap` order.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    data: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    online: Arc<AtomicBool>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(HashMap::new())),
            online: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Simulates losing (or regaining) the connection.
    ///
    /// While offline every operation fails with
    /// [`StoreError::ConnectionFailed`]. Shared by all clones.
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<()> {
        if self.online.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::ConnectionFailed(
                "memory store is offline".to_string(),
            ))
        }
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn ping(&self) -> Result<()> {
        self.check_online()
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.check_online()?;
        let data = self.data.read().await;
        Ok(data.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        self.check_online()?;
        let mut data = self.data.write().await;
        data.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.check_online()?;
        let mut data = self.data.write().await;
        data.remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        self.check_online()?;
        let data = self.data.read().await;
        Ok(data.contains_key(key))
    }

    async fn keys(&self) -> Result<Vec<String>> {
        self.check_online()?;
        let data = self.data.read().await;
        Ok(data.keys().cloned().collect())
    }

    async fn incr(&self, key: &str) -> Result<i64> {
        self.check_online()?;
        let mut data = self.data.write().await;

        let current = match data.get(key) {
            Some(bytes) => std::str::from_utf8(bytes)
                .ok()
                .and_then(|s| s.parse::<i64>().ok())
                .ok_or_else(|| {
                    StoreError::OperationFailed(
                        "value is not an integer or out of range".to_string(),
                    )
                })?,
            None => 0,
        };

        let next = current.checked_add(1).ok_or_else(|| {
            StoreError::OperationFailed("increment would overflow".to_string())
        })?;

        data.insert(key.to_string(), next.to_string().into_bytes());
        Ok(next)
    }

    async fn flush_all(&self) -> Result<()> {
        self.check_online()?;
        let mut data = self.data.write().await;
        data.clear();
        Ok(())
    }
}
