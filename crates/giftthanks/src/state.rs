//! Application state.
//!
//! The repository is built once at startup and shared by every request
//! handler through `AppState`. There is no process-global handle, so tests
//! can inject a `MemoryStore`.

use std::sync::Arc;

use clap::ValueEnum;

use giftthanks_core::storage::{RecordRepository, RepositoryError};
use giftthanks_core::store::{KeyValueStore, MemoryStore};

use crate::config::Config;

/// Which key-value store backs the repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// Redis, resolved from the environment.
    Redis,
    /// Process-local memory. Data is lost on restart.
    Memory,
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Record repository over the shared store handle.
    pub repo: Arc<RecordRepository>,
}

impl AppState {
    /// Wraps a connected repository.
    pub fn new(repo: RecordRepository) -> Self {
        Self {
            repo: Arc::new(repo),
        }
    }

    /// Builds state over an already constructed store handle.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::ConnectionFailed` if the store does not
    /// answer a ping.
    pub async fn from_store(store: Arc<dyn KeyValueStore>) -> Result<Self, RepositoryError> {
        let repo = RecordRepository::connect(store).await?;
        Ok(Self::new(repo))
    }

    /// Connects to the configured backend.
    pub async fn connect(config: &Config, backend: Backend) -> anyhow::Result<Self> {
        match backend {
            Backend::Memory => {
                tracing::info!("Using in-memory store");
                Ok(Self::from_store(Arc::new(MemoryStore::new())).await?)
            }
            Backend::Redis => connect_redis(config).await,
        }
    }
}

/// Tries each configured Redis endpoint in order and keeps the first that
/// answers. Fails if none does.
#[cfg(feature = "redis")]
async fn connect_redis(config: &Config) -> anyhow::Result<AppState> {
    use crate::storage::RedisStore;

    for endpoint in config.redis_candidates() {
        tracing::info!(%endpoint, source = %endpoint.source, "Testing connection");

        let store = match RedisStore::new(&endpoint.url()).await {
            Ok(store) => store,
            Err(err) => {
                tracing::warn!(%endpoint, error = %err, "Connection error");
                continue;
            }
        };

        match AppState::from_store(Arc::new(store)).await {
            Ok(state) => {
                tracing::info!(%endpoint, "Using Redis store");
                return Ok(state);
            }
            Err(err) => tracing::warn!(%endpoint, error = %err, "Connection error"),
        }
    }

    tracing::error!("Could not connect to the Redis service");
    Err(RepositoryError::ConnectionFailed("could not connect to the Redis service".to_string()).into())
}

#[cfg(not(feature = "redis"))]
async fn connect_redis(_config: &Config) -> anyhow::Result<AppState> {
    anyhow::bail!("giftthanks was built without the `redis` feature; use `--backend memory`")
}
