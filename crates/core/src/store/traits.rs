use async_trait::async_trait;

use super::Result;

/// The capability set the record repository needs from a key-value store.
///
/// Each call touches a single key (or the whole namespace, for `keys` and
/// `flush_all`) and is atomic on its own. Nothing spans more than one call.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Checks that the store answers.
    async fn ping(&self) -> Result<()>;

    /// Gets the value stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Removes `key`. Removing a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Returns true if `key` holds a value.
    async fn exists(&self, key: &str) -> Result<bool>;

    /// Lists every key in the namespace, in no particular order.
    async fn keys(&self) -> Result<Vec<String>>;

    /// Atomically increments the integer counter at `key` and returns the
    /// new value. A missing key counts as 0.
    async fn incr(&self, key: &str) -> Result<i64>;

    /// Removes every key, counters included.
    async fn flush_all(&self) -> Result<()>;
}
