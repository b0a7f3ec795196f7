//! Record repository over a [`KeyValueStore`].
//!
//! Layout in the store:
//!
//! - `index`: the id counter, advanced with an atomic `INCR`.
//! - `<id>`: one JSON-encoded record per decimal id key.
//!
//! There is no secondary index. `find_all` and `find_by` enumerate every key
//! and decode every record, so each query is O(n) in the number of records.

use std::sync::Arc;

use crate::record::{
    deserialize_record, serialize_record, FieldValue, GiftRecord, RecordField, ValidationError,
};
use crate::store::KeyValueStore;

use super::{RepositoryError, Result};

/// Reserved key holding the id counter. Never returned by scans.
pub const INDEX_KEY: &str = "index";

/// Durable storage and retrieval of [`GiftRecord`]s.
///
/// Holds one shared store handle. Clone the surrounding `Arc` rather than
/// opening new connections per request.
pub struct RecordRepository {
    store: Arc<dyn KeyValueStore>,
}

impl RecordRepository {
    /// Wraps a store handle after checking that it answers.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::ConnectionFailed`] if the ping fails. There
    /// is no half-initialized repository.
    pub async fn connect(store: Arc<dyn KeyValueStore>) -> Result<Self> {
        store.ping().await.map_err(|err| {
            tracing::error!(error = %err, "Store did not answer ping");
            RepositoryError::from(err)
        })?;

        tracing::info!("Connection established");
        Ok(Self { store })
    }

    /// Checks that the underlying store still answers.
    pub async fn ping(&self) -> Result<()> {
        self.store.ping().await?;
        Ok(())
    }

    /// Persists a record, assigning an id when it has none.
    ///
    /// Overwrites whatever was stored under the id before.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::GiftNotSet`] if `gift` is absent.
    pub async fn save(&self, mut record: GiftRecord) -> Result<GiftRecord> {
        if record.gift.is_none() {
            return Err(ValidationError::GiftNotSet.into());
        }

        if record.id == 0 {
            record.id = self.next_index().await?;
        }

        let bytes = serialize_record(&record)?;
        self.store.set(&record.id.to_string(), &bytes).await?;

        tracing::debug!(id = record.id, "Saved record");
        Ok(record)
    }

    /// Deletes a record. Deleting a missing id is a no-op.
    pub async fn delete(&self, id: u64) -> Result<()> {
        self.store.delete(&id.to_string()).await?;
        tracing::debug!(id, "Deleted record");
        Ok(())
    }

    /// Finds a record by id. Returns `Ok(None)` when it does not exist.
    pub async fn find(&self, id: u64) -> Result<Option<GiftRecord>> {
        match self.store.get(&id.to_string()).await? {
            Some(bytes) => Ok(Some(deserialize_record(id, &bytes)?)),
            None => Ok(None),
        }
    }

    /// Returns every stored record.
    ///
    /// Records come back in the store's key enumeration order, which is
    /// neither stable nor insertion order.
    pub async fn find_all(&self) -> Result<Vec<GiftRecord>> {
        self.scan(|_| true).await
    }

    /// Returns every record whose `field` matches `value`.
    ///
    /// Text compares case-insensitively, other values exactly. Records with
    /// the attribute unset never match.
    pub async fn find_by(&self, field: RecordField, value: &FieldValue) -> Result<Vec<GiftRecord>> {
        tracing::info!(%field, %value, "Processing query");
        self.scan(|record| record.matches(field, value)).await
    }

    pub async fn find_by_gift(&self, gift: &str) -> Result<Vec<GiftRecord>> {
        self.find_by(RecordField::Gift, &FieldValue::from(gift)).await
    }

    pub async fn find_by_gifter(&self, gifter: &str) -> Result<Vec<GiftRecord>> {
        self.find_by(RecordField::Gifter, &FieldValue::from(gifter)).await
    }

    pub async fn find_by_thanked(&self, thanked: &FieldValue) -> Result<Vec<GiftRecord>> {
        self.find_by(RecordField::Thanked, thanked).await
    }

    /// Sets the `thanked` attribute of an existing record.
    ///
    /// Returns `Ok(None)` when the id does not exist, including when the
    /// record is deleted after it was read. The existence check and the write
    /// are separate store calls, so a delete landing between them can still
    /// be overwritten; concurrent writers to one id are last-writer-wins.
    pub async fn mark_thanked(
        &self,
        id: u64,
        thanked: Option<FieldValue>,
    ) -> Result<Option<GiftRecord>> {
        let Some(mut record) = self.find(id).await? else {
            return Ok(None);
        };

        if !self.store.exists(&id.to_string()).await? {
            tracing::debug!(id, "Record deleted before update");
            return Ok(None);
        }

        record.thanked = thanked;
        self.save(record).await.map(Some)
    }

    /// Removes every key in the store, including the id counter.
    ///
    /// Meant for resets and tests: the next assigned id is 1 again.
    pub async fn remove_all(&self) -> Result<()> {
        self.store.flush_all().await?;
        tracing::warn!("Removed all records and reset the id counter");
        Ok(())
    }

    async fn next_index(&self) -> Result<u64> {
        let next = self.store.incr(INDEX_KEY).await?;

        u64::try_from(next)
            .ok()
            .filter(|id| *id > 0)
            .ok_or_else(|| {
                RepositoryError::QueryFailed(format!(
                    "id counter '{INDEX_KEY}' returned non-positive value {next}"
                ))
            })
    }

    async fn scan<F>(&self, predicate: F) -> Result<Vec<GiftRecord>>
    where
        F: Fn(&GiftRecord) -> bool + Send,
    {
        let keys = self.store.keys().await?;
        let mut results = Vec::new();

        for key in keys {
            if key == INDEX_KEY {
                continue;
            }

            let Some(id) = record_id_from_key(&key) else {
                tracing::warn!(%key, "Skipping key that is not a record id");
                continue;
            };

            // Deleted between KEYS and GET.
            let Some(bytes) = self.store.get(&key).await? else {
                continue;
            };

            let record = deserialize_record(id, &bytes)?;
            if predicate(&record) {
                results.push(record);
            }
        }

        Ok(results)
    }
}

/// Returns the id stored under `key`, if `key` is exactly how a record id
/// is written (`"7"`, never `"07"` or `"+7"`).
fn record_id_from_key(key: &str) -> Option<u64> {
    let id = key.parse::<u64>().ok().filter(|id| *id > 0)?;
    (id.to_string() == key).then_some(id)
}
