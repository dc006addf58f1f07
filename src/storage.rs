use std::sync::Arc;

use log::{debug, info, trace};

use crate::{parse_history, KeyValueStore, PrayerRecord, Result};

/// Key the original journal used in browser storage
pub const DEFAULT_STORAGE_KEY: &str = "soulscribe_prayers_v1";

/// Persists the prayer journal as one JSON array under a single key.
///
/// Every operation reads the whole collection, modifies it and writes it back. There
/// is no locking: with two writers the last write wins.
#[derive(Clone)]
pub struct HistoryStore {
    /// Backend holding the serialized collection
    backend: Arc<dyn KeyValueStore>,

    /// Key the collection is stored under
    key: String,
}

impl HistoryStore {
    /// Creates a store over `backend` using `key` as its slot
    pub fn new(backend: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns all records in persisted order.
    ///
    /// Missing or unreadable content is reported as an empty journal. Callers sort by
    /// timestamp for display.
    pub async fn list(&self) -> Result<Vec<PrayerRecord>> {
        let raw = self.backend.get(&self.key).await?;
        let records = match raw {
            Some(raw) => parse_history(&raw),
            None => {
                trace!("No history stored under {}", self.key);
                Vec::new()
            }
        };
        debug!("Loaded {} records from {}", records.len(), self.key);
        Ok(records)
    }

    /// Looks a record up by id
    pub async fn get(&self, id: &str) -> Result<Option<PrayerRecord>> {
        Ok(self.list().await?.into_iter().find(|r| r.id == id))
    }

    /// Inserts `record` at the front of the collection
    pub async fn append(&self, record: PrayerRecord) -> Result<()> {
        info!("Saving prayer: {}", record.id);
        let mut records = self.list().await?;
        records.insert(0, record);
        self.write(&records).await
    }

    /// Replaces the record with the same id, keeping its position.
    ///
    /// Does nothing if no record has that id.
    pub async fn update(&self, record: PrayerRecord) -> Result<()> {
        let mut records = self.list().await?;
        match records.iter().position(|r| r.id == record.id) {
            Some(index) => {
                info!("Updating prayer: {}", record.id);
                records[index] = record;
                self.write(&records).await
            }
            None => {
                debug!("Prayer {} not in history, update skipped", record.id);
                Ok(())
            }
        }
    }

    /// Removes the record with `id`; a missing id is not an error and writes nothing
    pub async fn delete(&self, id: &str) -> Result<()> {
        let mut records = self.list().await?;
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            debug!("Prayer {} not in history, delete skipped", id);
            return Ok(());
        }
        info!("Deleting prayer: {}", id);
        self.write(&records).await
    }

    async fn write(&self, records: &[PrayerRecord]) -> Result<()> {
        let json = serde_json::to_string(records)?;
        self.backend.set(&self.key, &json).await?;
        trace!("Wrote {} records to {}", records.len(), self.key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::{prayer::fixtures::record, JournalError, MemoryKeyValueStore};

    fn store() -> (Arc<MemoryKeyValueStore>, HistoryStore) {
        let backend = Arc::new(MemoryKeyValueStore::new());
        let store = HistoryStore::new(backend.clone(), DEFAULT_STORAGE_KEY);
        (backend, store)
    }

    fn ids(records: &[PrayerRecord]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    #[tokio::test]
    async fn empty_store_lists_nothing() {
        let (_, store) = store();
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn append_puts_record_at_head_once() {
        let (_, store) = store();
        store.append(record("a", 1)).await.unwrap();
        store.append(record("b", 2)).await.unwrap();

        let listed = store.list().await.unwrap();
        assert_eq!(ids(&listed), vec!["b", "a"]);
    }

    #[tokio::test]
    async fn list_keeps_persisted_order_not_timestamp_order() {
        let (_, store) = store();
        store.append(record("new", 100)).await.unwrap();
        store.append(record("old", 1)).await.unwrap();

        assert_eq!(ids(&store.list().await.unwrap()), vec!["old", "new"]);
    }

    #[tokio::test]
    async fn update_replaces_in_place() {
        let (_, store) = store();
        for (id, ts) in [("a", 1), ("b", 2), ("c", 3)] {
            store.append(record(id, ts)).await.unwrap();
        }

        let answered = record("b", 2).answered("thanks", 10).unwrap();
        store.update(answered.clone()).await.unwrap();

        let listed = store.list().await.unwrap();
        assert_eq!(ids(&listed), vec!["c", "b", "a"]);
        assert_eq!(listed[1], answered);
    }

    #[tokio::test]
    async fn update_of_unknown_id_changes_nothing() {
        let (backend, store) = store();
        store.append(record("a", 1)).await.unwrap();
        let before = backend.get(DEFAULT_STORAGE_KEY).await.unwrap();

        store.update(record("ghost", 5)).await.unwrap();

        assert_eq!(backend.get(DEFAULT_STORAGE_KEY).await.unwrap(), before);
    }

    #[tokio::test]
    async fn delete_removes_and_tolerates_missing_ids() {
        let (_, store) = store();
        store.append(record("a", 1)).await.unwrap();
        store.append(record("b", 2)).await.unwrap();

        store.delete("a").await.unwrap();
        store.delete("a").await.unwrap();
        store.delete("nope").await.unwrap();

        assert_eq!(ids(&store.list().await.unwrap()), vec!["b"]);
    }

    #[tokio::test]
    async fn corrupt_history_reads_as_empty_and_is_overwritten_on_append() {
        let (backend, store) = store();
        backend.set(DEFAULT_STORAGE_KEY, "{not json").await.unwrap();

        assert!(store.list().await.unwrap().is_empty());

        store.append(record("a", 1)).await.unwrap();
        assert_eq!(ids(&store.list().await.unwrap()), vec!["a"]);
    }

    #[tokio::test]
    async fn unreadable_entry_does_not_cost_the_readable_ones() {
        let (backend, store) = store();
        let mut bad = serde_json::to_value(record("bad", 1)).unwrap();
        bad["language"] = serde_json::json!("de");
        let good = serde_json::to_value(record("good", 2)).unwrap();
        let raw = serde_json::to_string(&vec![bad, good]).unwrap();
        backend.set(DEFAULT_STORAGE_KEY, &raw).await.unwrap();

        assert_eq!(ids(&store.list().await.unwrap()), vec!["good"]);

        store.delete("does-not-exist").await.unwrap();
        assert_eq!(backend.get(DEFAULT_STORAGE_KEY).await.unwrap(), Some(raw));

        store.append(record("new", 3)).await.unwrap();
        assert_eq!(ids(&store.list().await.unwrap()), vec!["new", "good"]);
    }

    #[tokio::test]
    async fn stores_with_different_keys_are_independent() {
        let backend = Arc::new(MemoryKeyValueStore::new());
        let first = HistoryStore::new(backend.clone(), "first");
        let second = HistoryStore::new(backend, "second");

        first.append(record("a", 1)).await.unwrap();
        assert!(second.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn get_finds_by_id() {
        let (_, store) = store();
        store.append(record("a", 1)).await.unwrap();

        assert_eq!(store.get("a").await.unwrap().map(|r| r.timestamp), Some(1));
        assert!(store.get("b").await.unwrap().is_none());
    }

    struct FailingWrites;

    #[async_trait]
    impl KeyValueStore for FailingWrites {
        async fn get(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }

        async fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(JournalError::Io(std::io::Error::other("disk full")))
        }

        async fn remove(&self, _key: &str) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn write_failures_propagate() {
        let store = HistoryStore::new(Arc::new(FailingWrites), DEFAULT_STORAGE_KEY);
        let err = store.append(record("a", 1)).await.unwrap_err();
        assert!(matches!(err, JournalError::Io(_)));
    }
}
