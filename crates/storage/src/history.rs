use async_trait::async_trait;
use quiz_core::model::TestResult;
use tracing::warn;

use crate::repository::{HistoryStore, KeyValueStore, StorageError};

/// Key the serialized history list is stored under.
pub const HISTORY_KEY: &str = "quiz_history";

/// Maximum number of results kept; older entries are dropped on append.
pub const HISTORY_LIMIT: usize = 100;

/// History kept as one JSON array under [`HISTORY_KEY`].
///
/// Every append is a read-modify-write of the whole blob; concurrent writers
/// get last-write-wins. The blob has no schema version.
#[derive(Clone)]
pub struct KvHistoryStore<K> {
    kv: K,
}

impl<K: KeyValueStore> KvHistoryStore<K> {
    #[must_use]
    pub fn new(kv: K) -> Self {
        Self { kv }
    }

    #[must_use]
    pub fn inner(&self) -> &K {
        &self.kv
    }

    async fn read(&self) -> Result<Vec<TestResult>, StorageError> {
        let Some(blob) = self.kv.get(HISTORY_KEY).await? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&blob) {
            Ok(results) => Ok(results),
            Err(err) => {
                warn!(error = %err, "discarding unreadable history blob");
                Ok(Vec::new())
            }
        }
    }
}

#[async_trait]
impl<K: KeyValueStore> HistoryStore for KvHistoryStore<K> {
    async fn append(&self, result: &TestResult) -> Result<(), StorageError> {
        let mut results = self.read().await?;
        results.insert(0, result.clone());
        results.truncate(HISTORY_LIMIT);

        let blob = serde_json::to_string(&results)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.kv.set(HISTORY_KEY, &blob).await
    }

    async fn list(&self) -> Result<Vec<TestResult>, StorageError> {
        self.read().await
    }

    async fn clear(&self) -> Result<(), StorageError> {
        self.kv.remove(HISTORY_KEY).await
    }
}
