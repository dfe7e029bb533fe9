use async_trait::async_trait;
use quiz_core::model::{Test, TestId, TestResult, TestSummary};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::history::KvHistoryStore;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

//
// ─── CONTRACTS ─────────────────────────────────────────────────────────────────
//

/// Read-only table of tests, loaded once.
pub trait QuestionBank: Send + Sync {
    /// All tests in bank order, without their questions.
    fn list_tests(&self) -> Vec<TestSummary>;

    /// Fetch a full test by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no test has this ID.
    fn get_test(&self, id: &TestId) -> Result<Arc<Test>, StorageError>;
}

/// Minimal string key-value contract the history blob lives in.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes `key`. Removing a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Bounded, most-recent-first list of attempt results.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Insert `result` at the front, dropping the oldest entries past the cap.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the list cannot be read or written.
    async fn append(&self, result: &TestResult) -> Result<(), StorageError>;

    /// Stored results, most recent first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn list(&self) -> Result<Vec<TestResult>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn clear(&self) -> Result<(), StorageError>;
}

//
// ─── IN-MEMORY ADAPTERS ────────────────────────────────────────────────────────
//

/// Question bank held in memory, in insertion order.
#[derive(Clone, Default)]
pub struct InMemoryQuestionBank {
    tests: Arc<Vec<Arc<Test>>>,
}

impl InMemoryQuestionBank {
    #[must_use]
    pub fn new(tests: Vec<Test>) -> Self {
        Self {
            tests: Arc::new(tests.into_iter().map(Arc::new).collect()),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tests.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }
}

impl QuestionBank for InMemoryQuestionBank {
    fn list_tests(&self) -> Vec<TestSummary> {
        self.tests.iter().map(|t| t.summary()).collect()
    }

    fn get_test(&self, id: &TestId) -> Result<Arc<Test>, StorageError> {
        self.tests
            .iter()
            .find(|t| &t.id == id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }
}

/// Simple in-memory key-value store for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryKeyValueStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryKeyValueStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(key);
        Ok(())
    }
}

/// Aggregates the bank and history behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub bank: Arc<dyn QuestionBank>,
    pub history: Arc<dyn HistoryStore>,
}

impl Storage {
    /// In-memory history over the given bank.
    #[must_use]
    pub fn in_memory(bank: impl QuestionBank + 'static) -> Self {
        let history = KvHistoryStore::new(InMemoryKeyValueStore::new());
        Self {
            bank: Arc::new(bank),
            history: Arc::new(history),
        }
    }
}
