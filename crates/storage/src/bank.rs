use std::path::Path;
use std::sync::Arc;

use quiz_core::model::{Test, TestId, TestSummary};

use crate::repository::{InMemoryQuestionBank, QuestionBank, StorageError};

/// Question bank loaded from the consolidated JSON file written by
/// `import_bank`.
#[derive(Clone)]
pub struct JsonQuestionBank {
    inner: InMemoryQuestionBank,
}

impl JsonQuestionBank {
    /// Parse a bank from a JSON array of tests.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the text is not a valid bank.
    pub fn from_json_str(raw: &str) -> Result<Self, StorageError> {
        let tests: Vec<Test> =
            serde_json::from_str(raw).map_err(|e| StorageError::Serialization(e.to_string()))?;
        Ok(Self {
            inner: InMemoryQuestionBank::new(tests),
        })
    }

    /// Read and parse a bank file.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the file cannot be read, or
    /// `StorageError::Serialization` if it is not a valid bank.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl QuestionBank for JsonQuestionBank {
    fn list_tests(&self) -> Vec<TestSummary> {
        self.inner.list_tests()
    }

    fn get_test(&self, id: &TestId) -> Result<Arc<Test>, StorageError> {
        self.inner.get_test(id)
    }
}
