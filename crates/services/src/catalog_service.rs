use std::sync::Arc;

use quiz_core::model::{Subject, Test, TestId, TestSummary};
use storage::{QuestionBank, StorageError};

use crate::error::QuizServiceError;

/// Browsing and search over the question bank.
#[derive(Clone)]
pub struct CatalogService {
    bank: Arc<dyn QuestionBank>,
}

impl CatalogService {
    #[must_use]
    pub fn new(bank: Arc<dyn QuestionBank>) -> Self {
        Self { bank }
    }

    #[must_use]
    pub fn list(&self) -> Vec<TestSummary> {
        self.bank.list_tests()
    }

    /// Tests whose name contains `query`, ignoring case. A blank query
    /// returns every test.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<TestSummary> {
        let needle = query.trim().to_lowercase();
        let tests = self.bank.list_tests();
        if needle.is_empty() {
            return tests;
        }
        tests
            .into_iter()
            .filter(|t| t.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Splits a listing into subject groups, in [`Subject::ALL`] order.
    /// Tests keep their listing order inside a group; empty groups are left
    /// out.
    #[must_use]
    pub fn group_by_subject(tests: Vec<TestSummary>) -> Vec<(Subject, Vec<TestSummary>)> {
        let mut groups: Vec<(Subject, Vec<TestSummary>)> =
            Subject::ALL.iter().map(|s| (*s, Vec::new())).collect();
        for test in tests {
            let subject = test.subject();
            if let Some((_, members)) = groups.iter_mut().find(|(s, _)| *s == subject) {
                members.push(test);
            }
        }
        groups.retain(|(_, members)| !members.is_empty());
        groups
    }

    /// Full test including questions.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::TestNotFound` if the bank has no such test.
    pub fn get(&self, id: &TestId) -> Result<Arc<Test>, QuizServiceError> {
        self.bank.get_test(id).map_err(|err| match err {
            StorageError::NotFound => QuizServiceError::TestNotFound(id.clone()),
            other => QuizServiceError::Storage(other),
        })
    }
}
