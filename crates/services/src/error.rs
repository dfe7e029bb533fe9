//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::TestId;
use storage::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by the countdown timer.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TimerError {
    #[error("countdown timer requires a running Tokio runtime")]
    NoRuntime,
}

/// Errors emitted by `QuizService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizServiceError {
    #[error("test not found: {0}")]
    TestNotFound(TestId),
    #[error(transparent)]
    Timer(#[from] TimerError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
