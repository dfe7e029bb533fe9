use std::path::Path;
use std::sync::Arc;

use storage::{JsonQuestionBank, QuestionBank, Storage};

use crate::Clock;
use crate::catalog_service::CatalogService;
use crate::error::AppServicesError;
use crate::history_service::HistoryService;
use crate::sessions::QuizService;

/// Assembles app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    quiz: Arc<QuizService>,
    history: Arc<HistoryService>,
    catalog: Arc<CatalogService>,
}

impl AppServices {
    /// Build services from a bank file with history in `SQLite`.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the bank cannot be loaded or storage
    /// initialization fails.
    pub async fn new_sqlite(
        bank_path: impl AsRef<Path>,
        db_url: &str,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        let bank = JsonQuestionBank::from_path(bank_path)?;
        let storage = Storage::sqlite(bank, db_url).await?;
        Ok(Self::from_storage(&storage, clock))
    }

    /// Build services with history kept in memory.
    #[must_use]
    pub fn in_memory(bank: impl QuestionBank + 'static, clock: Clock) -> Self {
        Self::from_storage(&Storage::in_memory(bank), clock)
    }

    #[must_use]
    pub fn from_storage(storage: &Storage, clock: Clock) -> Self {
        let quiz = QuizService::new(
            clock,
            Arc::clone(&storage.bank),
            Arc::clone(&storage.history),
        );
        Self {
            quiz: Arc::new(quiz),
            history: Arc::new(HistoryService::new(Arc::clone(&storage.history))),
            catalog: Arc::new(CatalogService::new(Arc::clone(&storage.bank))),
        }
    }

    #[must_use]
    pub fn quiz(&self) -> Arc<QuizService> {
        Arc::clone(&self.quiz)
    }

    #[must_use]
    pub fn history(&self) -> Arc<HistoryService> {
        Arc::clone(&self.history)
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<CatalogService> {
        Arc::clone(&self.catalog)
    }
}
