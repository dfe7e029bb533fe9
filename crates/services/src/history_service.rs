use std::sync::Arc;

use quiz_core::model::TestResult;
use storage::HistoryStore;
use tracing::error;

/// Read side of the attempt history.
///
/// Storage failures never reach the caller: they are logged and reported as
/// an empty list or a `false` return.
#[derive(Clone)]
pub struct HistoryService {
    history: Arc<dyn HistoryStore>,
}

impl HistoryService {
    #[must_use]
    pub fn new(history: Arc<dyn HistoryStore>) -> Self {
        Self { history }
    }

    /// Saved results, most recent first.
    pub async fn list(&self) -> Vec<TestResult> {
        match self.history.list().await {
            Ok(results) => results,
            Err(err) => {
                error!(error = %err, "failed to load test history");
                Vec::new()
            }
        }
    }

    /// Removes every saved result. Returns whether the store was cleared.
    pub async fn clear(&self) -> bool {
        match self.history.clear().await {
            Ok(()) => true,
            Err(err) => {
                error!(error = %err, "failed to clear history");
                false
            }
        }
    }
}
