use std::sync::Arc;
use std::time::Duration;

use quiz_core::model::{QuizSession, SessionMode, TestId};
use storage::{HistoryStore, QuestionBank, StorageError};
use tracing::info;

use super::active::ActiveQuiz;
use super::timer::CountdownTimer;
use crate::Clock;
use crate::error::QuizServiceError;

const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(1);

/// Starts attempts against the question bank and wires them to history.
#[derive(Clone)]
pub struct QuizService {
    clock: Clock,
    bank: Arc<dyn QuestionBank>,
    history: Arc<dyn HistoryStore>,
    countdown: bool,
    tick_period: Duration,
}

impl QuizService {
    #[must_use]
    pub fn new(clock: Clock, bank: Arc<dyn QuestionBank>, history: Arc<dyn HistoryStore>) -> Self {
        Self {
            clock,
            bank,
            history,
            countdown: true,
            tick_period: DEFAULT_TICK_PERIOD,
        }
    }

    /// Disable the background countdown; ticks must then be fed through
    /// [`ActiveQuiz::handle_tick`] by the caller.
    #[must_use]
    pub fn with_countdown(mut self, countdown: bool) -> Self {
        self.countdown = countdown;
        self
    }

    #[must_use]
    pub fn with_tick_period(mut self, period: Duration) -> Self {
        self.tick_period = period;
        self
    }

    /// Start a new attempt at `test_id`.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::TestNotFound` if the bank has no such test;
    /// no session is created. Returns `QuizServiceError::Timer` if a countdown
    /// is needed but no Tokio runtime is available.
    pub fn start(&self, test_id: &TestId, mode: SessionMode) -> Result<ActiveQuiz, QuizServiceError> {
        let test = self.bank.get_test(test_id).map_err(|err| match err {
            StorageError::NotFound => QuizServiceError::TestNotFound(test_id.clone()),
            other => QuizServiceError::Storage(other),
        })?;

        let timer = if mode.rules().countdown && self.countdown {
            Some(CountdownTimer::start(self.tick_period)?)
        } else {
            None
        };

        let session = QuizSession::new(test, mode, self.clock.now());
        info!(
            test = %test_id,
            %mode,
            questions = session.question_count(),
            time_limit_secs = session.time_remaining_secs(),
            "attempt started"
        );

        Ok(ActiveQuiz::new(
            session,
            timer,
            Arc::clone(&self.history),
            self.clock,
        ))
    }
}
