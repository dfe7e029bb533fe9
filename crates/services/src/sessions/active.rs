use std::fmt;
use std::sync::Arc;

use quiz_core::model::{
    AnswerSlot, QuizSession, ResultId, Selection, SubmitConfirmation, SubmitError, SubmitTrigger,
    TestResult, Tick,
};
use quiz_core::review::ReviewPartition;
use storage::HistoryStore;
use tokio::runtime::Handle;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, error, info, warn};

use super::timer::CountdownTimer;
use crate::Clock;

//
// ─── OUTCOME ───────────────────────────────────────────────────────────────────
//

/// Where the history write for a finished attempt stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persistence {
    /// The write is still running in the background.
    Pending,
    Saved,
    /// The write failed. The result is still shown once but will not appear
    /// in later listings.
    Failed,
}

/// Everything produced when an attempt ends.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOutcome {
    pub result: TestResult,
    pub answers: Vec<AnswerSlot>,
    pub persistence: Persistence,
}

impl SessionOutcome {
    #[must_use]
    pub fn persisted(&self) -> bool {
        self.persistence == Persistence::Saved
    }
}

//
// ─── ACTIVE QUIZ ───────────────────────────────────────────────────────────────
//

/// A live attempt: the session state plus the resources it owns.
///
/// The countdown timer is released on submission (manual or expiry), on
/// [`ActiveQuiz::abandon`], and when the value is dropped.
///
/// Submission stores the outcome before touching history. The history write
/// runs as its own task; [`ActiveQuiz::saved`] waits for it.
pub struct ActiveQuiz {
    session: QuizSession,
    timer: Option<CountdownTimer>,
    history: Arc<dyn HistoryStore>,
    clock: Clock,
    outcome: Option<SessionOutcome>,
    save: Option<JoinHandle<bool>>,
}

impl ActiveQuiz {
    pub(crate) fn new(
        session: QuizSession,
        timer: Option<CountdownTimer>,
        history: Arc<dyn HistoryStore>,
        clock: Clock,
    ) -> Self {
        Self {
            session,
            timer,
            history,
            clock,
            outcome: None,
            save: None,
        }
    }

    #[must_use]
    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    #[must_use]
    pub fn outcome(&self) -> Option<&SessionOutcome> {
        self.outcome.as_ref()
    }

    #[must_use]
    pub fn has_running_timer(&self) -> bool {
        self.timer.is_some()
    }

    /// Abort handle of the countdown task, if one is running.
    #[must_use]
    pub fn timer_abort_handle(&self) -> Option<AbortHandle> {
        self.timer.as_ref().map(CountdownTimer::abort_handle)
    }

    /// Replaces the clock used for timestamps and practice elapsed time.
    pub fn set_clock(&mut self, clock: Clock) {
        self.clock = clock;
    }

    pub fn select_answer(&mut self, option: usize) -> Selection {
        let selection = self.session.select_answer(option);
        if selection != Selection::Recorded {
            debug!(
                index = self.session.current_index(),
                option,
                ?selection,
                "answer ignored"
            );
        }
        selection
    }

    pub fn toggle_mark(&mut self) -> bool {
        self.session.toggle_mark()
    }

    pub fn go_to(&mut self, index: usize) -> bool {
        self.session.go_to(index)
    }

    pub fn next(&mut self) -> bool {
        self.session.next()
    }

    pub fn previous(&mut self) -> bool {
        self.session.previous()
    }

    /// First step of a manual submit; see [`SubmitConfirmation::message`].
    #[must_use]
    pub fn request_submit(&self) -> Option<SubmitConfirmation> {
        self.session.request_submit()
    }

    /// Completes a manual submit the user confirmed.
    ///
    /// Returns as soon as the result is computed; the history write is left
    /// running, see [`ActiveQuiz::saved`].
    ///
    /// # Errors
    ///
    /// Returns `SubmitError::AlreadySubmitted` if the attempt already ended;
    /// nothing is appended to history in that case.
    pub fn confirm_submit(
        &mut self,
        confirmation: SubmitConfirmation,
    ) -> Result<&SessionOutcome, SubmitError> {
        self.finish(SubmitTrigger::Confirmed(confirmation))
    }

    /// Waits for the background history write and records how it ended.
    ///
    /// `None` before submission. Dropping this future leaves the write
    /// running and the outcome `Pending`.
    pub async fn saved(&mut self) -> Option<Persistence> {
        if let Some(save) = self.save.as_mut() {
            let persisted = save.await.unwrap_or_else(|err| {
                warn!(error = %err, "history write task did not complete");
                false
            });
            self.save = None;
            if let Some(outcome) = self.outcome.as_mut() {
                outcome.persistence = if persisted {
                    Persistence::Saved
                } else {
                    Persistence::Failed
                };
            }
        }
        self.outcome.as_ref().map(|o| o.persistence)
    }

    /// Waits for the next countdown tick. Never resolves without a timer.
    pub async fn wait_tick(&mut self) {
        match self.timer.as_mut() {
            Some(timer) => {
                if timer.next_tick().await.is_none() {
                    self.timer = None;
                    std::future::pending::<()>().await;
                }
            }
            None => std::future::pending::<()>().await,
        }
    }

    /// Applies one countdown tick, auto-submitting when time runs out.
    ///
    /// Ticks that arrive after the attempt ended are ignored.
    pub fn handle_tick(&mut self) -> Tick {
        let tick = self.session.tick();
        if tick == Tick::Expired {
            info!(test = %self.session.test().id, "time expired, submitting");
            if let Err(err) = self.finish(SubmitTrigger::Expired) {
                debug!(error = %err, "expiry after submission ignored");
            }
        }
        tick
    }

    /// Leaves the attempt without scoring it.
    pub fn abandon(mut self) {
        self.stop_timer();
        debug!(test = %self.session.test().id, "attempt abandoned");
    }

    /// Review partition of the finished attempt.
    #[must_use]
    pub fn review(&self) -> Option<ReviewPartition> {
        let outcome = self.outcome.as_ref()?;
        Some(ReviewPartition::new(
            &self.session.test().questions,
            &outcome.answers,
        ))
    }

    fn stop_timer(&mut self) {
        if let Some(mut timer) = self.timer.take() {
            timer.cancel();
        }
    }

    fn spawn_save(&self, result: &TestResult) -> Option<JoinHandle<bool>> {
        let Ok(runtime) = Handle::try_current() else {
            error!(result = %result.id(), "no runtime to save test result");
            return None;
        };
        let history = Arc::clone(&self.history);
        let result = result.clone();
        Some(runtime.spawn(async move {
            match history.append(&result).await {
                Ok(()) => true,
                Err(err) => {
                    error!(error = %err, result = %result.id(), "failed to save test result");
                    false
                }
            }
        }))
    }

    fn finish(&mut self, trigger: SubmitTrigger) -> Result<&SessionOutcome, SubmitError> {
        if self.session.is_submitted() {
            return Err(SubmitError::AlreadySubmitted);
        }
        let result = self
            .session
            .submit(trigger, ResultId::generate(), self.clock.now())?;
        self.stop_timer();

        info!(
            test = %result.test_id(),
            mode = %result.mode(),
            score = result.score(),
            max_score = result.max_score(),
            "attempt submitted"
        );

        let save = self.spawn_save(&result);
        let persistence = if save.is_some() {
            Persistence::Pending
        } else {
            Persistence::Failed
        };
        self.save = save;

        let outcome = SessionOutcome {
            result,
            answers: self.session.answers().to_vec(),
            persistence,
        };
        Ok(self.outcome.insert(outcome))
    }
}

impl fmt::Debug for ActiveQuiz {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveQuiz")
            .field("session", &self.session)
            .field("timer_running", &self.timer.is_some())
            .field("clock", &self.clock)
            .field("outcome", &self.outcome)
            .field("save_pending", &self.save.is_some())
            .finish_non_exhaustive()
    }
}
