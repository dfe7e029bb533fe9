use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{
    AnswerSlot, ModeRules, Question, ResultId, SessionMode, Test, TestResult, Verdict,
};
use crate::scoring::score_answers;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SubmitError {
    #[error("session already submitted")]
    AlreadySubmitted,
    /// An expiry submit on a session whose countdown has not reached zero.
    #[error("countdown has not expired")]
    NotExpired,
}

//
// ─── OUTCOMES ──────────────────────────────────────────────────────────────────
//

/// What happened to a `select_answer` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Recorded,
    /// The slot is already set and the mode does not allow overwriting.
    Locked,
    Submitted,
    /// The test has no questions.
    NoQuestion,
}

/// Result of advancing the countdown by one second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Running(u32),
    /// The countdown just reached zero; the session must be auto-submitted.
    Expired,
    /// No countdown in this mode, or the session is already submitted.
    Inactive,
}

/// How a submission was triggered.
#[derive(Debug)]
pub enum SubmitTrigger {
    /// The user confirmed a prompt obtained from [`QuizSession::request_submit`].
    Confirmed(SubmitConfirmation),
    /// The countdown ran out. No confirmation needed.
    Expired,
}

/// Pending manual submission. Dropping it cancels the submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitConfirmation {
    unanswered: usize,
}

impl SubmitConfirmation {
    #[must_use]
    pub fn unanswered(&self) -> usize {
        self.unanswered
    }

    /// Prompt text shown before a manual submit.
    #[must_use]
    pub fn message(&self) -> String {
        match self.unanswered {
            0 => "Submit your test?".to_owned(),
            1 => "You have 1 unanswered question. Submit anyway?".to_owned(),
            n => format!("You have {n} unanswered questions. Submit anyway?"),
        }
    }
}

/// Immediate feedback for the current question in modes that reveal on answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback<'a> {
    pub chosen: usize,
    pub correct_index: Option<usize>,
    pub verdict: Verdict,
    pub explanation: &'a str,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Mutable state of one attempt at a test.
///
/// `answers` and `marked` always hold one entry per question. Once submitted,
/// answers and the countdown are frozen.
#[derive(Debug, Clone)]
pub struct QuizSession {
    test: Arc<Test>,
    mode: SessionMode,
    answers: Vec<AnswerSlot>,
    marked: Vec<bool>,
    current: usize,
    time_remaining: u32,
    started_at: DateTime<Utc>,
    submitted_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    #[must_use]
    pub fn new(test: Arc<Test>, mode: SessionMode, started_at: DateTime<Utc>) -> Self {
        let count = test.questions.len();
        let time_remaining = test.duration_secs();
        Self {
            test,
            mode,
            answers: vec![AnswerSlot::Unanswered; count],
            marked: vec![false; count],
            current: 0,
            time_remaining,
            started_at,
            submitted_at: None,
        }
    }

    #[must_use]
    pub fn test(&self) -> &Test {
        &self.test
    }

    #[must_use]
    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    fn rules(&self) -> ModeRules {
        self.mode.rules()
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.test.questions.len()
    }

    #[must_use]
    pub fn answers(&self) -> &[AnswerSlot] {
        &self.answers
    }

    #[must_use]
    pub fn marked(&self) -> &[bool] {
        &self.marked
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.test.questions.get(self.current)
    }

    #[must_use]
    pub fn current_slot(&self) -> AnswerSlot {
        self.answers.get(self.current).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn is_current_marked(&self) -> bool {
        self.marked.get(self.current).copied().unwrap_or(false)
    }

    /// Seconds left on the countdown. Only meaningful in modes with a countdown.
    #[must_use]
    pub fn time_remaining_secs(&self) -> u32 {
        self.time_remaining
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn submitted_at(&self) -> Option<DateTime<Utc>> {
        self.submitted_at
    }

    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.submitted_at.is_some()
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|slot| slot.is_answered()).count()
    }

    #[must_use]
    pub fn unanswered_count(&self) -> usize {
        self.answers.len() - self.answered_count()
    }

    /// Records `option` for the current question.
    ///
    /// The index is trusted; an index outside the option list is kept and
    /// later graded as incorrect.
    pub fn select_answer(&mut self, option: usize) -> Selection {
        if self.is_submitted() {
            return Selection::Submitted;
        }
        let overwrite = self.rules().overwrite_answers;
        let Some(slot) = self.answers.get_mut(self.current) else {
            return Selection::NoQuestion;
        };
        if slot.is_answered() && !overwrite {
            return Selection::Locked;
        }
        *slot = AnswerSlot::Answered(option);
        Selection::Recorded
    }

    /// Flips the review mark on the current question and returns the new state.
    ///
    /// Still allowed after submission; marks never affect scoring.
    pub fn toggle_mark(&mut self) -> bool {
        match self.marked.get_mut(self.current) {
            Some(mark) => {
                *mark = !*mark;
                *mark
            }
            None => false,
        }
    }

    /// Jumps to `index`. Returns `false` and stays put when out of range.
    pub fn go_to(&mut self, index: usize) -> bool {
        if index >= self.question_count() {
            return false;
        }
        self.current = index;
        true
    }

    /// Moves forward one question; no-op on the last one.
    pub fn next(&mut self) -> bool {
        if self.current + 1 < self.question_count() {
            self.current += 1;
            true
        } else {
            false
        }
    }

    /// Moves back one question; no-op on the first one.
    pub fn previous(&mut self) -> bool {
        if self.current > 0 {
            self.current -= 1;
            true
        } else {
            false
        }
    }

    /// Advances the countdown by one second.
    pub fn tick(&mut self) -> Tick {
        if !self.rules().countdown || self.is_submitted() || self.time_remaining == 0 {
            return Tick::Inactive;
        }
        self.time_remaining -= 1;
        if self.time_remaining == 0 {
            Tick::Expired
        } else {
            Tick::Running(self.time_remaining)
        }
    }

    /// Starts a manual submission. `None` once the session is submitted.
    #[must_use]
    pub fn request_submit(&self) -> Option<SubmitConfirmation> {
        if self.is_submitted() {
            return None;
        }
        Some(SubmitConfirmation {
            unanswered: self.unanswered_count(),
        })
    }

    /// Seconds spent on the attempt as of `now`.
    ///
    /// Countdown modes derive it from the remaining time; other modes use the
    /// wall clock since `started_at`, which is only advisory.
    #[must_use]
    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> u64 {
        if self.rules().countdown {
            u64::from(self.test.duration_secs().saturating_sub(self.time_remaining))
        } else {
            let end = self.submitted_at.unwrap_or(now);
            u64::try_from((end - self.started_at).num_seconds()).unwrap_or(0)
        }
    }

    /// Scores the attempt and freezes the session.
    ///
    /// # Errors
    ///
    /// Returns `SubmitError::AlreadySubmitted` on any call after the first, so
    /// at most one result exists per session. Returns `SubmitError::NotExpired`
    /// for `SubmitTrigger::Expired` unless the countdown has reached zero.
    pub fn submit(
        &mut self,
        trigger: SubmitTrigger,
        id: ResultId,
        now: DateTime<Utc>,
    ) -> Result<TestResult, SubmitError> {
        if self.is_submitted() {
            return Err(SubmitError::AlreadySubmitted);
        }
        if let SubmitTrigger::Expired = trigger {
            if !self.rules().countdown || self.time_remaining > 0 {
                return Err(SubmitError::NotExpired);
            }
        }

        let card = score_answers(&self.test.questions, &self.answers);
        let elapsed = self.elapsed_secs(now);
        self.submitted_at = Some(now);

        Ok(TestResult::from_scorecard(
            id,
            self.test.id.clone(),
            self.test.name.clone(),
            self.mode,
            &card,
            now,
            elapsed,
        ))
    }

    /// Feedback for the current question, once answered, in modes that reveal
    /// on answer.
    #[must_use]
    pub fn feedback(&self) -> Option<Feedback<'_>> {
        if !self.rules().reveal_on_answer {
            return None;
        }
        let question = self.current_question()?;
        let slot = self.current_slot();
        let chosen = slot.option_index()?;
        Some(Feedback {
            chosen,
            correct_index: question.correct_index(),
            verdict: Verdict::of(question, slot),
            explanation: &question.explanation,
        })
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{QuestionId, QuestionOption, TestId};
    use crate::time::fixed_now;
    use chrono::Duration;

    fn build_test(questions: u32, duration: Option<u32>) -> Arc<Test> {
        let questions: Vec<Question> = (1..=questions)
            .map(|id| Question {
                id: QuestionId::new(id),
                text: format!("Q{id}"),
                options: vec![
                    QuestionOption::new("A", "right", true),
                    QuestionOption::new("B", "wrong", false),
                    QuestionOption::new("C", "wrong", false),
                ],
                correct_answer: "A".into(),
                explanation: format!("because {id}"),
            })
            .collect();
        Arc::new(Test {
            id: TestId::new("btr_1"),
            name: "Grand Test".into(),
            question_count: u32::try_from(questions.len()).unwrap(),
            duration,
            questions,
        })
    }

    fn assert_parallel(session: &QuizSession) {
        assert_eq!(session.answers().len(), session.question_count());
        assert_eq!(session.marked().len(), session.question_count());
    }

    #[test]
    fn new_session_starts_blank() {
        let session = QuizSession::new(build_test(4, None), SessionMode::Timed, fixed_now());
        assert_parallel(&session);
        assert!(session.answers().iter().all(|s| *s == AnswerSlot::Unanswered));
        assert!(session.marked().iter().all(|m| !m));
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.time_remaining_secs(), 210 * 60);
        assert!(!session.is_submitted());
    }

    #[test]
    fn timed_mode_allows_overwrite() {
        let mut session = QuizSession::new(build_test(2, Some(10)), SessionMode::Timed, fixed_now());
        for option in [0, 2, 1, 0] {
            assert_eq!(session.select_answer(option), Selection::Recorded);
            assert_eq!(session.current_slot(), AnswerSlot::Answered(option));
        }
        assert!(session.feedback().is_none());
    }

    #[test]
    fn practice_mode_locks_first_answer() {
        let mut session =
            QuizSession::new(build_test(2, None), SessionMode::Practice, fixed_now());
        assert_eq!(session.select_answer(1), Selection::Recorded);
        assert_eq!(session.select_answer(0), Selection::Locked);
        assert_eq!(session.answers()[0], AnswerSlot::Answered(1));

        let feedback = session.feedback().unwrap();
        assert_eq!(feedback.chosen, 1);
        assert_eq!(feedback.correct_index, Some(0));
        assert_eq!(feedback.verdict, Verdict::Incorrect);
        assert_eq!(feedback.explanation, "because 1");

        session.next();
        assert!(session.feedback().is_none());
        assert_eq!(session.select_answer(0), Selection::Recorded);
    }

    #[test]
    fn navigation_stops_at_bounds() {
        let mut session = QuizSession::new(build_test(3, None), SessionMode::Timed, fixed_now());
        assert!(!session.previous());
        assert!(session.next());
        assert!(session.next());
        assert!(!session.next());
        assert_eq!(session.current_index(), 2);
        assert!(!session.go_to(3));
        assert!(session.go_to(0));
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn marks_toggle_and_survive_submission() {
        let mut session = QuizSession::new(build_test(2, None), SessionMode::Timed, fixed_now());
        assert!(session.toggle_mark());
        assert!(!session.toggle_mark());
        assert!(session.toggle_mark());

        let confirmation = session.request_submit().unwrap();
        session
            .submit(SubmitTrigger::Confirmed(confirmation), ResultId::generate(), fixed_now())
            .unwrap();

        assert!(!session.toggle_mark());
        assert_parallel(&session);
    }

    #[test]
    fn submitted_session_ignores_mutation() {
        let mut session = QuizSession::new(build_test(2, Some(1)), SessionMode::Timed, fixed_now());
        session.select_answer(0);
        let confirmation = session.request_submit().unwrap();
        assert_eq!(confirmation.unanswered(), 1);
        session
            .submit(SubmitTrigger::Confirmed(confirmation), ResultId::generate(), fixed_now())
            .unwrap();

        assert_eq!(session.select_answer(1), Selection::Submitted);
        assert_eq!(session.answers()[0], AnswerSlot::Answered(0));
        assert_eq!(session.tick(), Tick::Inactive);
        assert_eq!(session.time_remaining_secs(), 60);
        assert!(session.request_submit().is_none());
    }

    #[test]
    fn second_submit_is_rejected() {
        let mut session = QuizSession::new(build_test(1, None), SessionMode::Timed, fixed_now());
        let first = session.request_submit().unwrap();
        let second = session.request_submit().unwrap();

        assert!(
            session
                .submit(SubmitTrigger::Confirmed(first), ResultId::generate(), fixed_now())
                .is_ok()
        );
        let err = session
            .submit(SubmitTrigger::Confirmed(second), ResultId::generate(), fixed_now())
            .unwrap_err();
        assert_eq!(err, SubmitError::AlreadySubmitted);
        assert_eq!(
            session
                .submit(SubmitTrigger::Expired, ResultId::generate(), fixed_now())
                .unwrap_err(),
            SubmitError::AlreadySubmitted
        );
    }

    #[test]
    fn countdown_expires_once() {
        let mut session = QuizSession::new(build_test(2, Some(1)), SessionMode::Timed, fixed_now());
        for expected in (1..60).rev() {
            assert_eq!(session.tick(), Tick::Running(expected));
        }
        assert_eq!(session.tick(), Tick::Expired);
        assert_eq!(session.tick(), Tick::Inactive);

        session.select_answer(0);
        let result = session
            .submit(SubmitTrigger::Expired, ResultId::generate(), fixed_now())
            .unwrap();
        assert!(session.is_submitted());
        assert_eq!(result.time_spent_secs(), 60);
        assert_eq!(result.correct(), 1);
        assert_eq!(result.unanswered(), 1);
    }

    #[test]
    fn expiry_submit_requires_elapsed_countdown() {
        let mut timed = QuizSession::new(build_test(2, Some(10)), SessionMode::Timed, fixed_now());
        timed.tick();
        let err = timed
            .submit(SubmitTrigger::Expired, ResultId::generate(), fixed_now())
            .unwrap_err();
        assert_eq!(err, SubmitError::NotExpired);
        assert!(!timed.is_submitted());
        assert_eq!(timed.time_remaining_secs(), 599);

        let mut practice =
            QuizSession::new(build_test(2, Some(10)), SessionMode::Practice, fixed_now());
        let err = practice
            .submit(SubmitTrigger::Expired, ResultId::generate(), fixed_now())
            .unwrap_err();
        assert_eq!(err, SubmitError::NotExpired);
        assert!(!practice.is_submitted());
        assert!(practice.request_submit().is_some());
    }

    #[test]
    fn practice_has_no_countdown() {
        let mut session =
            QuizSession::new(build_test(1, Some(1)), SessionMode::Practice, fixed_now());
        assert_eq!(session.tick(), Tick::Inactive);
        assert_eq!(session.time_remaining_secs(), 60);
    }

    #[test]
    fn practice_elapsed_uses_wall_clock() {
        let start = fixed_now();
        let mut session = QuizSession::new(build_test(1, None), SessionMode::Practice, start);
        let later = start + Duration::seconds(42);
        let confirmation = session.request_submit().unwrap();
        let result = session
            .submit(SubmitTrigger::Confirmed(confirmation), ResultId::generate(), later)
            .unwrap();
        assert_eq!(result.time_spent_secs(), 42);
        assert_eq!(session.elapsed_secs(later + Duration::seconds(100)), 42);
    }

    #[test]
    fn empty_test_is_inert() {
        let mut session = QuizSession::new(build_test(0, None), SessionMode::Practice, fixed_now());
        assert_eq!(session.select_answer(0), Selection::NoQuestion);
        assert!(!session.toggle_mark());
        assert!(!session.next());
        let confirmation = session.request_submit().unwrap();
        let result = session
            .submit(SubmitTrigger::Confirmed(confirmation), ResultId::generate(), fixed_now())
            .unwrap();
        assert_eq!(result.percentage(), 0.0);
        assert_eq!(result.max_score(), 0);
    }

    #[test]
    fn confirmation_message_counts_unanswered() {
        let session = QuizSession::new(build_test(3, None), SessionMode::Timed, fixed_now());
        let confirmation = session.request_submit().unwrap();
        assert_eq!(
            confirmation.message(),
            "You have 3 unanswered questions. Submit anyway?"
        );
    }
}
