mod answer;
mod ids;
mod mode;
mod question;
mod result;
mod session;
mod subject;

pub use answer::{AnswerSlot, Verdict};
pub use ids::{ParseIdError, QuestionId, ResultId, TestId};
pub use mode::{ModeRules, ParseModeError, SessionMode};
pub use question::{DEFAULT_DURATION_MINUTES, Question, QuestionOption, Test, TestSummary};
pub use result::TestResult;
pub use session::{
    Feedback, QuizSession, Selection, SubmitConfirmation, SubmitError, SubmitTrigger, Tick,
};
pub use subject::Subject;
