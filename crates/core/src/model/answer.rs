use serde::{Deserialize, Serialize};

use crate::model::question::Question;

/// Per-question answer cell of a session.
///
/// Serializes as `null` or the chosen option index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<usize>", into = "Option<usize>")]
pub enum AnswerSlot {
    #[default]
    Unanswered,
    Answered(usize),
}

impl AnswerSlot {
    #[must_use]
    pub fn is_answered(self) -> bool {
        matches!(self, AnswerSlot::Answered(_))
    }

    #[must_use]
    pub fn option_index(self) -> Option<usize> {
        match self {
            AnswerSlot::Unanswered => None,
            AnswerSlot::Answered(index) => Some(index),
        }
    }
}

impl From<Option<usize>> for AnswerSlot {
    fn from(value: Option<usize>) -> Self {
        value.map_or(AnswerSlot::Unanswered, AnswerSlot::Answered)
    }
}

impl From<AnswerSlot> for Option<usize> {
    fn from(value: AnswerSlot) -> Self {
        value.option_index()
    }
}

/// How a single slot grades against its question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Correct,
    Incorrect,
    Unanswered,
}

impl Verdict {
    /// Grades one slot. An index past the end of the option list counts as
    /// incorrect; entry is not bounds-checked.
    #[must_use]
    pub fn of(question: &Question, slot: AnswerSlot) -> Self {
        match slot {
            AnswerSlot::Unanswered => Verdict::Unanswered,
            AnswerSlot::Answered(index) => match question.option(index) {
                Some(option) if option.correct => Verdict::Correct,
                _ => Verdict::Incorrect,
            },
        }
    }
}
