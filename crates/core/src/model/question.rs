use serde::{Deserialize, Serialize};

use crate::model::ids::{QuestionId, TestId};
use crate::model::subject::Subject;

/// Duration applied when a test does not carry one.
pub const DEFAULT_DURATION_MINUTES: u32 = 210;

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// One selectable answer of a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub label: String,
    pub text: String,
    #[serde(default)]
    pub correct: bool,
}

impl QuestionOption {
    #[must_use]
    pub fn new(label: impl Into<String>, text: impl Into<String>, correct: bool) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
            correct,
        }
    }
}

/// A multiple-choice question.
///
/// Exactly one option is expected to be marked correct, but nothing here
/// enforces it: scoring only asks whether the chosen option is correct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
    #[serde(default)]
    pub options: Vec<QuestionOption>,
    /// Label of the correct option as written by the content author.
    #[serde(default)]
    pub correct_answer: String,
    #[serde(default)]
    pub explanation: String,
}

impl Question {
    /// Index of the first option marked correct.
    #[must_use]
    pub fn correct_index(&self) -> Option<usize> {
        self.options.iter().position(|o| o.correct)
    }

    #[must_use]
    pub fn option(&self, index: usize) -> Option<&QuestionOption> {
        self.options.get(index)
    }

    #[must_use]
    pub fn has_explanation(&self) -> bool {
        !self.explanation.trim().is_empty()
    }
}

//
// ─── TEST ──────────────────────────────────────────────────────────────────────
//

/// A test owned by the question bank. Immutable at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Test {
    pub id: TestId,
    pub name: String,
    pub question_count: u32,
    /// Minutes allowed in timed mode; see [`Test::duration_minutes`].
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl Test {
    /// Duration in minutes, falling back to [`DEFAULT_DURATION_MINUTES`] when
    /// the test has none (or zero).
    #[must_use]
    pub fn duration_minutes(&self) -> u32 {
        self.duration
            .filter(|minutes| *minutes > 0)
            .unwrap_or(DEFAULT_DURATION_MINUTES)
    }

    #[must_use]
    pub fn duration_secs(&self) -> u32 {
        self.duration_minutes().saturating_mul(60)
    }

    #[must_use]
    pub fn summary(&self) -> TestSummary {
        TestSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            question_count: self.question_count,
            duration: self.duration_minutes(),
        }
    }
}

/// Test listing entry without the question payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestSummary {
    pub id: TestId,
    pub name: String,
    pub question_count: u32,
    pub duration: u32,
}

impl TestSummary {
    #[must_use]
    pub fn subject(&self) -> Subject {
        Subject::from_test_name(&self.name)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
