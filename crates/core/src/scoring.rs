//! Pure scoring of recorded answers.
//!
//! Mode only decides how answers could be entered; it never changes how they
//! are scored, so nothing in here knows about sessions or timers.

use crate::model::{AnswerSlot, Question, Verdict};

/// Points awarded for a correct answer.
pub const CORRECT_POINTS: i32 = 4;
/// Points deducted for an incorrect answer.
pub const INCORRECT_PENALTY: i32 = 1;

/// Aggregate outcome of grading every slot of an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoreCard {
    pub correct: u32,
    pub incorrect: u32,
    pub unanswered: u32,
    pub score: i32,
    pub max_score: i32,
    pub percentage: f64,
}

impl ScoreCard {
    #[must_use]
    pub fn question_count(&self) -> u32 {
        self.correct + self.incorrect + self.unanswered
    }
}

/// Grades `answers` against `questions`.
///
/// Slots are paired by position. If `answers` is shorter than `questions`
/// the missing tail counts as unanswered; extra slots are ignored.
#[must_use]
pub fn score_answers(questions: &[Question], answers: &[AnswerSlot]) -> ScoreCard {
    let mut card = ScoreCard::default();

    for (index, question) in questions.iter().enumerate() {
        let slot = answers.get(index).copied().unwrap_or_default();
        match Verdict::of(question, slot) {
            Verdict::Correct => card.correct += 1,
            Verdict::Incorrect => card.incorrect += 1,
            Verdict::Unanswered => card.unanswered += 1,
        }
    }

    let total = u32::try_from(questions.len()).unwrap_or(u32::MAX);
    let correct = i32::try_from(card.correct).unwrap_or(i32::MAX);
    let incorrect = i32::try_from(card.incorrect).unwrap_or(i32::MAX);

    card.score = correct
        .saturating_mul(CORRECT_POINTS)
        .saturating_sub(incorrect.saturating_mul(INCORRECT_PENALTY));
    card.max_score = i32::try_from(total)
        .unwrap_or(i32::MAX)
        .saturating_mul(CORRECT_POINTS);
    card.percentage = if total == 0 {
        0.0
    } else {
        f64::from(card.correct) / f64::from(total) * 100.0
    };

    card
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{QuestionId, QuestionOption};

    fn question(id: u32, correct: usize) -> Question {
        let options = (0..4)
            .map(|i| {
                let label = char::from(b'A' + u8::try_from(i).unwrap()).to_string();
                QuestionOption::new(label, format!("option {i}"), i == correct)
            })
            .collect();
        Question {
            id: QuestionId::new(id),
            text: format!("Q{id}"),
            options,
            correct_answer: String::new(),
            explanation: String::new(),
        }
    }

    #[test]
    fn five_question_example() {
        let questions: Vec<_> = (1..=5).map(|id| question(id, 0)).collect();
        let answers = [
            AnswerSlot::Answered(0),
            AnswerSlot::Answered(0),
            AnswerSlot::Answered(2),
            AnswerSlot::Unanswered,
            AnswerSlot::Unanswered,
        ];

        let card = score_answers(&questions, &answers);

        assert_eq!(card.correct, 2);
        assert_eq!(card.incorrect, 1);
        assert_eq!(card.unanswered, 2);
        assert_eq!(card.score, 7);
        assert_eq!(card.max_score, 20);
        assert!((card.percentage - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_test_scores_zero_percent() {
        let card = score_answers(&[], &[]);
        assert_eq!(card.question_count(), 0);
        assert_eq!(card.max_score, 0);
        assert_eq!(card.percentage, 0.0);
    }

    #[test]
    fn all_wrong_goes_negative() {
        let questions: Vec<_> = (1..=3).map(|id| question(id, 1)).collect();
        let answers = [AnswerSlot::Answered(0); 3];
        let card = score_answers(&questions, &answers);
        assert_eq!(card.score, -3);
        assert_eq!(card.percentage, 0.0);
    }

    #[test]
    fn short_answer_list_counts_missing_as_unanswered() {
        let questions: Vec<_> = (1..=3).map(|id| question(id, 3)).collect();
        let card = score_answers(&questions, &[AnswerSlot::Answered(3)]);
        assert_eq!(card.correct, 1);
        assert_eq!(card.unanswered, 2);
    }
}
