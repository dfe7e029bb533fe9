//! Post-submission review views over a finished attempt.

use crate::model::{AnswerSlot, Question, TestResult, Verdict};

/// Named subsets of questions shown after an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReviewFilter {
    All,
    Correct,
    Incorrect,
    Unanswered,
}

impl ReviewFilter {
    pub const ALL: [ReviewFilter; 4] = [
        ReviewFilter::All,
        ReviewFilter::Correct,
        ReviewFilter::Incorrect,
        ReviewFilter::Unanswered,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ReviewFilter::All => "All",
            ReviewFilter::Correct => "Correct",
            ReviewFilter::Incorrect => "Incorrect",
            ReviewFilter::Unanswered => "Skipped",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

/// One question as it appears in review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewItem<'a> {
    pub index: usize,
    pub question: &'a Question,
    pub chosen: Option<usize>,
    pub correct_index: Option<usize>,
    pub verdict: Verdict,
}

/// Question indices split by verdict, using the same predicate as scoring.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReviewPartition {
    all: Vec<usize>,
    correct: Vec<usize>,
    incorrect: Vec<usize>,
    unanswered: Vec<usize>,
}

impl ReviewPartition {
    #[must_use]
    pub fn new(questions: &[Question], answers: &[AnswerSlot]) -> Self {
        let mut partition = Self::default();
        for (index, question) in questions.iter().enumerate() {
            partition.all.push(index);
            let slot = answers.get(index).copied().unwrap_or_default();
            match Verdict::of(question, slot) {
                Verdict::Correct => partition.correct.push(index),
                Verdict::Incorrect => partition.incorrect.push(index),
                Verdict::Unanswered => partition.unanswered.push(index),
            }
        }
        partition
    }

    #[must_use]
    pub fn indices(&self, filter: ReviewFilter) -> &[usize] {
        match filter {
            ReviewFilter::All => &self.all,
            ReviewFilter::Correct => &self.correct,
            ReviewFilter::Incorrect => &self.incorrect,
            ReviewFilter::Unanswered => &self.unanswered,
        }
    }

    #[must_use]
    pub fn count(&self, filter: ReviewFilter) -> usize {
        self.indices(filter).len()
    }

    /// True when the partition reproduces the counts stored on `result`.
    #[must_use]
    pub fn agrees_with(&self, result: &TestResult) -> bool {
        let same = |filter, stored: u32| {
            usize::try_from(stored).is_ok_and(|stored| stored == self.count(filter))
        };
        same(ReviewFilter::Correct, result.correct())
            && same(ReviewFilter::Incorrect, result.incorrect())
            && same(ReviewFilter::Unanswered, result.unanswered())
            && same(ReviewFilter::All, result.question_count())
    }

    /// Neighbour of `from` within `filter`, or `None` at either end or when
    /// `from` is not part of the filter.
    #[must_use]
    pub fn step(&self, filter: ReviewFilter, from: usize, direction: Direction) -> Option<usize> {
        let indices = self.indices(filter);
        let position = indices.iter().position(|i| *i == from)?;
        match direction {
            Direction::Previous => position.checked_sub(1).map(|p| indices[p]),
            Direction::Next => indices.get(position + 1).copied(),
        }
    }
}

/// Detail view of one question, or `None` when `index` is out of range.
#[must_use]
pub fn review_item<'a>(
    questions: &'a [Question],
    answers: &[AnswerSlot],
    index: usize,
) -> Option<ReviewItem<'a>> {
    let question = questions.get(index)?;
    let slot = answers.get(index).copied().unwrap_or_default();
    Some(ReviewItem {
        index,
        question,
        chosen: slot.option_index(),
        correct_index: question.correct_index(),
        verdict: Verdict::of(question, slot),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{QuestionId, QuestionOption, ResultId, SessionMode, TestId};
    use crate::scoring::score_answers;
    use crate::time::fixed_now;

    fn questions(n: u32) -> Vec<Question> {
        (1..=n)
            .map(|id| Question {
                id: QuestionId::new(id),
                text: format!("Q{id}"),
                options: vec![
                    QuestionOption::new("A", "no", false),
                    QuestionOption::new("B", "yes", true),
                ],
                correct_answer: "B".into(),
                explanation: String::new(),
            })
            .collect()
    }

    fn sample() -> (Vec<Question>, Vec<AnswerSlot>) {
        let qs = questions(6);
        let answers = vec![
            AnswerSlot::Answered(1),
            AnswerSlot::Unanswered,
            AnswerSlot::Answered(0),
            AnswerSlot::Answered(1),
            AnswerSlot::Answered(7),
            AnswerSlot::Unanswered,
        ];
        (qs, answers)
    }

    #[test]
    fn partitions_exhaustively_and_disjointly() {
        let (qs, answers) = sample();
        let partition = ReviewPartition::new(&qs, &answers);

        assert_eq!(partition.indices(ReviewFilter::Correct), &[0, 3]);
        assert_eq!(partition.indices(ReviewFilter::Incorrect), &[2, 4]);
        assert_eq!(partition.indices(ReviewFilter::Unanswered), &[1, 5]);
        assert_eq!(
            partition.count(ReviewFilter::All),
            partition.count(ReviewFilter::Correct)
                + partition.count(ReviewFilter::Incorrect)
                + partition.count(ReviewFilter::Unanswered)
        );
    }

    #[test]
    fn agrees_with_scored_result() {
        let (qs, answers) = sample();
        let card = score_answers(&qs, &answers);
        let result = TestResult::from_scorecard(
            ResultId::generate(),
            TestId::new("btr_1"),
            "T",
            SessionMode::Timed,
            &card,
            fixed_now(),
            0,
        );
        let partition = ReviewPartition::new(&qs, &answers);
        assert!(partition.agrees_with(&result));

        let other = ReviewPartition::new(&qs, &[AnswerSlot::Unanswered; 6]);
        assert!(!other.agrees_with(&result));
    }

    #[test]
    fn steps_within_filter() {
        let (qs, answers) = sample();
        let partition = ReviewPartition::new(&qs, &answers);

        assert_eq!(
            partition.step(ReviewFilter::Incorrect, 2, Direction::Next),
            Some(4)
        );
        assert_eq!(
            partition.step(ReviewFilter::Incorrect, 4, Direction::Next),
            None
        );
        assert_eq!(
            partition.step(ReviewFilter::Incorrect, 2, Direction::Previous),
            None
        );
        assert_eq!(partition.step(ReviewFilter::Correct, 2, Direction::Next), None);
        assert_eq!(partition.step(ReviewFilter::All, 2, Direction::Previous), Some(1));
    }

    #[test]
    fn review_item_reports_choice() {
        let (qs, answers) = sample();
        let item = review_item(&qs, &answers, 2).unwrap();
        assert_eq!(item.chosen, Some(0));
        assert_eq!(item.correct_index, Some(1));
        assert_eq!(item.verdict, Verdict::Incorrect);
        assert!(review_item(&qs, &answers, 6).is_none());
    }
}
