use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{ResultId, SessionMode, TestId};
use crate::scoring::ScoreCard;

/// Immutable scored summary of a completed session.
///
/// Field names match the persisted history blob, so `max_score` is stored
/// as `total` and elapsed seconds as `timeSpent`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    id: ResultId,
    test_id: TestId,
    test_name: String,
    mode: SessionMode,
    score: i32,
    #[serde(rename = "total")]
    max_score: i32,
    percentage: f64,
    correct: u32,
    incorrect: u32,
    unanswered: u32,
    date: DateTime<Utc>,
    time_spent: u64,
}

impl TestResult {
    /// Builds a result from a graded attempt.
    #[must_use]
    pub fn from_scorecard(
        id: ResultId,
        test_id: TestId,
        test_name: impl Into<String>,
        mode: SessionMode,
        card: &ScoreCard,
        date: DateTime<Utc>,
        time_spent_secs: u64,
    ) -> Self {
        Self {
            id,
            test_id,
            test_name: test_name.into(),
            mode,
            score: card.score,
            max_score: card.max_score,
            percentage: card.percentage,
            correct: card.correct,
            incorrect: card.incorrect,
            unanswered: card.unanswered,
            date,
            time_spent: time_spent_secs,
        }
    }

    #[must_use]
    pub fn id(&self) -> ResultId {
        self.id
    }

    #[must_use]
    pub fn test_id(&self) -> &TestId {
        &self.test_id
    }

    #[must_use]
    pub fn test_name(&self) -> &str {
        &self.test_name
    }

    #[must_use]
    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    #[must_use]
    pub fn score(&self) -> i32 {
        self.score
    }

    #[must_use]
    pub fn max_score(&self) -> i32 {
        self.max_score
    }

    #[must_use]
    pub fn percentage(&self) -> f64 {
        self.percentage
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn incorrect(&self) -> u32 {
        self.incorrect
    }

    #[must_use]
    pub fn unanswered(&self) -> u32 {
        self.unanswered
    }

    #[must_use]
    pub fn question_count(&self) -> u32 {
        self.correct + self.incorrect + self.unanswered
    }

    #[must_use]
    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    /// Elapsed seconds for the attempt.
    #[must_use]
    pub fn time_spent_secs(&self) -> u64 {
        self.time_spent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn serializes_with_history_field_names() {
        let card = ScoreCard {
            correct: 2,
            incorrect: 1,
            unanswered: 2,
            score: 7,
            max_score: 20,
            percentage: 40.0,
        };
        let result = TestResult::from_scorecard(
            ResultId::generate(),
            TestId::new("btr_1"),
            "Grand Test 1",
            SessionMode::Timed,
            &card,
            fixed_now(),
            95,
        );

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["testId"], "btr_1");
        assert_eq!(value["mode"], "timed");
        assert_eq!(value["total"], 20);
        assert_eq!(value["timeSpent"], 95);
        assert_eq!(value["date"], "2023-11-14T22:13:20Z");

        let back: TestResult = serde_json::from_value(value).unwrap();
        assert_eq!(back, result);
        assert_eq!(back.question_count(), 5);
    }
}
