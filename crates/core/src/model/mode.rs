use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a mode name is not recognised.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown session mode: {0}")]
pub struct ParseModeError(String);

/// How an attempt is run. Fixed when the session starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionMode {
    /// Countdown-bounded; feedback deferred to the end.
    Timed,
    /// Untimed; each question locks on first answer and reveals feedback.
    Practice,
}

/// What a mode allows. Every mode-dependent branch of the session engine
/// reads this table instead of matching on the mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeRules {
    /// A countdown runs and expiry submits the attempt.
    pub countdown: bool,
    /// An answered slot may be replaced before submission.
    pub overwrite_answers: bool,
    /// Feedback for a question is shown as soon as it is answered.
    pub reveal_on_answer: bool,
}

const TIMED_RULES: ModeRules = ModeRules {
    countdown: true,
    overwrite_answers: true,
    reveal_on_answer: false,
};

const PRACTICE_RULES: ModeRules = ModeRules {
    countdown: false,
    overwrite_answers: false,
    reveal_on_answer: true,
};

impl SessionMode {
    #[must_use]
    pub const fn rules(self) -> ModeRules {
        match self {
            SessionMode::Timed => TIMED_RULES,
            SessionMode::Practice => PRACTICE_RULES,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SessionMode::Timed => "timed",
            SessionMode::Practice => "practice",
        }
    }
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "timed" => Ok(SessionMode::Timed),
            "practice" => Ok(SessionMode::Practice),
            _ => Err(ParseModeError(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_table_matches_modes() {
        let timed = SessionMode::Timed.rules();
        assert!(timed.countdown && timed.overwrite_answers && !timed.reveal_on_answer);

        let practice = SessionMode::Practice.rules();
        assert!(!practice.countdown && !practice.overwrite_answers && practice.reveal_on_answer);
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Timed".parse::<SessionMode>().unwrap(), SessionMode::Timed);
        assert_eq!(
            "practice".parse::<SessionMode>().unwrap(),
            SessionMode::Practice
        );
        assert!("exam".parse::<SessionMode>().is_err());
    }
}
