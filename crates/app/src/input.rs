//! Line commands accepted while taking and reviewing a test.

use quiz_core::review::ReviewFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptInput {
    /// Zero-based option index.
    Choose(usize),
    Next,
    Previous,
    /// Zero-based question index.
    GoTo(usize),
    Mark,
    Submit,
    Quit,
    Help,
    Empty,
    Unknown,
}

/// Parses one line typed during an attempt.
///
/// Command letters win over option letters, so options are picked by letter
/// only outside `n p g m s q h`. Numbers always pick options, one-based.
#[must_use]
pub fn parse_attempt(line: &str) -> AttemptInput {
    let line = line.trim();
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return AttemptInput::Empty;
    };
    let head = head.to_ascii_lowercase();

    match head.as_str() {
        "n" | "next" => return AttemptInput::Next,
        "p" | "prev" => return AttemptInput::Previous,
        "m" | "mark" => return AttemptInput::Mark,
        "s" | "submit" => return AttemptInput::Submit,
        "q" | "quit" => return AttemptInput::Quit,
        "h" | "help" | "?" => return AttemptInput::Help,
        "g" | "go" => {
            return words
                .next()
                .and_then(one_based)
                .map_or(AttemptInput::Unknown, AttemptInput::GoTo);
        }
        _ => {}
    }

    if let Some(index) = one_based(&head) {
        return AttemptInput::Choose(index);
    }
    let mut chars = head.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_lowercase() => {
            AttemptInput::Choose(usize::from(c as u8 - b'a'))
        }
        _ => AttemptInput::Unknown,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewInput {
    Filter(ReviewFilter),
    Next,
    Previous,
    Quit,
    Unknown,
}

#[must_use]
pub fn parse_review(line: &str) -> ReviewInput {
    match line.trim().to_ascii_lowercase().as_str() {
        "a" | "all" => ReviewInput::Filter(ReviewFilter::All),
        "c" | "correct" => ReviewInput::Filter(ReviewFilter::Correct),
        "i" | "incorrect" => ReviewInput::Filter(ReviewFilter::Incorrect),
        "u" | "s" | "skipped" | "unanswered" => ReviewInput::Filter(ReviewFilter::Unanswered),
        "n" | "next" | "" => ReviewInput::Next,
        "p" | "prev" => ReviewInput::Previous,
        "q" | "quit" | "done" => ReviewInput::Quit,
        _ => ReviewInput::Unknown,
    }
}

/// `y`/`yes`, case-insensitive.
#[must_use]
pub fn is_yes(line: &str) -> bool {
    matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn one_based(raw: &str) -> Option<usize> {
    raw.parse::<usize>().ok()?.checked_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_by_letter_or_number() {
        assert_eq!(parse_attempt("a"), AttemptInput::Choose(0));
        assert_eq!(parse_attempt(" C "), AttemptInput::Choose(2));
        assert_eq!(parse_attempt("4"), AttemptInput::Choose(3));
        assert_eq!(parse_attempt("0"), AttemptInput::Unknown);
        assert_eq!(parse_attempt("ab"), AttemptInput::Unknown);
    }

    #[test]
    fn commands_take_precedence() {
        assert_eq!(parse_attempt("n"), AttemptInput::Next);
        assert_eq!(parse_attempt("P"), AttemptInput::Previous);
        assert_eq!(parse_attempt("m"), AttemptInput::Mark);
        assert_eq!(parse_attempt("s"), AttemptInput::Submit);
        assert_eq!(parse_attempt("q"), AttemptInput::Quit);
        assert_eq!(parse_attempt("   "), AttemptInput::Empty);
    }

    #[test]
    fn go_to_is_one_based() {
        assert_eq!(parse_attempt("g 12"), AttemptInput::GoTo(11));
        assert_eq!(parse_attempt("go 1"), AttemptInput::GoTo(0));
        assert_eq!(parse_attempt("g"), AttemptInput::Unknown);
        assert_eq!(parse_attempt("g zero"), AttemptInput::Unknown);
    }

    #[test]
    fn review_commands() {
        assert_eq!(
            parse_review("skipped"),
            ReviewInput::Filter(ReviewFilter::Unanswered)
        );
        assert_eq!(parse_review("I"), ReviewInput::Filter(ReviewFilter::Incorrect));
        assert_eq!(parse_review(""), ReviewInput::Next);
        assert_eq!(parse_review("x"), ReviewInput::Unknown);
    }

    #[test]
    fn confirmation_answers() {
        assert!(is_yes("Y"));
        assert!(is_yes(" yes "));
        assert!(!is_yes(""));
        assert!(!is_yes("no"));
    }
}
