//! Plain-text rendering for the terminal front end.

use quiz_core::model::{
    AnswerSlot, Feedback, QuestionOption, QuizSession, Subject, TestResult, TestSummary, Verdict,
};
use quiz_core::review::{ReviewFilter, ReviewItem, ReviewPartition};

/// Countdown format: `h:mm:ss` once an hour remains, `m:ss` below that.
#[must_use]
pub fn format_clock(seconds: u32) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes}:{secs:02}")
    }
}

/// Time spent as shown with results: `Xm Ys`.
#[must_use]
pub fn format_spent(seconds: u64) -> String {
    format!("{}m {}s", seconds / 60, seconds % 60)
}

/// Percentage rounded to a whole number, as shown on result cards.
#[must_use]
pub fn format_percentage(percentage: f64) -> String {
    format!("{:.0}%", percentage.round())
}

/// Grade band used to colour results: at least 70 is good, at least 40 fair.
#[must_use]
pub fn grade(percentage: f64) -> &'static str {
    if percentage >= 70.0 {
        "good"
    } else if percentage >= 40.0 {
        "fair"
    } else {
        "poor"
    }
}

pub fn print_catalog(groups: &[(Subject, Vec<TestSummary>)]) {
    let tests = groups.iter().map(|(_, tests)| tests.len()).sum::<usize>();
    let questions: u32 = groups
        .iter()
        .flat_map(|(_, tests)| tests)
        .map(|t| t.question_count)
        .sum();
    println!("{tests} tests  |  {questions} questions");
    for (subject, tests) in groups {
        println!("\n{subject}");
        for test in tests {
            println!(
                "  {:<12} {}  ({} questions, {} min)",
                test.id.as_str(),
                test.name,
                test.question_count,
                test.duration
            );
        }
    }
}

pub fn print_history(results: &[TestResult]) {
    if results.is_empty() {
        println!("No test history yet");
        return;
    }
    for result in results {
        println!(
            "{}  {:<8} {}",
            result.date().format("%Y-%m-%d"),
            result.mode(),
            result.test_name()
        );
        println!(
            "    {} ({})  marks {}/{}  correct {}  incorrect {}  skipped {}",
            format_percentage(result.percentage()),
            grade(result.percentage()),
            result.score(),
            result.max_score(),
            result.correct(),
            result.incorrect(),
            result.unanswered()
        );
    }
}

pub fn print_question(session: &QuizSession) {
    let Some(question) = session.current_question() else {
        println!("This test has no questions. Type `s` to submit.");
        return;
    };
    let mut header = format!(
        "\nQuestion {}/{}",
        session.current_index() + 1,
        session.question_count()
    );
    if session.is_current_marked() {
        header.push_str("  [marked]");
    }
    if session.mode().rules().countdown {
        header.push_str(&format!("  time {}", format_clock(session.time_remaining_secs())));
    }
    println!("{header}");
    println!("{}", question.text);

    let chosen = session.current_slot().option_index();
    for (index, option) in question.options.iter().enumerate() {
        let pointer = if chosen == Some(index) { '>' } else { ' ' };
        println!("{pointer} {}. {}", option.label, option.text);
    }
    if let Some(feedback) = session.feedback() {
        print_feedback(question.options.as_slice(), &feedback);
    }
}

fn print_feedback(options: &[QuestionOption], feedback: &Feedback<'_>) {
    let answer = feedback
        .correct_index
        .and_then(|i| options.get(i))
        .map_or("?", |o| o.label.as_str());
    match feedback.verdict {
        Verdict::Correct => println!("Correct!"),
        _ => println!("Incorrect. Answer: {answer}"),
    }
    if !feedback.explanation.is_empty() {
        println!("{}", feedback.explanation);
    }
}

/// Cells per row of the question grid.
const GRID_WIDTH: usize = 10;

/// One grid cell: brackets mark the current question, `*` an answer and `?`
/// a review mark.
fn grid_cell(number: usize, answered: bool, marked: bool, current: bool) -> String {
    let (open, close) = if current { ('[', ']') } else { (' ', ' ') };
    let answered = if answered { '*' } else { ' ' };
    let marked = if marked { '?' } else { ' ' };
    format!("{open}{number:>3}{answered}{marked}{close}")
}

/// Question status grid, one string per row.
#[must_use]
pub fn question_grid(answers: &[AnswerSlot], marked: &[bool], current: usize) -> Vec<String> {
    let cells: Vec<String> = answers
        .iter()
        .enumerate()
        .map(|(i, slot)| {
            let is_marked = marked.get(i).copied().unwrap_or(false);
            grid_cell(i + 1, slot.is_answered(), is_marked, i == current)
        })
        .collect();
    cells
        .chunks(GRID_WIDTH)
        .map(|row| row.concat().trim_end().to_owned())
        .collect()
}

pub fn print_progress(session: &QuizSession) {
    let answered = session.answered_count();
    let marked = session.marked().iter().filter(|m| **m).count();
    println!(
        "{answered}/{} answered, {marked} marked  (* answered, ? marked, [n] current)",
        session.question_count()
    );
    for row in question_grid(session.answers(), session.marked(), session.current_index()) {
        println!("{row}");
    }
}

pub fn print_result(result: &TestResult, partition: Option<&ReviewPartition>) {
    println!("\n{}", result.test_name());
    println!(
        "Score {} ({})  |  Marks: {}/{}",
        format_percentage(result.percentage()),
        grade(result.percentage()),
        result.score(),
        result.max_score()
    );
    let mut line = format!(
        "Correct {}  Incorrect {}  Skipped {}",
        result.correct(),
        result.incorrect(),
        result.unanswered()
    );
    if result.time_spent_secs() > 0 {
        line.push_str(&format!("  |  {}", format_spent(result.time_spent_secs())));
    }
    println!("{line}");

    if let Some(partition) = partition {
        let counts: Vec<String> = ReviewFilter::ALL
            .iter()
            .map(|f| format!("{} {}", f.label(), partition.count(*f)))
            .collect();
        println!("Review: {}", counts.join("  "));
    }
}

pub fn print_review_item(item: &ReviewItem<'_>, answers: &[AnswerSlot]) {
    let verdict = match item.verdict {
        Verdict::Correct => "correct",
        Verdict::Incorrect => "incorrect",
        Verdict::Unanswered => "skipped",
    };
    println!(
        "\nQuestion {}/{} ({verdict})",
        item.index + 1,
        answers.len()
    );
    println!("{}", item.question.text);
    for (index, option) in item.question.options.iter().enumerate() {
        let tag = match (item.correct_index == Some(index), item.chosen == Some(index)) {
            (true, _) => "ok",
            (false, true) => "xx",
            (false, false) => "  ",
        };
        println!("{tag} {}. {}", option.label, option.text);
    }
    if item.question.has_explanation() {
        println!("{}", item.question.explanation);
    }
}

pub fn print_attempt_help() {
    println!("a-z or 1-9 choose  n next  p previous  g N go to  m mark  s submit  q quit");
}

pub fn print_review_help() {
    println!("a all  c correct  i incorrect  u skipped  n next  p previous  q done");
}
