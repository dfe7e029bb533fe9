//! Interactive attempt loop: stdin commands raced against countdown ticks.

use std::error::Error;
use std::time::Duration;

use quiz_core::model::{
    AnswerSlot, Question, Selection, SessionMode, SubmitConfirmation, TestId, Tick,
};
use quiz_core::review::{Direction, ReviewFilter, ReviewPartition, review_item};
use services::{ActiveQuiz, Persistence, QuizService};
use tokio::io::{BufReader, Lines, Stdin};

use crate::display;
use crate::input::{self, AttemptInput, ReviewInput};

pub type InputLines = Lines<BufReader<Stdin>>;

type CliResult<T> = Result<T, Box<dyn Error>>;

/// How long the result screen waits for the history write.
const SAVE_WAIT: Duration = Duration::from_secs(5);

/// Runs one attempt to completion, then offers the review browser.
///
/// End of input abandons the attempt without saving.
pub async fn run(
    quiz: &QuizService,
    test_id: &TestId,
    mode: SessionMode,
    lines: &mut InputLines,
) -> CliResult<()> {
    let mut attempt = quiz.start(test_id, mode)?;
    println!(
        "{}  ({} mode, {} questions)",
        attempt.session().test().name,
        mode,
        attempt.session().question_count()
    );
    display::print_attempt_help();
    display::print_question(attempt.session());

    let mut pending: Option<SubmitConfirmation> = None;
    while attempt.outcome().is_none() {
        tokio::select! {
            () = attempt.wait_tick() => {
                match attempt.handle_tick() {
                    Tick::Expired => println!("\nTime's up! Your test has been submitted."),
                    Tick::Running(left) if left % 300 == 0 || left == 60 => {
                        println!("[{} left]", display::format_clock(left));
                    }
                    _ => {}
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    attempt.abandon();
                    return Ok(());
                };
                if let Some(confirmation) = pending.take() {
                    if input::is_yes(&line) {
                        attempt.confirm_submit(confirmation)?;
                    } else {
                        println!("Submit cancelled.");
                        display::print_question(attempt.session());
                    }
                } else if !apply(&mut attempt, &line, &mut pending) {
                    println!("Leaving test. Progress is not saved.");
                    attempt.abandon();
                    return Ok(());
                }
            }
        }
    }

    let Some(outcome) = attempt.outcome() else {
        return Ok(());
    };
    let partition = attempt.review();
    display::print_result(&outcome.result, partition.as_ref());

    match tokio::time::timeout(SAVE_WAIT, attempt.saved()).await {
        Ok(Some(Persistence::Saved)) => {}
        Ok(_) => println!("This result could not be saved to history."),
        Err(_) => println!("History is not responding; this result may not be saved."),
    }

    if let Some(partition) = partition {
        println!("Review answers? [y/N]");
        if let Some(line) = lines.next_line().await? {
            if input::is_yes(&line) {
                if let Some(outcome) = attempt.outcome() {
                    let questions = &attempt.session().test().questions;
                    browse(questions, &outcome.answers, &partition, lines).await?;
                }
            }
        }
    }
    Ok(())
}

/// Applies one attempt command. Returns `false` when the user quits.
fn apply(attempt: &mut ActiveQuiz, line: &str, pending: &mut Option<SubmitConfirmation>) -> bool {
    match input::parse_attempt(line) {
        AttemptInput::Choose(option) => {
            let options = attempt
                .session()
                .current_question()
                .map_or(0, |q| q.options.len());
            if option >= options {
                println!("No such option.");
                return true;
            }
            match attempt.select_answer(option) {
                Selection::Recorded => display::print_question(attempt.session()),
                Selection::Locked => println!("Answer already locked for this question."),
                Selection::Submitted => println!("This test is already submitted."),
                Selection::NoQuestion => println!("This test has no questions."),
            }
        }
        AttemptInput::Next => {
            if attempt.next() {
                display::print_question(attempt.session());
            } else {
                println!("Already at the last question.");
            }
        }
        AttemptInput::Previous => {
            if attempt.previous() {
                display::print_question(attempt.session());
            } else {
                println!("Already at the first question.");
            }
        }
        AttemptInput::GoTo(index) => {
            if attempt.go_to(index) {
                display::print_question(attempt.session());
            } else {
                println!("No question {}.", index + 1);
            }
        }
        AttemptInput::Mark => {
            let marked = attempt.toggle_mark();
            println!("{}", if marked { "Marked for review." } else { "Mark removed." });
        }
        AttemptInput::Submit => {
            if let Some(confirmation) = attempt.request_submit() {
                println!("{} [y/N]", confirmation.message());
                *pending = Some(confirmation);
            }
        }
        AttemptInput::Help => {
            display::print_attempt_help();
            display::print_progress(attempt.session());
        }
        AttemptInput::Empty => display::print_question(attempt.session()),
        AttemptInput::Quit => return false,
        AttemptInput::Unknown => println!("Unrecognised input; type h for help."),
    }
    true
}

async fn browse(
    questions: &[Question],
    answers: &[AnswerSlot],
    partition: &ReviewPartition,
    lines: &mut InputLines,
) -> CliResult<()> {
    display::print_review_help();
    let mut filter = ReviewFilter::All;
    let mut current = partition.indices(filter).first().copied();
    show(questions, answers, current);

    while let Some(line) = lines.next_line().await? {
        let moved = match input::parse_review(&line) {
            ReviewInput::Filter(next) => {
                filter = next;
                current = partition.indices(filter).first().copied();
                if current.is_none() {
                    println!("No {} questions.", filter.label().to_lowercase());
                }
                current.is_some()
            }
            ReviewInput::Next => step(partition, filter, &mut current, Direction::Next),
            ReviewInput::Previous => step(partition, filter, &mut current, Direction::Previous),
            ReviewInput::Quit => break,
            ReviewInput::Unknown => {
                display::print_review_help();
                false
            }
        };
        if moved {
            show(questions, answers, current);
        }
    }
    Ok(())
}

fn step(
    partition: &ReviewPartition,
    filter: ReviewFilter,
    current: &mut Option<usize>,
    direction: Direction,
) -> bool {
    match current.and_then(|from| partition.step(filter, from, direction)) {
        Some(index) => {
            *current = Some(index);
            true
        }
        None => {
            println!("No more {} questions that way.", filter.label().to_lowercase());
            false
        }
    }
}

fn show(questions: &[Question], answers: &[AnswerSlot], index: Option<usize>) {
    if let Some(item) = index.and_then(|i| review_item(questions, answers, i)) {
        display::print_review_item(&item, answers);
    }
}
