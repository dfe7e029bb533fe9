//! Offline conversion of exported HTML test pages into the JSON question bank.
//!
//! Each page embeds tests as `<div id="testN">` blocks holding an `<iframe
//! srcdoc="...">` whose (entity-encoded) script assigns a `questions` array
//! literal and a `timeRemaining = N * 60` countdown.

use std::sync::LazyLock;

use quiz_core::model::{DEFAULT_DURATION_MINUTES, Question, QuestionId, QuestionOption, Test, TestId};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

static TEST_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<div id="test(\d+)"[\s\S]*?<h2>(.*?)</h2>\s*<iframe srcdoc="([\s\S]*?)"\s*frameborder"#)
        .expect("Invalid regex")
});
static QUESTIONS_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"questions\s*=\s*(\[\{[\s\S]*?\}\])\s*;?\s*\n\s*(?:if\s*\(|$)")
        .expect("Invalid regex")
});
static DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"timeRemaining\s*=\s*(\d+)\s*\*\s*60").expect("Invalid regex")
});
static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>|</p>").expect("Invalid regex"));
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("Invalid regex"));
static BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("Invalid regex"));

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ImportError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// A test block that could not be converted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedTest {
    pub name: String,
    pub reason: String,
}

/// Outcome of converting one page.
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    pub tests: Vec<Test>,
    pub skipped: Vec<SkippedTest>,
}

impl ImportReport {
    #[must_use]
    pub fn question_total(&self) -> usize {
        self.tests.iter().map(|t| t.questions.len()).sum()
    }

    pub fn merge(&mut self, other: ImportReport) {
        self.tests.extend(other.tests);
        self.skipped.extend(other.skipped);
    }
}

#[derive(Debug, Deserialize)]
struct RawOption {
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    correct: Value,
}

#[derive(Debug, Deserialize)]
struct RawQuestion {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    options: Option<Vec<RawOption>>,
    #[serde(default)]
    correct_answer: Option<String>,
    #[serde(default)]
    explanation: Option<String>,
}

/// Decodes the HTML entities that appear in exported `srcdoc` attributes.
#[must_use]
pub fn decode_entities(raw: &str) -> String {
    raw.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&#x2F;", "/")
        .replace("&nbsp;", " ")
}

/// Turns explanation markup into plain text with paragraph breaks.
#[must_use]
pub fn clean_explanation(raw: &str) -> String {
    let text = LINE_BREAK.replace_all(raw, "\n");
    let text = TAG.replace_all(&text, "");
    let text = text
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">");
    BLANK_LINES.replace_all(&text, "\n\n").trim().to_owned()
}

/// Loose JSON truthiness, matching how the exported pages flag answers.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn convert_question(index: usize, raw: RawQuestion) -> Question {
    let id = u32::try_from(index + 1).unwrap_or(u32::MAX);
    let options = raw
        .options
        .unwrap_or_default()
        .into_iter()
        .map(|o| QuestionOption {
            label: o.label.unwrap_or_default(),
            text: o.text.unwrap_or_default(),
            correct: truthy(&o.correct),
        })
        .collect();
    Question {
        id: QuestionId::new(id),
        text: raw.text.unwrap_or_default().trim().to_owned(),
        options,
        correct_answer: raw.correct_answer.unwrap_or_default(),
        explanation: raw
            .explanation
            .as_deref()
            .map(clean_explanation)
            .unwrap_or_default(),
    }
}

/// Extracts every test block from one exported page.
///
/// Test ids are `<file_key>_<N>` where `N` comes from the block's `testN` id.
#[must_use]
pub fn extract_tests(html: &str, file_key: &str) -> ImportReport {
    let mut report = ImportReport::default();

    for caps in TEST_BLOCK.captures_iter(html) {
        let number = &caps[1];
        let name = caps[2].trim().to_owned();
        let srcdoc = decode_entities(&caps[3]);

        let Some(literal) = QUESTIONS_LITERAL.captures(&srcdoc) else {
            report.skipped.push(SkippedTest {
                name,
                reason: "questions array not found".into(),
            });
            continue;
        };

        let raw: Vec<RawQuestion> = match serde_json::from_str(&literal[1]) {
            Ok(raw) => raw,
            Err(err) => {
                report.skipped.push(SkippedTest {
                    name,
                    reason: err.to_string(),
                });
                continue;
            }
        };

        let duration = DURATION
            .captures(&srcdoc)
            .and_then(|c| c[1].parse::<u32>().ok())
            .unwrap_or(DEFAULT_DURATION_MINUTES);

        let questions: Vec<Question> = raw
            .into_iter()
            .enumerate()
            .map(|(i, q)| convert_question(i, q))
            .collect();

        report.tests.push(Test {
            id: TestId::new(format!("{file_key}_{number}")),
            name,
            question_count: u32::try_from(questions.len()).unwrap_or(u32::MAX),
            duration: Some(duration),
            questions,
        });
    }

    report
}

/// File key used for test ids from an export path. The whole path is checked,
/// so a `BTR's` directory marks every page inside it.
#[must_use]
pub fn file_key_for(path: &str) -> &'static str {
    if path.contains("BTR's") { "btrs" } else { "btr" }
}
