//! Turns the generator's JSON document into a validated [`QuestionSet`].
//!
//! The document is parsed in two passes: the envelope must be valid JSON holding a
//! list of questions, then every question is decoded and validated on its own so a
//! single broken entry is skipped instead of voiding the whole set.

use std::collections::HashSet;

use serde::Deserialize;
use serde_json::Value;

use crate::error::QuizError;
use crate::quiz::{normalize_letter, Answer, Question, QuestionSet};

/// Minimum number of answer options a question must carry.
pub const MIN_ANSWERS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Shape(String),
    EmptyTitle,
    TooFewAnswers(usize),
    EmptyAnswerText(char),
    InvalidLetter(String),
    DuplicateLetter(char),
    CorrectAnswers(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedQuestion {
    /// Zero-based position in the document.
    pub index: usize,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDocument {
    pub questions: QuestionSet,
    pub skipped: Vec<SkippedQuestion>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDocument {
    Wrapped { questions: Vec<Value> },
    Bare(Vec<Value>),
}

#[derive(Deserialize)]
struct RawQuestion {
    title: String,
    answers: Vec<RawAnswer>,
    #[serde(default)]
    explanation: Option<String>,
}

#[derive(Deserialize)]
struct RawAnswer {
    letter: String,
    text: String,
    #[serde(default)]
    correct: Flag,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Text(String),
}

impl Default for Flag {
    fn default() -> Self {
        Flag::Bool(false)
    }
}

impl Flag {
    fn is_set(&self) -> bool {
        match self {
            Flag::Bool(value) => *value,
            Flag::Text(value) => value.trim().eq_ignore_ascii_case("true"),
        }
    }
}

/// Parses a generated document.
///
/// Fails with [`QuizError::MalformedDocument`] only when the document as a whole is
/// unreadable; invalid questions end up in [`ParsedDocument::skipped`].
pub fn parse_document(raw: &str) -> Result<ParsedDocument, QuizError> {
    let items = locate_items(raw)?;

    let mut document = ParsedDocument::default();
    let mut questions = Vec::with_capacity(items.len());

    for (index, item) in items.into_iter().enumerate() {
        match parse_question(item) {
            Ok(question) => {
                log::debug!("Parsed question #{}: '{}'", index + 1, question.title());
                questions.push(question);
            }
            Err(reason) => {
                log::warn!("Skipping question #{}: {:?}", index + 1, reason);
                document.skipped.push(SkippedQuestion { index, reason });
            }
        }
    }

    document.questions = QuestionSet::new(questions);
    Ok(document)
}

fn parse_question(item: Value) -> Result<Question, SkipReason> {
    let raw: RawQuestion =
        serde_json::from_value(item).map_err(|e| SkipReason::Shape(e.to_string()))?;

    let title = raw.title.trim();
    if title.is_empty() {
        return Err(SkipReason::EmptyTitle);
    }
    if raw.answers.len() < MIN_ANSWERS {
        return Err(SkipReason::TooFewAnswers(raw.answers.len()));
    }

    let mut seen = HashSet::new();
    let mut answers = Vec::with_capacity(raw.answers.len());
    for raw_answer in raw.answers {
        let letter = parse_letter(&raw_answer.letter)?;
        if !seen.insert(letter) {
            return Err(SkipReason::DuplicateLetter(letter));
        }
        let text = raw_answer.text.trim();
        if text.is_empty() {
            return Err(SkipReason::EmptyAnswerText(letter));
        }
        answers.push(Answer::new(letter, text, raw_answer.correct.is_set()));
    }

    let correct = answers.iter().filter(|answer| answer.is_correct()).count();
    if correct != 1 {
        return Err(SkipReason::CorrectAnswers(correct));
    }

    let explanation = raw.explanation.unwrap_or_default();
    Ok(Question::new(title, answers, explanation.trim()))
}

fn parse_letter(raw: &str) -> Result<char, SkipReason> {
    let trimmed = raw.trim();
    let mut chars = trimmed.chars();
    match (chars.next(), chars.next()) {
        (Some(letter), None) if letter.is_alphabetic() => Ok(normalize_letter(letter)),
        _ => Err(SkipReason::InvalidLetter(trimmed.to_owned())),
    }
}

/// Finds the question list inside whatever the model wrapped around it.
///
/// Every `{` or `[` is tried as the start of the document, in order. The first
/// candidate holding question-like objects wins; text after the value is ignored,
/// which covers Markdown fences and trailing chatter.
fn locate_items(raw: &str) -> Result<Vec<Value>, QuizError> {
    let mut fallback = None;
    let mut first_error = None;

    for (start, _) in raw.match_indices(['{', '[']) {
        let mut stream = serde_json::Deserializer::from_str(&raw[start..]).into_iter::<RawDocument>();
        match stream.next() {
            Some(Ok(RawDocument::Wrapped { questions })) | Some(Ok(RawDocument::Bare(questions))) => {
                if questions.iter().any(|item| item.get("title").is_some()) {
                    return Ok(questions);
                }
                if fallback.is_none() {
                    fallback = Some(questions);
                }
            }
            Some(Err(e)) => {
                if first_error.is_none() {
                    first_error = Some(e.to_string());
                }
            }
            None => {}
        }
    }

    fallback.ok_or_else(|| {
        QuizError::MalformedDocument(first_error.unwrap_or_else(|| "no JSON document found".into()))
    })
}
