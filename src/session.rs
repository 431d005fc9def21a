use uuid::Uuid;

use crate::error::QuizError;
use crate::quiz::{Question, QuestionSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No questions attached yet; the next text is a topic.
    Empty,
    InProgress,
    Complete,
}

/// What the user sees for the current question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    pub number: usize,
    pub text: String,
    pub letters: Vec<char>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub explanation: String,
}

/// One user's walk through a question set.
///
/// `cursor` points at the next unanswered question and `score <= cursor <= total`
/// holds after every operation.
#[derive(Debug, Clone)]
pub struct QuizSession {
    id: Uuid,
    questions: QuestionSet,
    cursor: usize,
    score: usize,
    presented: bool,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            questions: QuestionSet::default(),
            cursor: 0,
            score: 0,
            presented: false,
        }
    }

    pub fn id(&self) -> &Uuid {
        &self.id
    }

    pub fn state(&self) -> SessionState {
        if self.questions.is_empty() {
            SessionState::Empty
        } else if self.cursor < self.questions.len() {
            SessionState::InProgress
        } else {
            SessionState::Complete
        }
    }

    /// Moves an empty session to `InProgress`.
    pub fn attach_questions(&mut self, questions: QuestionSet) -> Result<(), QuizError> {
        self.expect_state("attach_questions", SessionState::Empty)?;
        if questions.is_empty() {
            return Err(QuizError::EmptyGeneration);
        }

        self.questions = questions;
        self.cursor = 0;
        self.score = 0;
        self.presented = false;
        Ok(())
    }

    pub fn current_question_view(&self) -> Result<QuestionView, QuizError> {
        let question = self.current_question("current_question_view")?;

        Ok(QuestionView {
            number: self.cursor + 1,
            text: question.to_string(),
            letters: question.letters(),
        })
    }

    /// Records that the current question has been shown to the user.
    pub fn mark_presented(&mut self) -> Result<(), QuizError> {
        self.expect_state("mark_presented", SessionState::InProgress)?;
        self.presented = true;
        Ok(())
    }

    /// Whether the current question has been shown since the cursor last moved.
    pub fn is_presented(&self) -> bool {
        self.presented
    }

    /// Scores `input` against the current question and advances the cursor.
    ///
    /// Anything that is not one of the question's letters counts as a wrong answer.
    pub fn submit_answer(&mut self, input: &str) -> Result<AnswerOutcome, QuizError> {
        let question = self.current_question("submit_answer")?;

        let mut chars = input.trim().chars();
        let selected = match (chars.next(), chars.next()) {
            (Some(letter), None) => question.find_answer(letter),
            _ => None,
        };
        let correct = selected.is_some_and(|answer| answer.is_correct());
        let explanation = question.explanation().to_owned();

        if correct {
            self.score += 1;
        }
        self.cursor += 1;
        self.presented = false;

        Ok(AnswerOutcome {
            correct,
            explanation,
        })
    }

    pub fn is_complete(&self) -> bool {
        self.state() == SessionState::Complete
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn current_question(&self, operation: &'static str) -> Result<&Question, QuizError> {
        self.expect_state(operation, SessionState::InProgress)?;
        self.questions
            .get(self.cursor)
            .ok_or(QuizError::InvalidState {
                operation,
                state: self.state(),
            })
    }

    fn expect_state(&self, operation: &'static str, expected: SessionState) -> Result<(), QuizError> {
        let state = self.state();
        if state == expected {
            Ok(())
        } else {
            Err(QuizError::InvalidState { operation, state })
        }
    }
}
