//! Error types shared by the quiz core and the bootstrap code.

use thiserror::Error;

use crate::session::SessionState;

/// Errors emitted while building or running a quiz.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error(transparent)]
    GenerationService(#[from] GenerationServiceError),
    #[error("generated document is malformed: {0}")]
    MalformedDocument(String),
    #[error("no usable questions were generated")]
    EmptyGeneration,
    #[error("`{operation}` is not allowed while the session is {state:?}")]
    InvalidState {
        operation: &'static str,
        state: SessionState,
    },
}

/// Failures of the external text-generation service.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GenerationServiceError {
    #[error("generation service is unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("generation service responded with {status}: {message}")]
    Status {
        status: reqwest::StatusCode,
        message: String,
    },
    #[error("generation service returned a malformed response: {0}")]
    MalformedResponse(String),
}

/// Errors emitted while reading configuration at startup.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("{0} should be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}
