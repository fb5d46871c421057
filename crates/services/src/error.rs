//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::SessionError;
use quiz_core::model::QuizError;
use storage::StorageError;

/// Errors emitted by a `QuizGenerator`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GenerationError {
    #[error("quiz generation is not configured")]
    Disabled,
    #[error("quiz generation returned an empty response")]
    EmptyResponse,
    #[error("quiz generation request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Why a quiz could not be supplied. The session is never touched when this is returned.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SupplyError {
    #[error("no articles found")]
    NoArticles,
    #[error("could not serialize articles for the prompt: {0}")]
    Prompt(#[source] serde_json::Error),
    #[error("generated quiz is not valid JSON: {0}")]
    Malformed(#[source] serde_json::Error),
    #[error("generated quiz is invalid: {0}")]
    Invalid(#[from] QuizError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `QuizSessionService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizServiceError {
    #[error("could not fetch quiz: {0}")]
    FetchFailed(#[from] SupplyError),
    #[error("a quiz is being fetched")]
    FetchPending,
    #[error("session state is unavailable: {0}")]
    Poisoned(String),
    #[error(transparent)]
    Session(#[from] SessionError),
}
