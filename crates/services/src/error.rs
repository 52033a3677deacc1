//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{QuizError, SessionError};
use storage::repository::StorageError;

/// Errors emitted by `ExamLoopService` and the timer driver.
///
/// Quiz validation failures cannot reach the exam path: every `Quiz` a
/// repository hands back already went through `QuizDraft::validate`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExamError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `QuizCatalogService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizCatalogError {
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `ResultHistoryService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HistoryError {
    #[error("no outcome at index {index}")]
    OutOfRange { index: usize },
    #[error(transparent)]
    Storage(#[from] StorageError),
}
