use thiserror::Error;

use crate::model::{QuestionError, QuizError, SessionError};

/// Crate-level error for callers that do not care which stage failed.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Session(#[from] SessionError),
}
