use std::sync::Arc;

use quiz_core::model::{QuizDraft, QuizId};
use storage::repository::{QuizRecord, QuizRepository};

use crate::Clock;
use crate::error::QuizCatalogError;

/// Orchestrates quiz authoring and lookup.
///
/// The manual-authoring form and the generation pipeline both end here:
/// validate a draft, mint an id, persist the document.
#[derive(Clone)]
pub struct QuizCatalogService {
    clock: Clock,
    quizzes: Arc<dyn QuizRepository>,
}

impl QuizCatalogService {
    #[must_use]
    pub fn new(clock: Clock, quizzes: Arc<dyn QuizRepository>) -> Self {
        Self { clock, quizzes }
    }

    /// Validate a draft and persist it under a fresh id.
    ///
    /// # Errors
    ///
    /// Returns `QuizCatalogError::Quiz` for validation failures (including
    /// the fatal empty-quiz case) and `QuizCatalogError::Storage` if
    /// persistence fails.
    pub async fn create_quiz(
        &self,
        draft: QuizDraft,
        owner_email: &str,
    ) -> Result<QuizId, QuizCatalogError> {
        let quiz = draft.validate()?;
        let record = QuizRecord {
            id: QuizId::generate(),
            owner_email: owner_email.to_owned(),
            created_at: self.clock.now(),
            quiz,
        };
        self.quizzes.upsert_quiz(&record).await?;
        Ok(record.id)
    }

    /// Fetch a stored quiz by id.
    ///
    /// # Errors
    ///
    /// Returns `QuizCatalogError::Storage` (`NotFound`) if missing.
    pub async fn get_quiz(&self, id: QuizId) -> Result<QuizRecord, QuizCatalogError> {
        Ok(self.quizzes.get_quiz(id).await?)
    }
}
