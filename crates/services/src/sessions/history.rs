use std::sync::Arc;

use quiz_core::model::{ExamResult, QuizId};
use storage::repository::{BookmarkRecord, BookmarkRepository, ResultRecord, ResultRepository};

use crate::Clock;
use crate::error::HistoryError;

/// Read side of past attempts: result listings and bookmark toggling.
#[derive(Clone)]
pub struct ResultHistoryService {
    clock: Clock,
    results: Arc<dyn ResultRepository>,
    bookmarks: Arc<dyn BookmarkRepository>,
}

impl ResultHistoryService {
    #[must_use]
    pub fn new(
        clock: Clock,
        results: Arc<dyn ResultRepository>,
        bookmarks: Arc<dyn BookmarkRepository>,
    ) -> Self {
        Self {
            clock,
            results,
            bookmarks,
        }
    }

    /// Past results for a user, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError::Storage` if repository access fails.
    pub async fn results_for_user(
        &self,
        user_email: &str,
    ) -> Result<Vec<ResultRecord>, HistoryError> {
        Ok(self.results.results_for_user(user_email).await?)
    }

    /// Toggle the bookmark star on one outcome of a scored result.
    ///
    /// Returns whether the question is bookmarked after the call.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError::OutOfRange` if the result has no outcome at
    /// `question_index`, `HistoryError::Storage` on repository failures.
    pub async fn toggle_bookmark(
        &self,
        user_email: &str,
        quiz_id: QuizId,
        result: &ExamResult,
        question_index: usize,
    ) -> Result<bool, HistoryError> {
        let outcome = result
            .outcomes()
            .get(question_index)
            .ok_or(HistoryError::OutOfRange {
                index: question_index,
            })?;
        let record = BookmarkRecord::from_outcome(
            user_email,
            quiz_id,
            question_index,
            outcome,
            self.clock.now(),
        );
        Ok(self.bookmarks.toggle_bookmark(&record).await?)
    }

    /// Saved questions for a user.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError::Storage` if repository access fails.
    pub async fn bookmarks_for_user(
        &self,
        user_email: &str,
    ) -> Result<Vec<BookmarkRecord>, HistoryError> {
        Ok(self.bookmarks.bookmarks_for_user(user_email).await?)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
