use std::sync::Arc;

use quiz_core::model::{ExamResult, QuizId, Session};
use serde::Serialize;
use storage::repository::{QuizRepository, ResultRecord, ResultRepository};

use crate::Clock;
use crate::error::ExamError;

/// Result of a manual submission: the scored result plus its storage id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExamSubmission {
    pub result: ExamResult,
    pub record_id: i64,
}

/// Orchestrates exam start, submission and result persistence.
///
/// User identity is always an explicit parameter; the services never read
/// it from ambient state.
#[derive(Clone)]
pub struct ExamLoopService {
    clock: Clock,
    quizzes: Arc<dyn QuizRepository>,
    results: Arc<dyn ResultRepository>,
}

impl ExamLoopService {
    #[must_use]
    pub fn new(
        clock: Clock,
        quizzes: Arc<dyn QuizRepository>,
        results: Arc<dyn ResultRepository>,
    ) -> Self {
        Self {
            clock,
            quizzes,
            results,
        }
    }

    /// Load the quiz and start a session against it.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::Storage` if the quiz cannot be loaded.
    pub async fn start_exam(&self, quiz_id: QuizId) -> Result<Session, ExamError> {
        let record = self.quizzes.get_quiz(quiz_id).await?;
        Ok(Session::new(record.quiz, self.clock.now()))
    }

    /// Submit the session manually, persist the result, and return both.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::Session` (`AlreadySubmitted`) if the session was
    /// already scored, `ExamError::Storage` if persistence fails.
    pub async fn submit_exam(
        &self,
        session: &mut Session,
        user_email: &str,
        quiz_id: QuizId,
    ) -> Result<ExamSubmission, ExamError> {
        let topic = session.quiz().name().to_owned();
        let result = session.submit(self.clock.now())?;
        let record_id = self
            .record_result(user_email, quiz_id, &topic, &result)
            .await?;
        Ok(ExamSubmission { result, record_id })
    }

    /// Persist an already-scored result.
    ///
    /// The timer driver returns its `ExamResult` without doing I/O; expiry
    /// flows through here so both triggers share one persistence path.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::Storage` if persistence fails.
    pub async fn record_result(
        &self,
        user_email: &str,
        quiz_id: QuizId,
        topic: &str,
        result: &ExamResult,
    ) -> Result<i64, ExamError> {
        let record =
            ResultRecord::from_result(user_email, quiz_id, topic, result, self.clock.now());
        Ok(self.results.append_result(&record).await?)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
