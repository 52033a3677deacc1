use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quiz_core::model::{ExamResult, QuestionOutcome, Quiz, QuizId, SelectedAnswer};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

//
// ─── RECORDS ───────────────────────────────────────────────────────────────────
//

/// Persisted shape for a quiz document.
///
/// The `Quiz` payload stays the domain type; ownership metadata lives only
/// here so the domain never reads ambient user identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizRecord {
    pub id: QuizId,
    pub owner_email: String,
    pub created_at: DateTime<Utc>,
    pub quiz: Quiz,
}

/// Persisted summary of one scored attempt, keyed by user and quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub user_email: String,
    pub quiz_id: QuizId,
    pub topic: String,
    pub score: u32,
    pub total: u32,
    pub time_taken_seconds: u64,
    pub finished_at: DateTime<Utc>,
}

impl ResultRecord {
    #[must_use]
    pub fn from_result(
        user_email: impl Into<String>,
        quiz_id: QuizId,
        topic: impl Into<String>,
        result: &ExamResult,
        finished_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_email: user_email.into(),
            quiz_id,
            topic: topic.into(),
            score: result.score(),
            total: result.total(),
            time_taken_seconds: result.time_taken_seconds(),
            finished_at,
        }
    }
}

/// A question saved from a result page for later study.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookmarkRecord {
    pub user_email: String,
    pub quiz_id: QuizId,
    pub question_index: usize,
    pub prompt: String,
    pub selected: SelectedAnswer,
    pub correct_text: String,
    pub explanation: String,
    pub saved_at: DateTime<Utc>,
}

impl BookmarkRecord {
    #[must_use]
    pub fn from_outcome(
        user_email: impl Into<String>,
        quiz_id: QuizId,
        question_index: usize,
        outcome: &QuestionOutcome,
        saved_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_email: user_email.into(),
            quiz_id,
            question_index,
            prompt: outcome.prompt.clone(),
            selected: outcome.selected.clone(),
            correct_text: outcome.correct_text.clone(),
            explanation: outcome.explanation.clone(),
            saved_at,
        }
    }
}

//
// ─── REPOSITORY CONTRACTS ──────────────────────────────────────────────────────
//

/// Repository contract for stored quizzes.
///
/// The hosted document store sits behind this seam; this repo ships only
/// the in-memory implementation.
#[async_trait]
pub trait QuizRepository: Send + Sync {
    /// Persist or replace a quiz document.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the quiz cannot be stored.
    async fn upsert_quiz(&self, record: &QuizRecord) -> Result<(), StorageError>;

    /// Fetch a quiz by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_quiz(&self, id: QuizId) -> Result<QuizRecord, StorageError>;
}

/// Repository contract for scored results.
#[async_trait]
pub trait ResultRepository: Send + Sync {
    /// Append a result record, returning its storage id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn append_result(&self, record: &ResultRecord) -> Result<i64, StorageError>;

    /// All results for a user, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if repository access fails.
    async fn results_for_user(&self, user_email: &str) -> Result<Vec<ResultRecord>, StorageError>;
}

/// Repository contract for bookmarked questions.
#[async_trait]
pub trait BookmarkRepository: Send + Sync {
    /// Insert the bookmark if absent, remove it if present.
    ///
    /// Returns whether the bookmark exists after the call.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if repository access fails.
    async fn toggle_bookmark(&self, record: &BookmarkRecord) -> Result<bool, StorageError>;

    /// All bookmarks for a user.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if repository access fails.
    async fn bookmarks_for_user(
        &self,
        user_email: &str,
    ) -> Result<Vec<BookmarkRecord>, StorageError>;
}

//
// ─── IN-MEMORY IMPLEMENTATION ──────────────────────────────────────────────────
//

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    quizzes: Arc<Mutex<HashMap<QuizId, QuizRecord>>>,
    results: Arc<Mutex<Vec<ResultRecord>>>,
    bookmarks: Arc<Mutex<HashMap<(String, QuizId, usize), BookmarkRecord>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuizRepository for InMemoryRepository {
    async fn upsert_quiz(&self, record: &QuizRecord) -> Result<(), StorageError> {
        let mut guard = self
            .quizzes
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(record.id, record.clone());
        Ok(())
    }

    async fn get_quiz(&self, id: QuizId) -> Result<QuizRecord, StorageError> {
        let guard = self
            .quizzes
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.get(&id).cloned().ok_or(StorageError::NotFound)
    }
}

#[async_trait]
impl ResultRepository for InMemoryRepository {
    async fn append_result(&self, record: &ResultRecord) -> Result<i64, StorageError> {
        let mut guard = self
            .results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.push(record.clone());
        // Append-only store: the 1-based position doubles as the id.
        Ok(guard.len() as i64)
    }

    async fn results_for_user(&self, user_email: &str) -> Result<Vec<ResultRecord>, StorageError> {
        let guard = self
            .results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard
            .iter()
            .filter(|r| r.user_email == user_email)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl BookmarkRepository for InMemoryRepository {
    async fn toggle_bookmark(&self, record: &BookmarkRecord) -> Result<bool, StorageError> {
        let mut guard = self
            .bookmarks
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let key = (
            record.user_email.clone(),
            record.quiz_id,
            record.question_index,
        );
        if guard.remove(&key).is_some() {
            Ok(false)
        } else {
            guard.insert(key, record.clone());
            Ok(true)
        }
    }

    async fn bookmarks_for_user(
        &self,
        user_email: &str,
    ) -> Result<Vec<BookmarkRecord>, StorageError> {
        let guard = self
            .bookmarks
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut found: Vec<_> = guard
            .values()
            .filter(|b| b.user_email == user_email)
            .cloned()
            .collect();
        found.sort_by_key(|b| (b.quiz_id, b.question_index));
        Ok(found)
    }
}

/// Aggregates the repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub quizzes: Arc<dyn QuizRepository>,
    pub results: Arc<dyn ResultRepository>,
    pub bookmarks: Arc<dyn BookmarkRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let quizzes: Arc<dyn QuizRepository> = Arc::new(repo.clone());
        let results: Arc<dyn ResultRepository> = Arc::new(repo.clone());
        let bookmarks: Arc<dyn BookmarkRepository> = Arc::new(repo);
        Self {
            quizzes,
            results,
            bookmarks,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
