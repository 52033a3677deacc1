use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::question::{Question, QuestionDraft, QuestionError};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    /// A quiz with zero questions cannot be taken; fatal at construction.
    #[error("quiz has no questions")]
    Empty,

    #[error("quiz name cannot be empty")]
    EmptyName,

    #[error("timer must be at least one minute")]
    ZeroTimer,

    #[error("timer cannot exceed 180 minutes")]
    TimerTooLong,

    #[error("question {index} is invalid: {source}")]
    InvalidQuestion {
        index: usize,
        #[source]
        source: QuestionError,
    },
}

//
// ─── QUIZ ──────────────────────────────────────────────────────────────────────
//

/// Difficulty label attached at generation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

/// Unvalidated quiz configuration from the generator or the authoring form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizDraft {
    pub name: String,
    pub syllabus: String,
    pub difficulty: Difficulty,
    pub timer_minutes: u32,
    pub questions: Vec<QuestionDraft>,
}

impl QuizDraft {
    /// Validate the draft into an immutable `Quiz`.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Empty` for zero questions, `QuizError::EmptyName`,
    /// `QuizError::ZeroTimer` or `QuizError::TimerTooLong` for bad metadata,
    /// and `QuizError::InvalidQuestion` (with the failing index) for the
    /// first question that fails validation.
    pub fn validate(self) -> Result<Quiz, QuizError> {
        if self.name.trim().is_empty() {
            return Err(QuizError::EmptyName);
        }
        if self.timer_minutes == 0 {
            return Err(QuizError::ZeroTimer);
        }
        if self.timer_minutes > Quiz::MAX_TIMER_MINUTES {
            return Err(QuizError::TimerTooLong);
        }
        if self.questions.is_empty() {
            return Err(QuizError::Empty);
        }

        let mut questions = Vec::with_capacity(self.questions.len());
        for (index, draft) in self.questions.into_iter().enumerate() {
            let question = draft
                .validate()
                .map_err(|source| QuizError::InvalidQuestion { index, source })?;
            questions.push(question);
        }

        Ok(Quiz {
            name: self.name,
            syllabus: self.syllabus,
            difficulty: self.difficulty,
            timer_minutes: self.timer_minutes,
            questions,
        })
    }
}

/// Immutable quiz configuration: metadata plus an ordered question list.
///
/// Built once when a quiz is generated or loaded; read-only thereafter.
/// Deserialization re-enters `QuizDraft::validate`, so a stored document
/// can never smuggle in an empty or otherwise invalid quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "QuizDraft")]
pub struct Quiz {
    name: String,
    syllabus: String,
    difficulty: Difficulty,
    timer_minutes: u32,
    questions: Vec<Question>,
}

impl TryFrom<QuizDraft> for Quiz {
    type Error = QuizError;

    fn try_from(draft: QuizDraft) -> Result<Self, Self::Error> {
        draft.validate()
    }
}

impl Quiz {
    /// Upper bound on the per-session time budget, matching the authoring
    /// form's slider range. Keeps `time_budget_seconds` far from overflow.
    pub const MAX_TIMER_MINUTES: u32 = 180;

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn syllabus(&self) -> &str {
        &self.syllabus
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Per-session time budget in minutes.
    #[must_use]
    pub fn timer_minutes(&self) -> u32 {
        self.timer_minutes
    }

    /// Time budget in seconds, the countdown's starting value.
    #[must_use]
    pub fn time_budget_seconds(&self) -> u32 {
        self.timer_minutes * 60
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    /// Always at least one; `QuizDraft::validate` rejects empty quizzes.
    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
