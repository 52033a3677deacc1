use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use thiserror::Error;

use crate::model::question::{OptionKey, Question};
use crate::model::quiz::Quiz;
use crate::model::scoring::{ExamResult, score_exam};
use crate::time::seconds_between;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    /// The key is not among the current question's offered options.
    #[error("option {key} is not offered by the current question")]
    InvalidOption { key: OptionKey },

    /// Any mutation attempted after the session was submitted.
    #[error("session already submitted")]
    AlreadySubmitted,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Lifecycle of a quiz attempt. `Submitted` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Running,
    Submitted,
}

/// One user's attempt at a quiz: question cursor, captured answers, review
/// marks and the countdown value, guarded by a single `Running → Submitted`
/// transition.
///
/// All mutators check the status first and refuse with
/// `SessionError::AlreadySubmitted` once the session is submitted; the
/// check-and-set inside [`Session::submit`] is the only place the status
/// changes, so two racing submit triggers (manual and timer expiry) can
/// never both score. The session owns its `Quiz` for its whole lifetime and
/// never mutates it.
pub struct Session {
    quiz: Quiz,
    current: usize,
    answers: BTreeMap<usize, OptionKey>,
    marked_for_review: BTreeSet<usize>,
    remaining_seconds: u32,
    status: SessionStatus,
    started_at: DateTime<Utc>,
}

impl Session {
    /// Start a session over the given quiz.
    ///
    /// `started_at` should come from the services layer clock to keep
    /// elapsed-time reporting deterministic. The quiz is guaranteed
    /// non-empty by `QuizDraft::validate`, so the cursor always points at a
    /// question.
    #[must_use]
    pub fn new(quiz: Quiz, started_at: DateTime<Utc>) -> Self {
        let remaining_seconds = quiz.time_budget_seconds();
        Self {
            quiz,
            current: 0,
            answers: BTreeMap::new(),
            marked_for_review: BTreeSet::new(),
            remaining_seconds,
            status: SessionStatus::Running,
            started_at,
        }
    }

    //
    // ─── READ ACCESS ───────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.status == SessionStatus::Submitted
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The question under the cursor.
    #[must_use]
    pub fn current_question(&self) -> &Question {
        // `current` stays within `[0, question_count)` by construction.
        &self.quiz.questions()[self.current]
    }

    /// Stored answer for the current question, if any.
    #[must_use]
    pub fn selected_answer(&self) -> Option<OptionKey> {
        self.answer_for(self.current)
    }

    /// Stored answer for an arbitrary question index, if any.
    #[must_use]
    pub fn answer_for(&self, index: usize) -> Option<OptionKey> {
        self.answers.get(&index).copied()
    }

    #[must_use]
    pub fn is_marked(&self, index: usize) -> bool {
        self.marked_for_review.contains(&index)
    }

    #[must_use]
    pub fn marked_count(&self) -> usize {
        self.marked_for_review.len()
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    #[must_use]
    pub fn unanswered_count(&self) -> usize {
        self.quiz.question_count().saturating_sub(self.answers.len())
    }

    #[must_use]
    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    //
    // ─── NAVIGATION & ANSWER CAPTURE ───────────────────────────────────────
    //

    /// Select (or toggle off) an option for the current question.
    ///
    /// Selecting the key that is already stored clears the answer back to
    /// unanswered; any other key overwrites. Returns the stored value after
    /// the call.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadySubmitted` after submission and
    /// `SessionError::InvalidOption` for a key the current question does
    /// not offer; state is unchanged in both cases.
    pub fn select_answer(&mut self, key: OptionKey) -> Result<Option<OptionKey>, SessionError> {
        self.ensure_running()?;
        if !self.current_question().has_option(key) {
            return Err(SessionError::InvalidOption { key });
        }

        if self.answers.get(&self.current) == Some(&key) {
            self.answers.remove(&self.current);
        } else {
            self.answers.insert(self.current, key);
        }
        Ok(self.answer_for(self.current))
    }

    /// Advance the cursor. Inert at the last question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadySubmitted` after submission.
    pub fn go_next(&mut self) -> Result<usize, SessionError> {
        self.ensure_running()?;
        if self.current < self.quiz.question_count() - 1 {
            self.current += 1;
        }
        Ok(self.current)
    }

    /// Move the cursor back. Inert at the first question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadySubmitted` after submission.
    pub fn go_previous(&mut self) -> Result<usize, SessionError> {
        self.ensure_running()?;
        if self.current > 0 {
            self.current -= 1;
        }
        Ok(self.current)
    }

    /// Toggle the review mark on the current question.
    ///
    /// Returns whether the question is marked after the call; an even
    /// number of calls restores the original membership.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadySubmitted` after submission.
    pub fn toggle_review_mark(&mut self) -> Result<bool, SessionError> {
        self.ensure_running()?;
        if self.marked_for_review.remove(&self.current) {
            Ok(false)
        } else {
            self.marked_for_review.insert(self.current);
            Ok(true)
        }
    }

    //
    // ─── COUNTDOWN & SUBMISSION ────────────────────────────────────────────
    //

    /// Record one elapsed second of the countdown.
    ///
    /// Returns the remaining seconds after the decrement; saturates at
    /// zero. Only the timer driver should call this.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadySubmitted` after submission.
    pub fn record_tick(&mut self) -> Result<u32, SessionError> {
        self.ensure_running()?;
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        Ok(self.remaining_seconds)
    }

    /// Score the session and transition to `Submitted`.
    ///
    /// This is the single check-and-set that serializes the race between
    /// manual submission and timer expiry: the first caller scores, every
    /// later caller observes `AlreadySubmitted`. Scoring runs exactly once
    /// per session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadySubmitted` if the session was already
    /// submitted.
    pub fn submit(&mut self, now: DateTime<Utc>) -> Result<ExamResult, SessionError> {
        self.ensure_running()?;
        self.status = SessionStatus::Submitted;

        let time_taken = seconds_between(self.started_at, now);
        Ok(score_exam(self.quiz.questions(), &self.answers, time_taken))
    }

    fn ensure_running(&self) -> Result<(), SessionError> {
        match self.status {
            SessionStatus::Running => Ok(()),
            SessionStatus::Submitted => Err(SessionError::AlreadySubmitted),
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("quiz", &self.quiz.name())
            .field("current", &self.current)
            .field("answered", &self.answers.len())
            .field("marked", &self.marked_for_review.len())
            .field("remaining_seconds", &self.remaining_seconds)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
