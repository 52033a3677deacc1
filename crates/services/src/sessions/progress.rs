use quiz_core::model::Session;
use serde::Serialize;

/// Aggregated view of session progress, the counts an exam info panel shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExamProgress {
    pub current: usize,
    pub total: usize,
    pub answered: usize,
    pub unanswered: usize,
    pub marked_for_review: usize,
    pub remaining_seconds: u32,
    pub is_submitted: bool,
}

impl ExamProgress {
    #[must_use]
    pub fn of(session: &Session) -> Self {
        Self {
            current: session.current_index(),
            total: session.quiz().question_count(),
            answered: session.answered_count(),
            unanswered: session.unanswered_count(),
            marked_for_review: session.marked_count(),
            remaining_seconds: session.remaining_seconds(),
            is_submitted: session.is_submitted(),
        }
    }

    /// Remaining time as "M minutes S seconds".
    #[must_use]
    pub fn format_remaining(&self) -> String {
        let minutes = self.remaining_seconds / 60;
        let seconds = self.remaining_seconds % 60;
        format!("{minutes} minutes {seconds} seconds")
    }
}
