mod ids;
mod question;
mod quiz;
mod scoring;
mod session;

pub use ids::QuizId;
pub use question::{OptionKey, ParseOptionKeyError, Question, QuestionDraft, QuestionError};
pub use quiz::{Difficulty, Quiz, QuizDraft, QuizError};
pub use scoring::{ExamResult, QuestionOutcome, SelectedAnswer, score_exam};
pub use session::{Session, SessionError, SessionStatus};
