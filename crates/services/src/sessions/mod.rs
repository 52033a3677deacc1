mod history;
mod progress;
mod timer;
mod workflow;

// Public API of the exam subsystem.
pub use crate::error::ExamError;
pub use history::ResultHistoryService;
pub use progress::ExamProgress;
pub use timer::{TimerDriver, TimerTick};
pub use workflow::{ExamLoopService, ExamSubmission};
