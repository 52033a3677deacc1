#![forbid(unsafe_code)]

pub mod error;
pub mod quiz_service;
pub mod sessions;

pub use quiz_core::Clock;

pub use error::{ExamError, HistoryError, QuizCatalogError};
pub use quiz_service::QuizCatalogService;

pub use sessions::{
    ExamLoopService, ExamProgress, ExamSubmission, ResultHistoryService, TimerDriver, TimerTick,
};
