#![forbid(unsafe_code)]

pub mod repository;

pub use repository::{
    BookmarkRecord, BookmarkRepository, InMemoryRepository, QuizRecord, QuizRepository,
    ResultRecord, ResultRepository, Storage, StorageError,
};
