//! Error types shared across crates

use thiserror::Error;

/// Core result type
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Rating must be between 1 and 5, got {0}")]
    InvalidRating(u8),

    #[error("Grade must be between 1 and 12, got {0}")]
    InvalidGrade(u8),

    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("Invalid difficulty: {0}")]
    InvalidDifficulty(String),
}
