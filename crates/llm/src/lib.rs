//! Prompt construction for the external answer-generation model
//!
//! Builds the chat messages sent to the model: a system prompt conditioned on
//! subject, grade, tone and target language, followed by the student's
//! question. No network calls are made here.

pub mod prompt;

pub use prompt::{GradeBand, Message, Role, TutorPrompt};

use thiserror::Error;

/// Prompt construction errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PromptError {
    #[error("Question is empty")]
    EmptyQuestion,

    #[error("Invalid grade: {0} (expected 1-12)")]
    InvalidGrade(u8),

    #[error("Context too long: {0} > {1} estimated tokens")]
    ContextTooLong(usize, usize),
}
