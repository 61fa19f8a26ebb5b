//! Core types for the vidya tutoring backend
//!
//! This crate provides foundational types used across all other crates:
//! - Language definitions (English and ten Indian languages)
//! - Interaction records and feedback updates
//! - Quality metric and score types
//! - Error types

pub mod error;
pub mod interaction;
pub mod language;
pub mod quality;

pub use error::{Error, Result};
pub use interaction::{Difficulty, FeedbackUpdate, InteractionRecord, SegmentKey};
pub use language::{Language, Script};
pub use quality::{QualityMetrics, QualityScore};
