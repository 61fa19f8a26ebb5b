//! Configuration management for vidya
//!
//! Supports loading configuration from:
//! - YAML/TOML files (`config/default`, `config/{env}`)
//! - Environment variables (VIDYA_ prefix, `__` separator)
//!
//! # Quality configuration
//!
//! Marker tables for the response-quality heuristics live in
//! `config/quality/markers.yaml`. When no file is configured the built-in
//! tables from [`MarkerTables::builtin`] are used. Tables are immutable once
//! handed to the scorer.

pub mod analytics;
pub mod constants;
pub mod quality;
pub mod settings;
pub mod tutor;

pub use analytics::AnalyticsConfig;
pub use quality::{LanguageMarkers, MarkerTables, QualityConfig, ScoringWeights};
pub use settings::{
    load_settings, ObservabilityConfig, PersistenceConfig, RuntimeEnvironment, ServerConfig,
    Settings,
};
pub use tutor::{Tone, TutorConfig};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

impl ConfigError {
    pub(crate) fn invalid(field: &str, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            field: field.to_string(),
            message: message.into(),
        }
    }
}
