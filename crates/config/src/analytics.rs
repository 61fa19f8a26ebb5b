//! Feedback analytics configuration

use serde::{Deserialize, Serialize};

use crate::constants::analytics as defaults;
use crate::ConfigError;

/// Windows and thresholds for feedback aggregation and retrain decisions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Default look-back window for feedback aggregates
    #[serde(default = "default_feedback_window_days")]
    pub feedback_window_days: u32,

    /// Look-back window for the retrain decision
    #[serde(default = "default_retrain_window_days")]
    pub retrain_window_days: u32,

    /// Negative share above which a segment trips the retrain rule
    #[serde(default = "default_retrain_negative_ratio")]
    pub retrain_negative_ratio: f64,

    /// Segment volume above which the retrain rule applies
    #[serde(default = "default_retrain_min_interactions")]
    pub retrain_min_interactions: u64,

    #[serde(default = "default_positive_rating_min")]
    pub positive_rating_min: u8,

    #[serde(default = "default_negative_rating_max")]
    pub negative_rating_max: u8,

    /// Ratings at or below mark a knowledge gap
    #[serde(default = "default_gap_rating_max")]
    pub gap_rating_max: u8,

    /// Retries at or above mark a knowledge gap
    #[serde(default = "default_gap_retry_min")]
    pub gap_retry_min: u32,

    /// Example questions kept per knowledge gap
    #[serde(default = "default_gap_example_limit")]
    pub gap_example_limit: usize,
}

fn default_feedback_window_days() -> u32 {
    defaults::FEEDBACK_WINDOW_DAYS
}
fn default_retrain_window_days() -> u32 {
    defaults::RETRAIN_WINDOW_DAYS
}
fn default_retrain_negative_ratio() -> f64 {
    defaults::RETRAIN_NEGATIVE_RATIO
}
fn default_retrain_min_interactions() -> u64 {
    defaults::RETRAIN_MIN_INTERACTIONS
}
fn default_positive_rating_min() -> u8 {
    defaults::POSITIVE_RATING_MIN
}
fn default_negative_rating_max() -> u8 {
    defaults::NEGATIVE_RATING_MAX
}
fn default_gap_rating_max() -> u8 {
    defaults::GAP_RATING_MAX
}
fn default_gap_retry_min() -> u32 {
    defaults::GAP_RETRY_MIN
}
fn default_gap_example_limit() -> usize {
    defaults::GAP_EXAMPLE_LIMIT
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            feedback_window_days: default_feedback_window_days(),
            retrain_window_days: default_retrain_window_days(),
            retrain_negative_ratio: default_retrain_negative_ratio(),
            retrain_min_interactions: default_retrain_min_interactions(),
            positive_rating_min: default_positive_rating_min(),
            negative_rating_max: default_negative_rating_max(),
            gap_rating_max: default_gap_rating_max(),
            gap_retry_min: default_gap_retry_min(),
            gap_example_limit: default_gap_example_limit(),
        }
    }
}

impl AnalyticsConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.feedback_window_days == 0 {
            return Err(ConfigError::invalid(
                "analytics.feedback_window_days",
                "Window must be at least one day",
            ));
        }
        if self.retrain_window_days == 0 {
            return Err(ConfigError::invalid(
                "analytics.retrain_window_days",
                "Window must be at least one day",
            ));
        }
        if !(0.0..=1.0).contains(&self.retrain_negative_ratio) {
            return Err(ConfigError::invalid(
                "analytics.retrain_negative_ratio",
                format!(
                    "Must be between 0.0 and 1.0, got {}",
                    self.retrain_negative_ratio
                ),
            ));
        }
        // A rating cannot be both positive and negative
        if self.negative_rating_max >= self.positive_rating_min {
            return Err(ConfigError::invalid(
                "analytics.negative_rating_max",
                format!(
                    "Must be below positive_rating_min ({})",
                    self.positive_rating_min
                ),
            ));
        }
        Ok(())
    }
}
