//! Internal metric failures
//!
//! These never leave the scorer: they are logged and turned into a zero
//! metric (or a zeroed score) and reported through
//! [`AssessmentStatus::Degraded`](crate::AssessmentStatus::Degraded).

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MetricError {
    #[error("{metric} produced a non-finite value")]
    NonFinite { metric: &'static str },

    #[error("weighted sum is non-finite")]
    NonFiniteOverall,
}

/// Accept finite values, reject NaN and infinities
pub(crate) fn finite(metric: &'static str, value: f64) -> Result<f64, MetricError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(MetricError::NonFinite { metric })
    }
}
