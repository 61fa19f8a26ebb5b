//! Response quality types
//!
//! Every value in these types lies in `[0, 1]`. Construction goes through
//! [`QualityMetrics::new`] or [`QualityScore::new`], which clamp and sanitize.

use serde::{Deserialize, Serialize};

/// Metric names, in the order they are reported
pub const METRIC_NAMES: [&str; 5] = [
    "relevance",
    "languageQuality",
    "culturalContext",
    "completeness",
    "clarity",
];

/// Clamp a value into `[0, 1]`, mapping non-finite input to 0
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Round to three decimal places for reporting
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Per-metric heuristic scores
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityMetrics {
    pub relevance: f64,
    pub language_quality: f64,
    pub cultural_context: f64,
    pub completeness: f64,
    pub clarity: f64,
}

impl QualityMetrics {
    pub fn new(
        relevance: f64,
        language_quality: f64,
        cultural_context: f64,
        completeness: f64,
        clarity: f64,
    ) -> Self {
        Self {
            relevance: clamp_unit(relevance),
            language_quality: clamp_unit(language_quality),
            cultural_context: clamp_unit(cultural_context),
            completeness: clamp_unit(completeness),
            clarity: clamp_unit(clarity),
        }
    }

    pub fn zeroed() -> Self {
        Self::default()
    }

    /// Metric values paired with their reported names
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> {
        METRIC_NAMES.into_iter().zip([
            self.relevance,
            self.language_quality,
            self.cultural_context,
            self.completeness,
            self.clarity,
        ])
    }

    /// Look up a metric by its reported name
    pub fn get(&self, name: &str) -> Option<f64> {
        self.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    fn rounded(self) -> Self {
        Self {
            relevance: round3(self.relevance),
            language_quality: round3(self.language_quality),
            cultural_context: round3(self.cultural_context),
            completeness: round3(self.completeness),
            clarity: round3(self.clarity),
        }
    }
}

/// Overall score plus its per-metric breakdown
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityScore {
    pub overall_score: f64,
    pub metrics: QualityMetrics,
}

impl QualityScore {
    /// Build a reportable score: clamps, then rounds to three decimals
    pub fn new(overall_score: f64, metrics: QualityMetrics) -> Self {
        Self {
            overall_score: round3(clamp_unit(overall_score)),
            metrics: QualityMetrics::new(
                metrics.relevance,
                metrics.language_quality,
                metrics.cultural_context,
                metrics.completeness,
                metrics.clarity,
            )
            .rounded(),
        }
    }

    pub fn zeroed() -> Self {
        Self::default()
    }

    pub fn is_zeroed(&self) -> bool {
        *self == Self::zeroed()
    }
}
