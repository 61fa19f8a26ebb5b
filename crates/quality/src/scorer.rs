//! Weighted quality aggregator
//!
//! Combines the five heuristic metrics into one score with fixed weights.
//! The public entry points return plain values: a failing metric becomes 0,
//! a failing overall computation becomes [`QualityScore::zeroed`]. Use
//! [`QualityScorer::assess`] to see whether that happened.

use serde::{de::IgnoredAny, Deserialize, Deserializer, Serialize};

use vidya_config::{MarkerTables, QualityConfig, ScoringWeights};
use vidya_core::quality::clamp_unit;
use vidya_core::{QualityMetrics, QualityScore};

use crate::error::{finite, MetricError};
use crate::heuristics::TextHeuristics;

/// Scoring input as received from the request handler
///
/// Every field is optional; missing text is treated as empty and a missing
/// language as `en`. A field holding anything other than a string (number,
/// object, null) reads as missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub question: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub answer: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub language: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub subject: Option<String>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lenient {
        Text(String),
        Other(IgnoredAny),
    }

    Ok(match Lenient::deserialize(deserializer)? {
        Lenient::Text(text) => Some(text),
        Lenient::Other(_) => None,
    })
}

impl ScoreRequest {
    pub fn new(question: &str, answer: &str, language: &str) -> Self {
        Self {
            question: Some(question.to_string()),
            answer: Some(answer.to_string()),
            language: Some(language.to_string()),
            subject: None,
        }
    }

    pub fn with_subject(mut self, subject: &str) -> Self {
        self.subject = Some(subject.to_string());
        self
    }
}

/// Whether a score was computed normally
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AssessmentStatus {
    Computed,
    /// Some metrics (or the overall score) were zeroed
    Degraded { reasons: Vec<String> },
}

/// A score plus how it was obtained
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub score: QualityScore,
    #[serde(flatten)]
    pub status: AssessmentStatus,
}

impl Assessment {
    pub fn is_degraded(&self) -> bool {
        matches!(self.status, AssessmentStatus::Degraded { .. })
    }
}

/// Response quality scorer
///
/// Immutable after construction; share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct QualityScorer {
    heuristics: TextHeuristics,
    weights: ScoringWeights,
}

pub const DEFAULT_LANGUAGE: &str = "en";

/// `language`, or [`DEFAULT_LANGUAGE`] when it is blank
pub fn effective_language(language: &str) -> &str {
    if language.trim().is_empty() {
        DEFAULT_LANGUAGE
    } else {
        language
    }
}

impl QualityScorer {
    pub fn new(heuristics: TextHeuristics, weights: ScoringWeights) -> Self {
        Self {
            heuristics,
            weights,
        }
    }

    pub fn from_config(config: &QualityConfig, markers: MarkerTables) -> Self {
        Self::new(TextHeuristics::from_config(config, markers), config.weights)
    }

    /// Scorer with built-in marker tables and default weights
    pub fn builtin() -> Self {
        Self::from_config(&QualityConfig::default(), MarkerTables::builtin())
    }

    pub fn heuristics(&self) -> &TextHeuristics {
        &self.heuristics
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Score one answer. Never fails.
    pub fn score(
        &self,
        question: &str,
        answer: &str,
        language: &str,
        subject: Option<&str>,
    ) -> QualityScore {
        self.assess(question, answer, language, subject).score
    }

    /// Score a request with optional fields. Never fails.
    pub fn score_request(&self, request: &ScoreRequest) -> QualityScore {
        self.assess_request(request).score
    }

    pub fn assess_request(&self, request: &ScoreRequest) -> Assessment {
        self.assess(
            request.question.as_deref().unwrap_or_default(),
            request.answer.as_deref().unwrap_or_default(),
            request.language.as_deref().unwrap_or_default(),
            request.subject.as_deref(),
        )
    }

    /// Score one answer and report any degradation
    pub fn assess(
        &self,
        question: &str,
        answer: &str,
        language: &str,
        subject: Option<&str>,
    ) -> Assessment {
        let language = effective_language(language);
        let mut reasons = Vec::new();
        let mut metric = |result: Result<f64, MetricError>| match result {
            Ok(value) => clamp_unit(value),
            Err(e) => {
                tracing::warn!(error = %e, language, "Quality metric degraded to 0");
                reasons.push(e.to_string());
                0.0
            }
        };

        let h = &self.heuristics;
        let metrics = QualityMetrics::new(
            metric(finite("relevance", h.relevance(question, answer))),
            metric(finite("languageQuality", h.language_quality(answer, language))),
            metric(finite("culturalContext", h.cultural_relevance(answer, language))),
            metric(finite("completeness", h.completeness(answer))),
            metric(finite("clarity", h.clarity(answer))),
        );

        let score = match self.weighted(&metrics) {
            Ok(overall) => QualityScore::new(overall, metrics),
            Err(e) => {
                tracing::warn!(error = %e, language, "Quality score zeroed");
                reasons.push(e.to_string());
                QualityScore::zeroed()
            }
        };

        tracing::debug!(
            language,
            subject = subject.unwrap_or("general"),
            overall = score.overall_score,
            relevance = score.metrics.relevance,
            language_quality = score.metrics.language_quality,
            cultural_context = score.metrics.cultural_context,
            completeness = score.metrics.completeness,
            clarity = score.metrics.clarity,
            "Scored response"
        );

        let status = if reasons.is_empty() {
            AssessmentStatus::Computed
        } else {
            AssessmentStatus::Degraded { reasons }
        };
        Assessment { score, status }
    }

    fn weighted(&self, metrics: &QualityMetrics) -> Result<f64, MetricError> {
        let w = &self.weights;
        let sum = metrics.relevance * w.relevance
            + metrics.language_quality * w.language_quality
            + metrics.cultural_context * w.cultural_context
            + metrics.completeness * w.completeness
            + metrics.clarity * w.clarity;
        if sum.is_finite() {
            Ok(clamp_unit(sum))
        } else {
            Err(MetricError::NonFiniteOverall)
        }
    }
}

impl Default for QualityScorer {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_breakdown() {
        let scorer = QualityScorer::builtin();
        let score = scorer.score(
            "What is the speed of light",
            "The speed of light is constant",
            "en",
            Some("physics"),
        );
        assert_eq!(score.metrics.relevance, 0.667);
        assert_eq!(score.metrics.language_quality, 0.8);
        assert_eq!(score.metrics.cultural_context, 0.0);
        assert_eq!(score.metrics.completeness, 0.0);
        assert_eq!(score.metrics.clarity, 0.7);
        // 0.3 * 2/3 + 0.25 * 0.8 + 0.1 * 0.7
        assert_eq!(score.overall_score, 0.47);
    }

    #[test]
    fn test_empty_request_is_well_formed() {
        let scorer = QualityScorer::builtin();
        let assessment = scorer.assess_request(&ScoreRequest::default());
        assert_eq!(assessment.status, AssessmentStatus::Computed);
        assert!(assessment.score.is_zeroed());
    }

    #[test]
    fn test_missing_language_defaults_to_english() {
        let scorer = QualityScorer::builtin();
        let request = ScoreRequest {
            question: Some("Why is the sky blue".to_string()),
            answer: Some("The sky is blue because of scattering.".to_string()),
            language: None,
            subject: None,
        };
        let explicit = scorer.score("Why is the sky blue", "The sky is blue because of scattering.", "en", None);
        assert_eq!(scorer.score_request(&request), explicit);
    }

    #[test]
    fn test_blank_language_scores_as_english() {
        let scorer = QualityScorer::builtin();
        let answer = "Diwali is celebrated across India.";
        let blank = scorer.score("When is Diwali", answer, "  ", None);
        assert_eq!(blank, scorer.score("When is Diwali", answer, "en", None));
        assert_eq!(scorer.score("When is Diwali", answer, "", None).metrics.cultural_context, 1.0);
    }

    #[test]
    fn test_non_string_fields_read_as_missing() {
        let request: ScoreRequest = serde_json::from_value(serde_json::json!({
            "question": 5,
            "answer": "The speed of light.",
            "language": null,
            "subject": {"name": "physics"}
        }))
        .unwrap();
        assert_eq!(request.question, None);
        assert_eq!(request.answer.as_deref(), Some("The speed of light."));
        assert_eq!(request.language, None);
        assert_eq!(request.subject, None);

        let scorer = QualityScorer::builtin();
        let assessment = scorer.assess_request(&request);
        assert_eq!(assessment.status, AssessmentStatus::Computed);
        assert_eq!(assessment.score.metrics.relevance, 0.0);
        assert_eq!(assessment.score.metrics.completeness, 0.5);
    }

    #[test]
    fn test_non_finite_weights_zero_the_score() {
        let weights = ScoringWeights {
            clarity: f64::NAN,
            ..ScoringWeights::default()
        };
        let scorer = QualityScorer::new(TextHeuristics::default(), weights);
        let assessment = scorer.assess("What is rain", "Rain is water.", "en", None);
        assert!(assessment.is_degraded());
        assert!(assessment.score.is_zeroed());
    }

    #[test]
    fn test_overall_is_clamped_for_oversized_weights() {
        let weights = ScoringWeights {
            relevance: 1.0,
            language_quality: 1.0,
            cultural_context: 1.0,
            completeness: 1.0,
            clarity: 1.0,
        };
        let scorer = QualityScorer::new(TextHeuristics::default(), weights);
        let score = scorer.score(
            "Where is the Ganga",
            "The Ganga flows across India from the Himalaya. It is sacred.",
            "en",
            None,
        );
        assert_eq!(score.overall_score, 1.0);
    }

    #[test]
    fn test_assessment_serializes_status_inline() {
        let scorer = QualityScorer::builtin();
        let json = serde_json::to_value(scorer.assess("a", "b", "en", None)).unwrap();
        assert_eq!(json["status"], "computed");
        assert!(json["score"]["overallScore"].is_number());
    }
}
