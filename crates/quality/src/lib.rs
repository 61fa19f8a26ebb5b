//! Response quality scoring and feedback analytics
//!
//! Two halves:
//! - [`heuristics`] + [`scorer`]: cheap rule-based proxies for answer quality,
//!   combined into one weighted [`QualityScore`]. Scoring never fails; a
//!   broken computation degrades to zero.
//! - [`feedback`]: in-process reduction over stored interaction records into
//!   per-segment rating statistics, knowledge gaps and a retrain decision.
//!
//! All functions are pure and hold no shared mutable state, so a single
//! [`QualityScorer`] can be shared across threads.

pub mod error;
pub mod feedback;
pub mod heuristics;
pub mod scorer;

pub use error::MetricError;
pub use feedback::{
    FeedbackAggregate, FeedbackAnalyzer, KnowledgeGap, RetrainDecision, RetrainTrigger,
    TimeWindow,
};
pub use heuristics::TextHeuristics;
pub use scorer::{Assessment, AssessmentStatus, QualityScorer, ScoreRequest};

pub use vidya_core::{QualityMetrics, QualityScore};
