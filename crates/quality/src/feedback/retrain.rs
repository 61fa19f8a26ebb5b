//! Retrain decision
//!
//! A segment trips the rule when its negative share exceeds
//! `retrain_negative_ratio` and its volume exceeds
//! `retrain_min_interactions`. Both comparisons are strict.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vidya_core::{InteractionRecord, SegmentKey};

use super::{FeedbackAggregate, FeedbackAnalyzer};

/// A segment that tripped the retrain rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrainTrigger {
    #[serde(flatten)]
    pub segment: SegmentKey,
    pub negative_ratio: f64,
    pub total_interactions: u64,
    pub negative_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrainDecision {
    pub should_tune: bool,
    pub window_days: u32,
    pub triggers: Vec<RetrainTrigger>,
    pub evaluated_segments: usize,
}

impl FeedbackAnalyzer {
    /// Aggregate the retrain window ending at `now` and evaluate it
    pub fn should_retrain(
        &self,
        records: &[InteractionRecord],
        now: DateTime<Utc>,
    ) -> RetrainDecision {
        let aggregates = self.aggregate(records, self.retrain_window(now));
        self.evaluate_retrain(&aggregates)
    }

    /// Evaluate pre-computed aggregates
    pub fn evaluate_retrain(&self, aggregates: &[FeedbackAggregate]) -> RetrainDecision {
        let triggers: Vec<RetrainTrigger> = aggregates
            .iter()
            .filter(|a| {
                a.total_interactions > self.config.retrain_min_interactions
                    && a.negative_ratio() > self.config.retrain_negative_ratio
            })
            .map(|a| RetrainTrigger {
                segment: a.segment.clone(),
                negative_ratio: a.negative_ratio(),
                total_interactions: a.total_interactions,
                negative_count: a.negative_count,
            })
            .collect();

        let decision = RetrainDecision {
            should_tune: !triggers.is_empty(),
            window_days: self.config.retrain_window_days,
            triggers,
            evaluated_segments: aggregates.len(),
        };

        if decision.should_tune {
            for trigger in &decision.triggers {
                tracing::info!(
                    segment = %trigger.segment,
                    negative_ratio = trigger.negative_ratio,
                    total = trigger.total_interactions,
                    "Segment tripped retrain rule"
                );
            }
        } else {
            tracing::debug!(
                segments = decision.evaluated_segments,
                "No segment tripped retrain rule"
            );
        }
        decision
    }
}
