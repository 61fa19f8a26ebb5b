//! Per-segment rating statistics

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use vidya_core::{InteractionRecord, SegmentKey};

use super::{FeedbackAnalyzer, TimeWindow};

/// Rating statistics for one (language, subject, grade) segment
///
/// `positive_count + negative_count <= total_interactions`: neutral and
/// unrated records count toward neither.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackAggregate {
    #[serde(flatten)]
    pub segment: SegmentKey,
    /// Mean over rated records; `None` when nothing in the segment is rated
    pub avg_rating: Option<f64>,
    pub total_interactions: u64,
    pub positive_count: u64,
    pub negative_count: u64,
    /// Milliseconds
    pub avg_response_time: f64,
    pub avg_tokens_used: f64,
}

impl FeedbackAggregate {
    /// Share of all interactions in the segment rated negative
    pub fn negative_ratio(&self) -> f64 {
        if self.total_interactions == 0 {
            0.0
        } else {
            self.negative_count as f64 / self.total_interactions as f64
        }
    }
}

#[derive(Default)]
struct Accumulator {
    total: u64,
    rated: u64,
    rating_sum: u64,
    positive: u64,
    negative: u64,
    response_time_sum: u128,
    tokens_sum: u64,
}

impl Accumulator {
    fn finish(self, segment: SegmentKey) -> FeedbackAggregate {
        let total = self.total.max(1) as f64;
        FeedbackAggregate {
            segment,
            avg_rating: (self.rated > 0).then(|| self.rating_sum as f64 / self.rated as f64),
            total_interactions: self.total,
            positive_count: self.positive,
            negative_count: self.negative,
            avg_response_time: self.response_time_sum as f64 / total,
            avg_tokens_used: self.tokens_sum as f64 / total,
        }
    }
}

/// Ascending by average rating, unrated segments last, then by segment key
pub(crate) fn worst_first(a: &FeedbackAggregate, b: &FeedbackAggregate) -> Ordering {
    let by_rating = match (a.avg_rating, b.avg_rating) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_rating.then_with(|| a.segment.cmp(&b.segment))
}

impl FeedbackAnalyzer {
    /// Group records inside `window` by segment, worst-rated segment first
    pub fn aggregate(
        &self,
        records: &[InteractionRecord],
        window: TimeWindow,
    ) -> Vec<FeedbackAggregate> {
        let mut segments: BTreeMap<SegmentKey, Accumulator> = BTreeMap::new();

        for record in records.iter().filter(|r| window.contains(r.timestamp)) {
            let acc = segments.entry(record.segment()).or_default();
            acc.total += 1;
            acc.response_time_sum += u128::from(record.response_time);
            acc.tokens_sum += u64::from(record.tokens_used);

            if let Some(rating) = record.user_rating {
                acc.rated += 1;
                acc.rating_sum += u64::from(rating);
                if rating >= self.config.positive_rating_min {
                    acc.positive += 1;
                } else if rating <= self.config.negative_rating_max {
                    acc.negative += 1;
                }
            }
        }

        let mut aggregates: Vec<FeedbackAggregate> = segments
            .into_iter()
            .map(|(segment, acc)| acc.finish(segment))
            .collect();
        aggregates.sort_by(worst_first);

        tracing::debug!(
            records = records.len(),
            segments = aggregates.len(),
            window_days = window.days(),
            "Aggregated feedback"
        );
        aggregates
    }
}
