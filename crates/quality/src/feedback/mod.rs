//! Feedback analytics over stored interaction records
//!
//! The caller fetches raw records from its store; everything here is an
//! in-process reduction with no I/O:
//!
//! - [`FeedbackAnalyzer::aggregate`]: per-segment rating statistics, worst
//!   segment first
//! - [`FeedbackAnalyzer::knowledge_gaps`]: struggling (subject, language,
//!   difficulty) groups, most frequent first
//! - [`FeedbackAnalyzer::should_retrain`]: decision over the short window;
//!   it reports what tripped the rule and takes no action itself

mod aggregate;
mod gaps;
mod retrain;

pub use aggregate::FeedbackAggregate;
pub use gaps::KnowledgeGap;
pub use retrain::{RetrainDecision, RetrainTrigger};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use vidya_config::AnalyticsConfig;

/// Closed time interval `[start, end]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// The `days` days up to and including `now`
    pub fn last_days(days: u32, now: DateTime<Utc>) -> Self {
        Self {
            start: now - Duration::days(i64::from(days)),
            end: now,
        }
    }

    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        timestamp >= self.start && timestamp <= self.end
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

/// Feedback reductions configured by [`AnalyticsConfig`]
#[derive(Debug, Clone, Default)]
pub struct FeedbackAnalyzer {
    config: AnalyticsConfig,
}

impl FeedbackAnalyzer {
    pub fn new(config: AnalyticsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Window of `days` days ending at `now`, or the configured feedback
    /// window when `days` is `None` or zero
    pub fn window(&self, days: Option<u32>, now: DateTime<Utc>) -> TimeWindow {
        let days = days
            .filter(|d| *d > 0)
            .unwrap_or(self.config.feedback_window_days);
        TimeWindow::last_days(days, now)
    }

    pub fn retrain_window(&self, now: DateTime<Utc>) -> TimeWindow {
        TimeWindow::last_days(self.config.retrain_window_days, now)
    }
}
