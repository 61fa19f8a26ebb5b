//! Centralized constants for vidya
//!
//! Single source of truth for heuristic thresholds and analytics defaults.
//! Config structs use these as serde defaults; scoring code reads the
//! configured values, never these constants directly.

/// Response-quality heuristics
pub mod quality {
    /// Metric weights (sum to 1.0)
    pub const WEIGHT_RELEVANCE: f64 = 0.30;
    pub const WEIGHT_LANGUAGE_QUALITY: f64 = 0.25;
    pub const WEIGHT_CULTURAL_CONTEXT: f64 = 0.20;
    pub const WEIGHT_COMPLETENESS: f64 = 0.15;
    pub const WEIGHT_CLARITY: f64 = 0.10;

    /// Question tokens shorter than this are ignored for relevance
    pub const MIN_TOKEN_CHARS: usize = 3;

    /// Language used when a code has no marker table
    pub const FALLBACK_LANGUAGE: &str = "en";

    /// Language-quality score when a marker word is present / absent
    pub const LANGUAGE_MARKER_HIT: f64 = 0.8;
    pub const LANGUAGE_MARKER_MISS: f64 = 0.4;

    /// Distinct cultural marker hits that saturate the score
    pub const CULTURAL_SATURATION_HITS: f64 = 2.0;

    /// Answers longer than this (in chars) count as explained
    pub const EXPLANATION_MIN_CHARS: usize = 50;

    /// Sentence-terminal punctuation, including the Devanagari danda
    pub const SENTENCE_TERMINATORS: [char; 4] = ['.', '!', '?', '।'];
}

/// Feedback analytics
pub mod analytics {
    pub const FEEDBACK_WINDOW_DAYS: u32 = 30;
    pub const RETRAIN_WINDOW_DAYS: u32 = 7;
    pub const RETRAIN_NEGATIVE_RATIO: f64 = 0.3;
    pub const RETRAIN_MIN_INTERACTIONS: u64 = 1000;

    /// Ratings at or above count as positive
    pub const POSITIVE_RATING_MIN: u8 = 4;
    /// Ratings at or below count as negative
    pub const NEGATIVE_RATING_MAX: u8 = 2;

    /// Knowledge-gap selection
    pub const GAP_RATING_MAX: u8 = 2;
    pub const GAP_RETRY_MIN: u32 = 2;
    pub const GAP_EXAMPLE_LIMIT: usize = 3;
}

/// Service endpoints (defaults for local development)
pub mod endpoints {
    pub const SCYLLA_DEFAULT: &str = "127.0.0.1:9042";
    pub const SCYLLA_KEYSPACE_DEFAULT: &str = "vidya";
}
