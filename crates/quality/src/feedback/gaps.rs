//! Knowledge-gap detection
//!
//! A record signals a gap when the user rated it low, retried repeatedly or
//! flagged it for review. Gaps are grouped by (subject, language, difficulty).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use vidya_core::{Difficulty, InteractionRecord};

use super::{FeedbackAnalyzer, TimeWindow};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeGap {
    pub subject: String,
    pub language: String,
    pub difficulty: Difficulty,
    /// Gap-signalling records in the group
    pub count: u64,
    pub avg_rating: Option<f64>,
    pub avg_retries: f64,
    pub flagged_count: u64,
    /// Most recent distinct questions, newest first
    pub example_questions: Vec<String>,
}

type GapKey = (String, String, Difficulty);

#[derive(Default)]
struct GapAccumulator<'a> {
    records: Vec<&'a InteractionRecord>,
}

impl<'a> GapAccumulator<'a> {
    fn finish(mut self, key: GapKey, example_limit: usize) -> KnowledgeGap {
        let (subject, language, difficulty) = key;
        let count = self.records.len() as u64;

        let ratings: Vec<u8> = self.records.iter().filter_map(|r| r.user_rating).collect();
        let avg_rating = (!ratings.is_empty())
            .then(|| ratings.iter().map(|r| f64::from(*r)).sum::<f64>() / ratings.len() as f64);
        let retries: u64 = self.records.iter().map(|r| u64::from(r.retry_count)).sum();
        let flagged_count = self.records.iter().filter(|r| r.flagged_for_review).count() as u64;

        self.records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        let mut example_questions: Vec<String> = Vec::new();
        for record in &self.records {
            if example_questions.len() >= example_limit {
                break;
            }
            if !example_questions.contains(&record.question) {
                example_questions.push(record.question.clone());
            }
        }

        KnowledgeGap {
            subject,
            language,
            difficulty,
            count,
            avg_rating,
            avg_retries: retries as f64 / count.max(1) as f64,
            flagged_count,
            example_questions,
        }
    }
}

impl FeedbackAnalyzer {
    /// Whether a record signals the user struggled with the answer
    pub fn is_gap_signal(&self, record: &InteractionRecord) -> bool {
        record
            .user_rating
            .map_or(false, |r| r <= self.config.gap_rating_max)
            || record.retry_count >= self.config.gap_retry_min
            || record.flagged_for_review
    }

    /// Gap groups inside `window`, most frequent first
    pub fn knowledge_gaps(
        &self,
        records: &[InteractionRecord],
        window: TimeWindow,
    ) -> Vec<KnowledgeGap> {
        let mut groups: BTreeMap<GapKey, GapAccumulator<'_>> = BTreeMap::new();

        for record in records
            .iter()
            .filter(|r| window.contains(r.timestamp) && self.is_gap_signal(r))
        {
            let key = (
                record.subject.clone(),
                record.language.clone(),
                record.difficulty(),
            );
            groups.entry(key).or_default().records.push(record);
        }

        // BTreeMap order makes the stable sort deterministic on ties
        let mut gaps: Vec<KnowledgeGap> = groups
            .into_iter()
            .map(|(key, acc)| acc.finish(key, self.config.gap_example_limit))
            .collect();
        gaps.sort_by(|a, b| b.count.cmp(&a.count));

        tracing::debug!(
            records = records.len(),
            gaps = gaps.len(),
            "Computed knowledge gaps"
        );
        gaps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn record(subject: &str, question: &str) -> InteractionRecord {
        InteractionRecord::new(question, "answer", "hi", subject, 8)
    }

    #[test]
    fn test_gap_signals() {
        let analyzer = FeedbackAnalyzer::default();
        assert!(analyzer.is_gap_signal(&record("math", "q").with_rating(2)));
        assert!(analyzer.is_gap_signal(&record("math", "q").with_retries(2)));
        assert!(analyzer.is_gap_signal(&record("math", "q").flagged()));
        assert!(!analyzer.is_gap_signal(&record("math", "q").with_rating(3).with_retries(1)));
        assert!(!analyzer.is_gap_signal(&record("math", "q")));
    }

    #[test]
    fn test_most_frequent_gap_first() {
        let now = Utc::now();
        let records = vec![
            record("physics", "What is inertia?").with_rating(1),
            record("math", "What is a prime?").with_rating(2),
            record("math", "Why is 1 not prime?").with_retries(3),
            record("math", "What is a prime?").flagged(),
            record("math", "Fine question").with_rating(5),
        ];

        let analyzer = FeedbackAnalyzer::default();
        let gaps = analyzer.knowledge_gaps(&records, analyzer.window(None, now + Duration::seconds(1)));

        assert_eq!(gaps.len(), 2);
        assert_eq!(gaps[0].subject, "math");
        assert_eq!(gaps[0].count, 3);
        assert_eq!(gaps[0].flagged_count, 1);
        assert_eq!(gaps[0].avg_rating, Some(2.0));
        assert_eq!(gaps[0].avg_retries, 1.0);
        assert_eq!(gaps[0].difficulty, Difficulty::Unknown);
        assert_eq!(gaps[1].subject, "physics");
    }

    #[test]
    fn test_difficulty_splits_groups() {
        let now = Utc::now();
        let records = vec![
            record("math", "q1").with_rating(1).with_difficulty(Difficulty::Basic),
            record("math", "q2").with_rating(1).with_difficulty(Difficulty::Advanced),
            record("math", "q3").with_rating(1).with_difficulty(Difficulty::Advanced),
        ];
        let analyzer = FeedbackAnalyzer::default();
        let gaps = analyzer.knowledge_gaps(&records, analyzer.window(None, now + Duration::seconds(1)));
        assert_eq!(gaps.len(), 2);
        assert_eq!(gaps[0].difficulty, Difficulty::Advanced);
        assert_eq!(gaps[0].count, 2);
    }

    #[test]
    fn test_examples_are_distinct_newest_first_and_limited() {
        let now = Utc::now();
        let records: Vec<InteractionRecord> = ["a", "b", "b", "c", "d"]
            .iter()
            .enumerate()
            .map(|(i, q)| {
                record("math", q)
                    .with_rating(1)
                    .with_timestamp(now - Duration::minutes(10 - i as i64))
            })
            .collect();

        let analyzer = FeedbackAnalyzer::default();
        let gaps = analyzer.knowledge_gaps(&records, analyzer.window(None, now));
        assert_eq!(gaps[0].count, 5);
        assert_eq!(gaps[0].example_questions, vec!["d", "c", "b"]);
    }
}
