//! Keyword-overlap relevance
//!
//! Share of qualifying question tokens that appear verbatim as answer tokens.
//! Both sides are lower-cased and split on whitespace. Question tokens shorter
//! than `min_token_chars` or listed as stopwords do not qualify.

use std::collections::HashSet;

/// Relevance scorer with its token filter
#[derive(Debug, Clone)]
pub struct Relevance {
    min_token_chars: usize,
    stopwords: HashSet<String>,
}

impl Relevance {
    pub fn new(min_token_chars: usize, stopwords: impl IntoIterator<Item = String>) -> Self {
        Self {
            min_token_chars,
            stopwords: stopwords.into_iter().map(|w| w.to_lowercase()).collect(),
        }
    }

    /// Question tokens that count toward relevance, duplicates kept
    pub fn qualifying_tokens(&self, question: &str) -> Vec<String> {
        question
            .to_lowercase()
            .split_whitespace()
            .filter(|t| t.chars().count() >= self.min_token_chars)
            .filter(|t| !self.stopwords.contains(*t))
            .map(str::to_string)
            .collect()
    }

    /// Score in [0, 1]; 0 when no question token qualifies
    pub fn score(&self, question: &str, answer: &str) -> f64 {
        let question_tokens = self.qualifying_tokens(question);
        if question_tokens.is_empty() {
            return 0.0;
        }

        let answer_lower = answer.to_lowercase();
        let answer_tokens: HashSet<&str> = answer_lower.split_whitespace().collect();
        if answer_tokens.is_empty() {
            return 0.0;
        }

        let overlap = question_tokens
            .iter()
            .filter(|t| answer_tokens.contains(t.as_str()))
            .count();

        overlap as f64 / question_tokens.len() as f64
    }
}
