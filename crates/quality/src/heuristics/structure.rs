//! Structural heuristics: completeness and clarity
//!
//! Both are language-independent. Sentence boundaries are `. ! ?` and the
//! Devanagari danda `।`. Lengths are counted in chars, not bytes.

use once_cell::sync::Lazy;
use regex::Regex;

use vidya_config::constants::quality::{EXPLANATION_MIN_CHARS, SENTENCE_TERMINATORS};

static SENTENCE_SPLIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?।]+").expect("sentence split pattern is valid"));

/// 0.5 for a terminal punctuation mark plus 0.5 for more than 50 chars.
/// Trailing whitespace is skipped when looking for the mark but still
/// counts toward the length.
pub fn completeness(answer: &str) -> f64 {
    let has_conclusion = answer
        .trim_end()
        .chars()
        .last()
        .map_or(false, |c| SENTENCE_TERMINATORS.contains(&c));
    let has_explanation = answer.chars().count() > EXPLANATION_MIN_CHARS;

    let mut score = 0.0;
    if has_conclusion {
        score += 0.5;
    }
    if has_explanation {
        score += 0.5;
    }
    score
}

/// Non-empty sentences, trimmed
pub fn sentences(answer: &str) -> Vec<&str> {
    SENTENCE_SPLIT
        .split(answer)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Mean sentence length mapped through a step function.
/// Moderate sentences score best; run-ons score worst.
pub fn clarity(answer: &str) -> f64 {
    let sentences = sentences(answer);
    if sentences.is_empty() {
        return 0.0;
    }

    let total_chars: usize = sentences.iter().map(|s| s.chars().count()).sum();
    let mean = total_chars as f64 / sentences.len() as f64;

    if mean > 150.0 {
        0.3
    } else if mean > 100.0 {
        0.6
    } else if mean > 50.0 {
        0.9
    } else {
        0.7
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completeness_examples() {
        assert_eq!(completeness("Short."), 0.5);
        assert_eq!(completeness(""), 0.0);
        assert_eq!(completeness("no ending punctuation"), 0.0);
        assert_eq!(
            completeness("Photosynthesis turns light, water and carbon dioxide into sugar."),
            1.0
        );
    }

    #[test]
    fn test_completeness_accepts_danda_and_trailing_space() {
        assert_eq!(completeness("यह सही है। "), 0.5);
        assert_eq!(completeness("Really?\n"), 0.5);
    }

    #[test]
    fn test_completeness_long_without_terminal() {
        let long = "a".repeat(51);
        assert_eq!(completeness(&long), 0.5);
        assert_eq!(completeness(&"a".repeat(50)), 0.0);
    }

    #[test]
    fn test_completeness_length_includes_trailing_whitespace() {
        let padded = format!("{}     ", "a".repeat(48));
        assert_eq!(padded.chars().count(), 53);
        assert_eq!(completeness(&padded), 0.5);
        assert_eq!(completeness(&format!("{}.     ", "a".repeat(48))), 1.0);
        assert_eq!(completeness("   "), 0.0);
    }

    #[test]
    fn test_sentence_split() {
        assert_eq!(
            sentences("One. Two!! Three?  । Four"),
            vec!["One", "Two", "Three", "Four"]
        );
        assert!(sentences("...!!!").is_empty());
    }

    #[test]
    fn test_clarity_steps() {
        assert_eq!(clarity(""), 0.0);
        assert_eq!(clarity("..."), 0.0);
        assert_eq!(clarity("Short one. Another short one."), 0.7);
        assert_eq!(clarity(&format!("{}.", "a".repeat(60))), 0.9);
        assert_eq!(clarity(&format!("{}.", "a".repeat(120))), 0.6);
        assert_eq!(clarity(&format!("{}.", "a".repeat(151))), 0.3);
    }

    #[test]
    fn test_clarity_boundaries_are_exclusive() {
        assert_eq!(clarity(&"a".repeat(50)), 0.7);
        assert_eq!(clarity(&"a".repeat(100)), 0.9);
        assert_eq!(clarity(&"a".repeat(150)), 0.6);
    }

    #[test]
    fn test_clarity_counts_devanagari_chars() {
        // 20 chars per sentence, 60 bytes each
        let sentence = "क".repeat(20);
        let text = format!("{}। {}।", sentence, sentence);
        assert_eq!(clarity(&text), 0.7);
    }
}
