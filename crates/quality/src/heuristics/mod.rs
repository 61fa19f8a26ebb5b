//! Text heuristics over a single answer string
//!
//! Each heuristic maps its inputs to a score in [0, 1]. Language-dependent
//! heuristics read from the [`MarkerTables`] injected at construction.

mod markers;
mod relevance;
mod structure;

pub use markers::{cultural_relevance, language_quality};
pub use relevance::Relevance;
pub use structure::{clarity, completeness, sentences};

use vidya_config::{MarkerTables, QualityConfig};

/// Heuristic metric functions bound to one set of marker tables
#[derive(Debug, Clone)]
pub struct TextHeuristics {
    markers: MarkerTables,
    relevance: Relevance,
}

impl TextHeuristics {
    pub fn new(markers: MarkerTables, min_token_chars: usize) -> Self {
        let relevance = Relevance::new(min_token_chars, markers.all_stopwords());
        Self { markers, relevance }
    }

    pub fn from_config(config: &QualityConfig, markers: MarkerTables) -> Self {
        Self::new(markers, config.min_token_chars)
    }

    pub fn markers(&self) -> &MarkerTables {
        &self.markers
    }

    pub fn relevance(&self, question: &str, answer: &str) -> f64 {
        self.relevance.score(question, answer)
    }

    /// Falls back to the fallback language's markers for unknown codes
    pub fn language_quality(&self, answer: &str, language: &str) -> f64 {
        language_quality(answer, &self.markers.resolve(language).language_markers)
    }

    /// Unknown codes have no cultural markers and score 0
    pub fn cultural_relevance(&self, answer: &str, language: &str) -> f64 {
        match self.markers.get(language) {
            Some(table) => cultural_relevance(answer, &table.cultural_markers),
            None => 0.0,
        }
    }

    pub fn completeness(&self, answer: &str) -> f64 {
        completeness(answer)
    }

    pub fn clarity(&self, answer: &str) -> f64 {
        clarity(answer)
    }
}

impl Default for TextHeuristics {
    fn default() -> Self {
        Self::from_config(&QualityConfig::default(), MarkerTables::builtin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_quality_uses_language_table() {
        let h = TextHeuristics::default();
        assert_eq!(h.language_quality("यह एक अच्छा उत्तर है", "hi"), 0.8);
        assert_eq!(h.language_quality("no markers here", "hi"), 0.4);
    }

    #[test]
    fn test_unknown_language_falls_back_to_english_markers() {
        let h = TextHeuristics::default();
        assert_eq!(h.language_quality("the answer is here", "xx"), 0.8);
        assert_eq!(h.language_quality("यह उत्तर है", "xx"), 0.4);
    }

    #[test]
    fn test_cultural_relevance_unknown_language_is_zero() {
        let h = TextHeuristics::default();
        assert_eq!(h.cultural_relevance("India celebrates Diwali", "xx"), 0.0);
        assert_eq!(h.cultural_relevance("India celebrates Diwali", "en"), 1.0);
        assert_eq!(h.cultural_relevance("भारत में दिवाली", "hindi"), 1.0);
    }

    #[test]
    fn test_relevance_uses_stopwords_from_tables() {
        let h = TextHeuristics::default();
        let score = h.relevance("What is the speed of light", "The speed of light is constant");
        assert!((score - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_injected_tables_replace_builtin() {
        let yaml = "languages:\n  en:\n    language_markers: [\"zebra\"]\n";
        let tables = MarkerTables::from_yaml_str(yaml).unwrap();
        let h = TextHeuristics::new(tables, 3);
        assert_eq!(h.language_quality("the zebra runs", "en"), 0.8);
        assert_eq!(h.language_quality("the horse runs", "en"), 0.4);
    }
}
