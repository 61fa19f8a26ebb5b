//! Marker-word heuristics: target-language and cultural-context signals

use vidya_config::constants::quality::{
    CULTURAL_SATURATION_HITS, LANGUAGE_MARKER_HIT, LANGUAGE_MARKER_MISS,
};

/// 0.8 if any marker is a literal substring of the answer, else 0.4.
/// Empty answers score 0.
pub fn language_quality(answer: &str, markers: &[String]) -> f64 {
    if answer.is_empty() {
        return 0.0;
    }
    if markers
        .iter()
        .any(|m| !m.is_empty() && answer.contains(m.as_str()))
    {
        LANGUAGE_MARKER_HIT
    } else {
        LANGUAGE_MARKER_MISS
    }
}

/// Distinct markers found (case-insensitive) over two, capped at 1
pub fn cultural_relevance(answer: &str, markers: &[String]) -> f64 {
    if answer.is_empty() || markers.is_empty() {
        return 0.0;
    }
    let answer_lower = answer.to_lowercase();
    let mut seen: Vec<String> = Vec::new();
    for marker in markers {
        let marker_lower = marker.to_lowercase();
        if marker_lower.is_empty() || seen.contains(&marker_lower) {
            continue;
        }
        if answer_lower.contains(&marker_lower) {
            seen.push(marker_lower);
        }
    }
    (seen.len() as f64 / CULTURAL_SATURATION_HITS).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_language_quality_hit_and_miss() {
        let hindi = words(&["है", "में"]);
        assert_eq!(language_quality("यह एक अच्छा उत्तर है", &hindi), 0.8);
        assert_eq!(language_quality("no markers here", &hindi), 0.4);
        assert_eq!(language_quality("", &hindi), 0.0);
        assert_eq!(language_quality("   ", &hindi), 0.4);
    }

    #[test]
    fn test_language_quality_is_case_sensitive() {
        let english = words(&["the"]);
        assert_eq!(language_quality("THE END", &english), 0.4);
        assert_eq!(language_quality("bathe", &english), 0.8);
    }

    #[test]
    fn test_cultural_relevance_saturates_at_two() {
        let markers = words(&["India", "Diwali", "Ganga"]);
        assert_eq!(cultural_relevance("nothing relevant", &markers), 0.0);
        assert_eq!(cultural_relevance("people in india", &markers), 0.5);
        assert_eq!(cultural_relevance("Diwali across INDIA", &markers), 1.0);
        assert_eq!(cultural_relevance("India, Diwali, Ganga", &markers), 1.0);
    }

    #[test]
    fn test_cultural_counts_distinct_markers() {
        let markers = words(&["India", "india"]);
        assert_eq!(cultural_relevance("India India India", &markers), 0.5);
    }

    #[test]
    fn test_cultural_empty_table() {
        assert_eq!(cultural_relevance("भारत और दिवाली", &[]), 0.0);
    }
}
