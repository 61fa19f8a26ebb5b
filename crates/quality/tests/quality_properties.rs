//! End-to-end checks over the public scoring and analytics API

use chrono::{Duration, Utc};

use vidya_config::{AnalyticsConfig, MarkerTables, QualityConfig};
use vidya_core::InteractionRecord;
use vidya_quality::{FeedbackAnalyzer, QualityScorer, ScoreRequest};

fn answers() -> Vec<(&'static str, &'static str, &'static str)> {
    vec![
        ("What is the speed of light", "The speed of light is constant", "en"),
        ("प्रकाश की गति क्या है?", "प्रकाश की गति लगभग तीन लाख किलोमीटर प्रति सेकंड है। भारत में इसे पढ़ाया जाता है।", "hi"),
        ("பொங்கல் என்ன?", "பொங்கல் தமிழ்நாடு அறுவடை திருநாள் ஆகும்.", "ta"),
        ("Explain gravity", "Gravity pulls objects together and keeps planets in orbit around stars", "xx"),
        ("   ", "?", "en"),
        ("!!!", "....", "bn"),
    ]
}

#[test]
fn every_metric_in_unit_interval() {
    let scorer = QualityScorer::builtin();
    for (question, answer, language) in answers() {
        let score = scorer.score(question, answer, language, None);
        assert!((0.0..=1.0).contains(&score.overall_score), "{answer}");
        for (name, value) in score.metrics.iter() {
            assert!((0.0..=1.0).contains(&value), "{name} = {value} for {answer}");
        }
    }
}

#[test]
fn relevance_empty_inputs() {
    let scorer = QualityScorer::builtin();
    let h = scorer.heuristics();
    assert_eq!(h.relevance("", "anything"), 0.0);
    assert_eq!(h.relevance("photosynthesis", ""), 0.0);
}

#[test]
fn speed_of_light_relevance() {
    let score = QualityScorer::builtin().score(
        "What is the speed of light",
        "The speed of light is constant",
        "en",
        None,
    );
    assert_eq!(score.metrics.relevance, 0.667);
}

#[test]
fn hindi_language_markers() {
    let h = QualityScorer::builtin();
    let h = h.heuristics();
    assert_eq!(h.language_quality("यह एक अच्छा उत्तर है", "hi"), 0.8);
    assert_eq!(h.language_quality("no markers here", "hi"), 0.4);
}

#[test]
fn completeness_examples() {
    let scorer = QualityScorer::builtin();
    assert_eq!(scorer.heuristics().completeness("Short."), 0.5);
    assert_eq!(scorer.heuristics().completeness(""), 0.0);
}

#[test]
fn scoring_is_idempotent() {
    let scorer = QualityScorer::builtin();
    for (question, answer, language) in answers() {
        let request = ScoreRequest::new(question, answer, language).with_subject("science");
        let first = serde_json::to_string(&scorer.score_request(&request)).unwrap();
        let second = serde_json::to_string(&scorer.score_request(&request)).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn scorer_is_shareable_across_threads() {
    let scorer = std::sync::Arc::new(QualityScorer::builtin());
    let expected = scorer.score("Why is the sky blue", "Because of scattering.", "en", None);
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let scorer = scorer.clone();
            std::thread::spawn(move || {
                scorer.score("Why is the sky blue", "Because of scattering.", "en", None)
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[test]
fn marker_tables_from_file_drive_scoring() {
    let dir = env!("CARGO_MANIFEST_DIR");
    let path = format!("{dir}/../../config/quality/markers.yaml");
    let tables = MarkerTables::load(&path).unwrap();
    assert_eq!(tables, MarkerTables::builtin());

    let scorer = QualityScorer::from_config(&QualityConfig::default(), tables);
    let builtin = QualityScorer::builtin();
    let (q, a, l) = answers()[1];
    assert_eq!(scorer.score(q, a, l, None), builtin.score(q, a, l, None));
}

#[test]
fn retrain_decision_over_stored_records() {
    let now = Utc::now();
    let mut records = Vec::new();
    for i in 0..1500u32 {
        let rating = if i < 600 { 1 } else { 4 };
        records.push(
            InteractionRecord::new("q", "a", "hi", "science", 8)
                .with_timestamp(now - Duration::hours(i64::from(i % 100)))
                .with_rating(rating),
        );
    }
    for _ in 0..500 {
        records.push(
            InteractionRecord::new("q", "a", "ta", "math", 6)
                .with_timestamp(now - Duration::hours(2))
                .with_rating(1),
        );
    }

    let analyzer = FeedbackAnalyzer::new(AnalyticsConfig::default());
    let decision = analyzer.should_retrain(&records, now);
    assert!(decision.should_tune);
    assert_eq!(decision.evaluated_segments, 2);
    assert_eq!(decision.triggers.len(), 1);
    assert_eq!(decision.triggers[0].segment.language, "hi");
    assert_eq!(decision.triggers[0].negative_count, 600);

    let aggregates = analyzer.aggregate(&records, analyzer.retrain_window(now));
    assert_eq!(aggregates[0].segment.language, "ta");
    for row in &aggregates {
        assert!(row.positive_count + row.negative_count <= row.total_interactions);
    }
}
