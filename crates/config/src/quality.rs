//! Response-quality configuration
//!
//! Weights and per-language marker tables for the quality heuristics.
//! Marker tables map a language code to three word lists:
//!
//! ```yaml
//! fallback_language: en
//! languages:
//!   hi:
//!     language_markers: ["है", "में"]
//!     cultural_markers: ["भारत", "दिवाली"]
//!     stopwords: ["क्या"]
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use vidya_core::Language;

use crate::constants::quality as defaults;
use crate::ConfigError;

/// Quality scorer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityConfig {
    /// Metric weights for the overall score
    #[serde(default)]
    pub weights: ScoringWeights,

    /// Optional path to a marker-table YAML file
    #[serde(default)]
    pub markers_path: Option<String>,

    /// Question tokens need at least this many chars to count for relevance
    #[serde(default = "default_min_token_chars")]
    pub min_token_chars: usize,
}

fn default_min_token_chars() -> usize {
    defaults::MIN_TOKEN_CHARS
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            markers_path: None,
            min_token_chars: default_min_token_chars(),
        }
    }
}

impl QualityConfig {
    /// Resolve marker tables: the configured file, else the built-in set
    pub fn marker_tables(&self) -> Result<MarkerTables, ConfigError> {
        match &self.markers_path {
            Some(path) => MarkerTables::load(path),
            None => Ok(MarkerTables::builtin()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.weights.validate()?;
        if self.min_token_chars == 0 {
            return Err(ConfigError::invalid(
                "quality.min_token_chars",
                "Must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Fixed metric weights
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub relevance: f64,
    pub language_quality: f64,
    pub cultural_context: f64,
    pub completeness: f64,
    pub clarity: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            relevance: defaults::WEIGHT_RELEVANCE,
            language_quality: defaults::WEIGHT_LANGUAGE_QUALITY,
            cultural_context: defaults::WEIGHT_CULTURAL_CONTEXT,
            completeness: defaults::WEIGHT_COMPLETENESS,
            clarity: defaults::WEIGHT_CLARITY,
        }
    }
}

impl ScoringWeights {
    pub fn as_array(&self) -> [f64; 5] {
        [
            self.relevance,
            self.language_quality,
            self.cultural_context,
            self.completeness,
            self.clarity,
        ]
    }

    pub fn total(&self) -> f64 {
        self.as_array().iter().sum()
    }

    /// Each weight in [0, 1] and the sum equal to 1.0
    pub fn validate(&self) -> Result<(), ConfigError> {
        let names = [
            "relevance",
            "language_quality",
            "cultural_context",
            "completeness",
            "clarity",
        ];
        for (name, weight) in names.iter().zip(self.as_array()) {
            if !weight.is_finite() || !(0.0..=1.0).contains(&weight) {
                return Err(ConfigError::InvalidValue {
                    field: format!("quality.weights.{}", name),
                    message: format!("Must be between 0.0 and 1.0, got {}", weight),
                });
            }
        }
        let total = self.total();
        if (total - 1.0).abs() > 1e-6 {
            return Err(ConfigError::invalid(
                "quality.weights",
                format!("Weights must sum to 1.0, got {}", total),
            ));
        }
        Ok(())
    }
}

/// Marker word lists for one language
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LanguageMarkers {
    /// Words whose presence suggests the answer is in this language
    #[serde(default)]
    pub language_markers: Vec<String>,
    /// Place names, festivals and other cultural referents
    #[serde(default)]
    pub cultural_markers: Vec<String>,
    /// Question words ignored for relevance
    #[serde(default)]
    pub stopwords: Vec<String>,
}

static EMPTY_MARKERS: LanguageMarkers = LanguageMarkers {
    language_markers: Vec::new(),
    cultural_markers: Vec::new(),
    stopwords: Vec::new(),
};

/// Immutable language code -> marker lists mapping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerTables {
    #[serde(default = "default_fallback_language")]
    pub fallback_language: String,
    #[serde(default)]
    pub languages: BTreeMap<String, LanguageMarkers>,
}

fn default_fallback_language() -> String {
    defaults::FALLBACK_LANGUAGE.to_string()
}

/// Normalize a language code or name to the table key form
pub fn normalize_code(code: &str) -> String {
    match Language::from_str_loose(code) {
        Some(lang) => lang.code().to_string(),
        None => code.trim().to_lowercase(),
    }
}

impl MarkerTables {
    /// Load from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::FileNotFound(format!("{}: {}", path.as_ref().display(), e))
        })?;
        let tables = Self::from_yaml_str(&content)?;
        tracing::info!(
            path = %path.as_ref().display(),
            languages = tables.languages.len(),
            "Loaded quality marker tables"
        );
        Ok(tables)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let raw: Self =
            serde_yaml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        let tables = Self {
            fallback_language: normalize_code(&raw.fallback_language),
            languages: raw
                .languages
                .into_iter()
                .map(|(code, markers)| (normalize_code(&code), markers))
                .collect(),
        };
        tables.validate()?;
        Ok(tables)
    }

    /// Marker tables for the tutor's supported languages
    pub fn builtin() -> Self {
        let mut languages = BTreeMap::new();
        for (code, language, cultural, stop) in BUILTIN {
            languages.insert(
                code.to_string(),
                LanguageMarkers {
                    language_markers: to_strings(language),
                    cultural_markers: to_strings(cultural),
                    stopwords: to_strings(stop),
                },
            );
        }
        Self {
            fallback_language: default_fallback_language(),
            languages,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.languages.contains_key(&self.fallback_language) {
            return Err(ConfigError::invalid(
                "fallback_language",
                format!("No marker table for '{}'", self.fallback_language),
            ));
        }
        Ok(())
    }

    /// Exact table for a code, if any
    pub fn get(&self, code: &str) -> Option<&LanguageMarkers> {
        self.languages.get(&normalize_code(code))
    }

    /// Table for a code, falling back to the fallback language
    pub fn resolve(&self, code: &str) -> &LanguageMarkers {
        self.get(code)
            .or_else(|| self.languages.get(&self.fallback_language))
            .unwrap_or(&EMPTY_MARKERS)
    }

    /// Union of every table's stopwords, lower-cased
    pub fn all_stopwords(&self) -> Vec<String> {
        let mut words: Vec<String> = self
            .languages
            .values()
            .flat_map(|m| m.stopwords.iter().map(|w| w.to_lowercase()))
            .collect();
        words.sort();
        words.dedup();
        words
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.languages.keys().map(|k| k.as_str())
    }
}

impl Default for MarkerTables {
    fn default() -> Self {
        Self::builtin()
    }
}

fn to_strings(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

type BuiltinRow = (&'static str, &'static [&'static str], &'static [&'static str], &'static [&'static str]);

// Mirrors config/quality/markers.yaml
const BUILTIN: &[BuiltinRow] = &[
    (
        "en",
        &["the", "is", "are", "and", "of"],
        &["India", "Indian", "Diwali", "Holi", "rupee", "monsoon", "Ganga", "Himalaya"],
        &["the", "and", "are", "was", "for", "with", "that", "this"],
    ),
    (
        "hi",
        &["है", "हैं", "का", "की", "के", "में", "और"],
        &["भारत", "दिल्ली", "दिवाली", "होली", "गंगा", "रुपये", "हिमालय"],
        &["क्या", "कैसे", "किस", "लिए"],
    ),
    (
        "ta",
        &["ஆகும்", "மற்றும்", "இது", "என்று"],
        &["தமிழ்நாடு", "சென்னை", "பொங்கல்", "காவேரி", "இந்தியா"],
        &["என்ன", "எப்படி"],
    ),
    (
        "te",
        &["మరియు", "ఇది", "ఉంది", "అని"],
        &["ఆంధ్ర", "తెలంగాణ", "హైదరాబాద్", "సంక్రాంతి", "భారత"],
        &["ఏమిటి", "ఎలా"],
    ),
    (
        "kn",
        &["ಮತ್ತು", "ಇದು", "ಆಗಿದೆ", "ಎಂದು"],
        &["ಕರ್ನಾಟಕ", "ಬೆಂಗಳೂರು", "ಮೈಸೂರು", "ದಸರಾ", "ಭಾರತ"],
        &["ಏನು", "ಹೇಗೆ"],
    ),
    (
        "ml",
        &["ആണ്", "ഒരു", "എന്ന്", "ഉണ്ട്"],
        &["കേരളം", "ഓണം", "കൊച്ചി", "ഭാരത"],
        &["എന്താണ്", "എങ്ങനെ"],
    ),
    (
        "bn",
        &["এবং", "হয়", "এটি", "আছে"],
        &["কলকাতা", "দুর্গা", "বাংলা", "ভারত", "গঙ্গা"],
        &["কী", "কেন"],
    ),
    (
        "mr",
        &["आहे", "आणि", "हे", "आहेत"],
        &["महाराष्ट्र", "मुंबई", "पुणे", "गणेश", "भारत"],
        &["काय", "कसे"],
    ),
    (
        "gu",
        &["છે", "અને", "આ", "માં"],
        &["ગુજરાત", "અમદાવાદ", "નવરાત્રિ", "ભારત"],
        &["શું", "કેવી"],
    ),
    (
        "pa",
        &["ਹੈ", "ਅਤੇ", "ਦਾ", "ਵਿੱਚ"],
        &["ਪੰਜਾਬ", "ਅੰਮ੍ਰਿਤਸਰ", "ਵਿਸਾਖੀ", "ਭਾਰਤ"],
        &["ਕੀ", "ਕਿਵੇਂ"],
    ),
    (
        "or",
        &["ଏବଂ", "ଅଟେ", "ଏହା"],
        &["ଓଡ଼ିଶା", "ପୁରୀ", "ରଥଯାତ୍ରା", "ଭାରତ"],
        &["କଣ", "କିପରି"],
    ),
];
