//! Tutor persona configuration
//!
//! Serde defaults are generic placeholders; deployments set the tutor name
//! and tone in `config/default.yaml`.

use serde::{Deserialize, Serialize};

/// Response tone requested from the language model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Encouraging,
    Formal,
    Playful,
    Concise,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Encouraging => "encouraging",
            Self::Formal => "formal",
            Self::Playful => "playful",
            Self::Concise => "concise",
        }
    }

    /// Instruction fragment for the system prompt
    pub fn instruction(&self) -> &'static str {
        match self {
            Self::Encouraging => {
                "Be warm and encouraging. Praise effort and invite follow-up questions."
            }
            Self::Formal => "Use a respectful, formal register suitable for a classroom.",
            Self::Playful => {
                "Be light-hearted and use a short story or game-like example where it helps."
            }
            Self::Concise => "Answer in as few sentences as the explanation allows.",
        }
    }
}

impl std::str::FromStr for Tone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "encouraging" | "friendly" => Ok(Self::Encouraging),
            "formal" => Ok(Self::Formal),
            "playful" | "fun" => Ok(Self::Playful),
            "concise" | "brief" => Ok(Self::Concise),
            other => Err(format!("unknown tone: {}", other)),
        }
    }
}

/// Tutor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TutorConfig {
    /// Tutor name used in the system prompt
    #[serde(default = "default_tutor_name")]
    pub name: String,

    /// Tone when the request does not specify one
    #[serde(default)]
    pub default_tone: Tone,

    /// Upper bound on answer length requested from the model
    #[serde(default = "default_max_sentences")]
    pub max_sentences: u32,
}

fn default_tutor_name() -> String {
    "Tutor".to_string()
}
fn default_max_sentences() -> u32 {
    8
}

impl Default for TutorConfig {
    fn default() -> Self {
        Self {
            name: default_tutor_name(),
            default_tone: Tone::default(),
            max_sentences: default_max_sentences(),
        }
    }
}
