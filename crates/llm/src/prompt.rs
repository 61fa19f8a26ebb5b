//! Tutor prompt building
//!
//! Constructs the system prompt for a grade- and language-aware tutor.

use serde::{Deserialize, Serialize};
use std::fmt;

use vidya_config::{Tone, TutorConfig};
use vidya_core::interaction::validate_grade;
use vidya_core::{Language, Script};

use crate::PromptError;

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// Chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// School stage derived from grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradeBand {
    /// Grades 1-5
    Primary,
    /// Grades 6-8
    Middle,
    /// Grades 9-10
    Secondary,
    /// Grades 11-12
    Senior,
}

impl GradeBand {
    pub fn from_grade(grade: u8) -> Result<Self, PromptError> {
        validate_grade(grade).map_err(|_| PromptError::InvalidGrade(grade))?;
        Ok(match grade {
            1..=5 => Self::Primary,
            6..=8 => Self::Middle,
            9..=10 => Self::Secondary,
            _ => Self::Senior,
        })
    }

    fn guidance(&self) -> &'static str {
        match self {
            Self::Primary => {
                "Use very simple words and short sentences. Explain with objects a child sees every day."
            }
            Self::Middle => {
                "Use simple language. Introduce the correct term once, then explain it with an example."
            }
            Self::Secondary => {
                "Use textbook terminology and show the key steps, as in a board exam answer."
            }
            Self::Senior => {
                "Use precise terminology. Include formulas or definitions where they belong."
            }
        }
    }
}

/// Builder for tutor chat prompts
///
/// ```
/// use vidya_config::{Tone, TutorConfig};
/// use vidya_core::Language;
/// use vidya_llm::TutorPrompt;
///
/// let messages = TutorPrompt::new(&TutorConfig::default())
///     .subject("science")
///     .grade(7)
///     .tone(Tone::Playful)
///     .language(Language::Hindi)
///     .build("पौधे भोजन कैसे बनाते हैं?")
///     .unwrap();
/// assert_eq!(messages.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct TutorPrompt {
    tutor: TutorConfig,
    subject: String,
    grade: u8,
    tone: Tone,
    language: Language,
    context: Option<String>,
    history: Vec<Message>,
}

impl TutorPrompt {
    pub fn new(tutor: &TutorConfig) -> Self {
        Self {
            tutor: tutor.clone(),
            subject: "general knowledge".to_string(),
            grade: 6,
            tone: tutor.default_tone,
            language: Language::default(),
            context: None,
            history: Vec::new(),
        }
    }

    pub fn subject(mut self, subject: &str) -> Self {
        let subject = subject.trim();
        if !subject.is_empty() {
            self.subject = subject.to_string();
        }
        self
    }

    pub fn grade(mut self, grade: u8) -> Self {
        self.grade = grade;
        self
    }

    pub fn tone(mut self, tone: Tone) -> Self {
        self.tone = tone;
        self
    }

    pub fn language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Curriculum excerpt the answer should draw on
    pub fn with_context(mut self, context: &str) -> Self {
        if !context.trim().is_empty() {
            self.context = Some(context.to_string());
        }
        self
    }

    /// Earlier turns of the same session
    pub fn with_history(mut self, history: &[Message]) -> Self {
        self.history.extend(history.iter().cloned());
        self
    }

    /// Render the system prompt alone
    pub fn system_prompt(&self) -> Result<String, PromptError> {
        let band = GradeBand::from_grade(self.grade)?;

        let language_rule = match self.language {
            Language::English => "Answer in English.".to_string(),
            lang => format!(
                "Answer in {} ({}), written in {:?} script. Keep technical terms in English only when no common {} word exists.",
                lang.name(),
                lang.native_name(),
                lang.script(),
                lang.name(),
            ),
        };

        let mut prompt = format!(
            r#"You are {name}, a patient {subject} tutor for a grade {grade} student in India.

## Language
{language_rule}

## Level
{level}

## Tone
{tone}

## Context
Where it helps understanding, use examples from Indian daily life: local places, festivals, food, money in rupees, the monsoon.

## Format
- At most {max_sentences} sentences
- End every sentence with proper punctuation
- If the question is unclear, ask one short clarifying question instead of guessing"#,
            name = self.tutor.name,
            subject = self.subject,
            grade = self.grade,
            language_rule = language_rule,
            level = band.guidance(),
            tone = self.tone.instruction(),
            max_sentences = self.tutor.max_sentences,
        );

        if let Some(context) = &self.context {
            prompt.push_str("\n\n## Reference Material\n");
            prompt.push_str(context);
        }
        Ok(prompt)
    }

    /// System prompt, history, then the question
    pub fn build(self, question: &str) -> Result<Vec<Message>, PromptError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(PromptError::EmptyQuestion);
        }

        let system = self.system_prompt()?;
        tracing::debug!(
            subject = %self.subject,
            grade = self.grade,
            tone = self.tone.as_str(),
            language = self.language.code(),
            history = self.history.len(),
            "Built tutor prompt"
        );

        let mut messages = Vec::with_capacity(self.history.len() + 2);
        messages.push(Message::system(system));
        messages.extend(self.history);
        messages.push(Message::user(question));
        Ok(messages)
    }

    /// Like [`build`](Self::build), dropping the oldest history turns until
    /// the estimate fits `max_tokens`
    pub fn build_with_limit(
        self,
        question: &str,
        max_tokens: usize,
    ) -> Result<Vec<Message>, PromptError> {
        let messages = self.build(question)?;
        let total = estimate_tokens(&messages);
        if total <= max_tokens {
            return Ok(messages);
        }

        let (system, rest): (Vec<_>, Vec<_>) = messages
            .into_iter()
            .partition(|m| matches!(m.role, Role::System));
        let mut rest = rest;
        // The question is always the last message
        let question = rest.pop().ok_or(PromptError::EmptyQuestion)?;

        let required = estimate_tokens(&system) + estimate_message_tokens(&question.content);
        if required > max_tokens {
            return Err(PromptError::ContextTooLong(required, max_tokens));
        }

        let mut available = max_tokens - required;
        let mut kept = Vec::new();
        for msg in rest.into_iter().rev() {
            let cost = estimate_message_tokens(&msg.content);
            if cost > available {
                break;
            }
            available -= cost;
            kept.push(msg);
        }
        kept.reverse();

        tracing::debug!(
            from = total,
            limit = max_tokens,
            kept_turns = kept.len(),
            "Truncated prompt history"
        );

        let mut result = system;
        result.extend(kept);
        result.push(question);
        Ok(result)
    }
}

/// Rough token estimate: Indic scripts tokenize denser than Latin text
pub fn estimate_message_tokens(content: &str) -> usize {
    let chars = content.chars().count();
    let indic = content.chars().filter(|c| Script::is_indic_char(*c)).count();
    if indic > chars / 3 {
        chars.max(1) / 2
    } else {
        chars.max(1) / 4
    }
}

pub fn estimate_tokens(messages: &[Message]) -> usize {
    messages.iter().map(|m| estimate_message_tokens(&m.content)).sum()
}
