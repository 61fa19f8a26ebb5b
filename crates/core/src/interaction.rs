//! Interaction records
//!
//! One record is created per question/answer exchange. Feedback arrives
//! later as a [`FeedbackUpdate`]; records are never deleted by this crate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::quality::QualityScore;

/// Concept difficulty tag attached by the curriculum tagger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Basic,
    Intermediate,
    Advanced,
    #[default]
    Unknown,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
            Self::Unknown => "unknown",
        }
    }
}

impl std::str::FromStr for Difficulty {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "basic" | "easy" => Ok(Self::Basic),
            "intermediate" | "medium" => Ok(Self::Intermediate),
            "advanced" | "hard" => Ok(Self::Advanced),
            "unknown" | "" => Ok(Self::Unknown),
            other => Err(Error::InvalidDifficulty(other.to_string())),
        }
    }
}

/// A logged question/answer exchange plus user feedback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionRecord {
    pub id: Uuid,
    pub question: String,
    pub answer: String,
    /// Language code as received (normally ISO 639-1)
    pub language: String,
    pub subject: String,
    pub grade: u8,
    #[serde(default)]
    pub user_rating: Option<u8>,
    #[serde(default)]
    pub retry_count: u32,
    #[serde(default)]
    pub flagged_for_review: bool,
    /// Time to produce the answer, in milliseconds
    #[serde(default)]
    pub response_time: u64,
    #[serde(default)]
    pub tokens_used: u32,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub concept_difficulty: Option<Difficulty>,
    #[serde(default)]
    pub quality: Option<QualityScore>,
}

impl InteractionRecord {
    pub fn new(
        question: impl Into<String>,
        answer: impl Into<String>,
        language: impl Into<String>,
        subject: impl Into<String>,
        grade: u8,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            question: question.into(),
            answer: answer.into(),
            language: language.into(),
            subject: subject.into(),
            grade,
            user_rating: None,
            retry_count: 0,
            flagged_for_review: false,
            response_time: 0,
            tokens_used: 0,
            timestamp: Utc::now(),
            concept_difficulty: None,
            quality: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_usage(mut self, response_time_ms: u64, tokens_used: u32) -> Self {
        self.response_time = response_time_ms;
        self.tokens_used = tokens_used;
        self
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.concept_difficulty = Some(difficulty);
        self
    }

    pub fn with_rating(mut self, rating: u8) -> Self {
        self.user_rating = Some(rating);
        self
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retry_count = retries;
        self
    }

    pub fn flagged(mut self) -> Self {
        self.flagged_for_review = true;
        self
    }

    /// Check grade and rating ranges
    pub fn validate(&self) -> Result<()> {
        validate_grade(self.grade)?;
        if let Some(rating) = self.user_rating {
            validate_rating(rating)?;
        }
        Ok(())
    }

    pub fn segment(&self) -> SegmentKey {
        SegmentKey {
            language: self.language.clone(),
            subject: self.subject.clone(),
            grade: self.grade,
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.concept_difficulty.unwrap_or_default()
    }
}

pub fn validate_rating(rating: u8) -> Result<()> {
    if (1..=5).contains(&rating) {
        Ok(())
    } else {
        Err(Error::InvalidRating(rating))
    }
}

pub fn validate_grade(grade: u8) -> Result<()> {
    if (1..=12).contains(&grade) {
        Ok(())
    } else {
        Err(Error::InvalidGrade(grade))
    }
}

/// User feedback written back onto a stored record
///
/// `user_rating` and `flagged_for_review` may each be set once per record;
/// `additional_retries` is added to the running retry count.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackUpdate {
    #[serde(default)]
    pub user_rating: Option<u8>,
    #[serde(default)]
    pub flagged_for_review: Option<bool>,
    #[serde(default)]
    pub additional_retries: u32,
}

impl FeedbackUpdate {
    pub fn rating(rating: u8) -> Self {
        Self {
            user_rating: Some(rating),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self.user_rating {
            Some(rating) => validate_rating(rating),
            None => Ok(()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.user_rating.is_none() && self.flagged_for_review.is_none() && self.additional_retries == 0
    }
}

/// Analytics grouping key: (language, subject, grade)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SegmentKey {
    pub language: String,
    pub subject: String,
    pub grade: u8,
}

impl std::fmt::Display for SegmentKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/grade-{}", self.language, self.subject, self.grade)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_ranges() {
        let record = InteractionRecord::new("q", "a", "hi", "science", 7);
        assert!(record.validate().is_ok());
        assert_eq!(
            record.clone().with_rating(6).validate(),
            Err(Error::InvalidRating(6))
        );

        let bad_grade = InteractionRecord::new("q", "a", "hi", "science", 0);
        assert_eq!(bad_grade.validate(), Err(Error::InvalidGrade(0)));
    }

    #[test]
    fn test_record_deserializes_document_field_names() {
        let json = serde_json::json!({
            "id": "6f1c1e4a-2d0b-4a55-9d0f-3c7b6b8e2a11",
            "question": "प्रकाश की गति क्या है?",
            "answer": "प्रकाश की गति लगभग 3 लाख किमी प्रति सेकंड है।",
            "language": "hi",
            "subject": "physics",
            "grade": 9,
            "userRating": 2,
            "retryCount": 1,
            "flaggedForReview": false,
            "responseTime": 840,
            "tokensUsed": 212,
            "timestamp": "2026-10-01T10:00:00Z",
            "conceptDifficulty": "intermediate"
        });
        let record: InteractionRecord = serde_json::from_value(json).unwrap();
        assert_eq!(record.user_rating, Some(2));
        assert_eq!(record.difficulty(), Difficulty::Intermediate);
        assert!(record.quality.is_none());
    }

    #[test]
    fn test_difficulty_defaults_to_unknown() {
        let record = InteractionRecord::new("q", "a", "en", "math", 3);
        assert_eq!(record.difficulty(), Difficulty::Unknown);
        assert_eq!("hard".parse::<Difficulty>(), Ok(Difficulty::Advanced));
        assert!("weird".parse::<Difficulty>().is_err());
    }

    #[test]
    fn test_segment_display() {
        let record = InteractionRecord::new("q", "a", "ta", "history", 10);
        assert_eq!(record.segment().to_string(), "ta/history/grade-10");
    }

    #[test]
    fn test_feedback_update_validation() {
        assert!(FeedbackUpdate::rating(5).validate().is_ok());
        assert!(FeedbackUpdate::rating(0).validate().is_err());
        assert!(FeedbackUpdate::default().is_empty());
    }
}
