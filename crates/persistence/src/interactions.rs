//! Interaction record persistence
//!
//! Stores return raw records; grouping and statistics happen in the caller.

use crate::{PersistenceError, ScyllaClient};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use vidya_core::{Difficulty, FeedbackUpdate, InteractionRecord, QualityScore};

/// Interaction record store
#[async_trait]
pub trait InteractionStore: Send + Sync {
    /// Store a new record; ids must be unique
    async fn insert(&self, record: &InteractionRecord) -> Result<(), PersistenceError>;

    async fn get(&self, id: Uuid) -> Result<Option<InteractionRecord>, PersistenceError>;

    /// Write user feedback back onto a record and return the updated record
    async fn apply_feedback(
        &self,
        id: Uuid,
        update: &FeedbackUpdate,
    ) -> Result<InteractionRecord, PersistenceError>;

    /// Attach (or replace) the computed quality score
    async fn attach_quality(&self, id: Uuid, score: &QualityScore) -> Result<(), PersistenceError>;

    /// Records with `timestamp >= since`, oldest first
    async fn list_since(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<InteractionRecord>, PersistenceError>;

    /// Backend name for logs and health output
    fn backend(&self) -> &'static str;
}

/// Apply a feedback update to a record in place.
///
/// Rating and review flag may be set once each; retries accumulate. The
/// record is left unchanged when the update is rejected.
pub fn merge_feedback(
    record: &mut InteractionRecord,
    update: &FeedbackUpdate,
) -> Result<(), PersistenceError> {
    update.validate()?;
    if update.is_empty() {
        return Err(PersistenceError::Validation(
            "Feedback update has no fields".to_string(),
        ));
    }
    if update.user_rating.is_some() && record.user_rating.is_some() {
        return Err(PersistenceError::FieldAlreadySet("userRating"));
    }
    if update.flagged_for_review.is_some() && record.flagged_for_review {
        return Err(PersistenceError::FieldAlreadySet("flaggedForReview"));
    }

    if let Some(rating) = update.user_rating {
        record.user_rating = Some(rating);
    }
    if let Some(flagged) = update.flagged_for_review {
        record.flagged_for_review = flagged;
    }
    record.retry_count = record.retry_count.saturating_add(update.additional_retries);
    Ok(())
}

fn day_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// ScyllaDB implementation of the interaction store
#[derive(Clone)]
pub struct ScyllaInteractionStore {
    client: ScyllaClient,
}

const SELECT_COLUMNS: &str = "id, question, answer, language, subject, grade,
    user_rating, retry_count, flagged_for_review, response_time, tokens_used,
    created_at, concept_difficulty, quality_json";

impl ScyllaInteractionStore {
    pub fn new(client: ScyllaClient) -> Self {
        Self { client }
    }

    /// Partition key and clustering timestamp for an id
    async fn locate(&self, id: Uuid) -> Result<Option<(String, i64)>, PersistenceError> {
        let query = format!(
            "SELECT day, created_at FROM {}.interaction_keys WHERE id = ?",
            self.client.keyspace()
        );
        let result = self.client.session().query_unpaged(query, (id,)).await?;

        if let Some(rows) = result.rows {
            if let Some(row) = rows.into_iter().next() {
                let key: (String, i64) = row
                    .into_typed()
                    .map_err(|e| PersistenceError::InvalidData(e.to_string()))?;
                return Ok(Some(key));
            }
        }
        Ok(None)
    }

    async fn fetch(
        &self,
        day: &str,
        created_at: i64,
        id: Uuid,
    ) -> Result<Option<InteractionRecord>, PersistenceError> {
        let query = format!(
            "SELECT {} FROM {}.interactions WHERE day = ? AND created_at = ? AND id = ?",
            SELECT_COLUMNS,
            self.client.keyspace()
        );
        let result = self
            .client
            .session()
            .query_unpaged(query, (day, created_at, id))
            .await?;

        if let Some(rows) = result.rows {
            if let Some(row) = rows.into_iter().next() {
                return Ok(Some(row_to_record(row)?));
            }
        }
        Ok(None)
    }
}

#[async_trait]
impl InteractionStore for ScyllaInteractionStore {
    async fn insert(&self, record: &InteractionRecord) -> Result<(), PersistenceError> {
        record.validate()?;
        if self.locate(record.id).await?.is_some() {
            return Err(PersistenceError::AlreadyExists(record.id));
        }

        let day = day_key(record.timestamp.date_naive());
        let created_at = record.timestamp.timestamp_millis();
        let quality_json = record
            .quality
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let query = format!(
            "INSERT INTO {}.interactions (
                day, created_at, id, question, answer, language, subject, grade,
                user_rating, retry_count, flagged_for_review, response_time, tokens_used,
                concept_difficulty, quality_json
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            self.client.keyspace()
        );

        self.client
            .session()
            .query_unpaged(
                query,
                (
                    &day,
                    created_at,
                    record.id,
                    &record.question,
                    &record.answer,
                    &record.language,
                    &record.subject,
                    i32::from(record.grade),
                    record.user_rating.map(i32::from),
                    i32::try_from(record.retry_count).unwrap_or(i32::MAX),
                    record.flagged_for_review,
                    i64::try_from(record.response_time).unwrap_or(i64::MAX),
                    i32::try_from(record.tokens_used).unwrap_or(i32::MAX),
                    record.concept_difficulty.map(|d| d.as_str()),
                    quality_json,
                ),
            )
            .await?;

        let keys = format!(
            "INSERT INTO {}.interaction_keys (id, day, created_at) VALUES (?, ?, ?)",
            self.client.keyspace()
        );
        self.client
            .session()
            .query_unpaged(keys, (record.id, &day, created_at))
            .await?;

        tracing::info!(
            id = %record.id,
            language = %record.language,
            subject = %record.subject,
            grade = record.grade,
            "Interaction stored in ScyllaDB"
        );
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<InteractionRecord>, PersistenceError> {
        match self.locate(id).await? {
            Some((day, created_at)) => self.fetch(&day, created_at, id).await,
            None => Ok(None),
        }
    }

    async fn apply_feedback(
        &self,
        id: Uuid,
        update: &FeedbackUpdate,
    ) -> Result<InteractionRecord, PersistenceError> {
        let (day, created_at) = self
            .locate(id)
            .await?
            .ok_or(PersistenceError::NotFound(id))?;
        let mut record = self
            .fetch(&day, created_at, id)
            .await?
            .ok_or(PersistenceError::NotFound(id))?;

        merge_feedback(&mut record, update)?;

        let query = format!(
            "UPDATE {}.interactions SET user_rating = ?, retry_count = ?, flagged_for_review = ?
             WHERE day = ? AND created_at = ? AND id = ?",
            self.client.keyspace()
        );
        self.client
            .session()
            .query_unpaged(
                query,
                (
                    record.user_rating.map(i32::from),
                    i32::try_from(record.retry_count).unwrap_or(i32::MAX),
                    record.flagged_for_review,
                    &day,
                    created_at,
                    id,
                ),
            )
            .await?;

        tracing::info!(
            id = %id,
            rating = ?record.user_rating,
            retries = record.retry_count,
            flagged = record.flagged_for_review,
            "Interaction feedback updated"
        );
        Ok(record)
    }

    async fn attach_quality(&self, id: Uuid, score: &QualityScore) -> Result<(), PersistenceError> {
        let (day, created_at) = self
            .locate(id)
            .await?
            .ok_or(PersistenceError::NotFound(id))?;

        let query = format!(
            "UPDATE {}.interactions SET quality_json = ? WHERE day = ? AND created_at = ? AND id = ?",
            self.client.keyspace()
        );
        self.client
            .session()
            .query_unpaged(query, (serde_json::to_string(score)?, &day, created_at, id))
            .await?;
        Ok(())
    }

    async fn list_since(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<InteractionRecord>, PersistenceError> {
        let query = format!(
            "SELECT {} FROM {}.interactions WHERE day = ? AND created_at >= ?",
            SELECT_COLUMNS,
            self.client.keyspace()
        );
        let since_ms = since.timestamp_millis();
        let today = Utc::now().date_naive();

        let mut records = Vec::new();
        let mut date = since.date_naive();
        while date <= today {
            let result = self
                .client
                .session()
                .query_unpaged(query.as_str(), (day_key(date), since_ms))
                .await?;
            if let Some(rows) = result.rows {
                for row in rows {
                    records.push(row_to_record(row)?);
                }
            }
            date = match date.succ_opt() {
                Some(next) => next,
                None => break,
            };
        }

        records.sort_by_key(|r| r.timestamp);
        tracing::debug!(since = %since, records = records.len(), "Listed interactions");
        Ok(records)
    }

    fn backend(&self) -> &'static str {
        "scylla"
    }
}

type InteractionRow = (
    Uuid,
    String,
    String,
    String,
    String,
    i32,
    Option<i32>,
    Option<i32>,
    Option<bool>,
    Option<i64>,
    Option<i32>,
    i64,
    Option<String>,
    Option<String>,
);

fn row_to_record(
    row: scylla::frame::response::result::Row,
) -> Result<InteractionRecord, PersistenceError> {
    let (
        id,
        question,
        answer,
        language,
        subject,
        grade,
        user_rating,
        retry_count,
        flagged_for_review,
        response_time,
        tokens_used,
        created_at,
        concept_difficulty,
        quality_json,
    ): InteractionRow = row
        .into_typed()
        .map_err(|e| PersistenceError::InvalidData(e.to_string()))?;

    let grade = u8::try_from(grade)
        .map_err(|_| PersistenceError::InvalidData(format!("grade out of range: {}", grade)))?;
    let user_rating = user_rating
        .map(|r| {
            u8::try_from(r)
                .map_err(|_| PersistenceError::InvalidData(format!("rating out of range: {}", r)))
        })
        .transpose()?;
    let concept_difficulty = concept_difficulty
        .map(|d| d.parse::<Difficulty>())
        .transpose()?;
    let quality = quality_json
        .map(|json| serde_json::from_str::<QualityScore>(&json))
        .transpose()?;
    let timestamp = DateTime::from_timestamp_millis(created_at).ok_or_else(|| {
        PersistenceError::InvalidData(format!("timestamp out of range: {}", created_at))
    })?;

    Ok(InteractionRecord {
        id,
        question,
        answer,
        language,
        subject,
        grade,
        user_rating,
        retry_count: retry_count.map_or(0, |r| r.max(0) as u32),
        flagged_for_review: flagged_for_review.unwrap_or(false),
        response_time: response_time.map_or(0, |t| t.max(0) as u64),
        tokens_used: tokens_used.map_or(0, |t| t.max(0) as u32),
        timestamp,
        concept_difficulty,
        quality,
    })
}
