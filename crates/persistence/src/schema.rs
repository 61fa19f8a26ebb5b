//! ScyllaDB schema creation
//!
//! Interactions are partitioned by UTC day so that windowed scans read a
//! bounded set of partitions. `interaction_keys` maps an id back to its
//! partition for point reads and feedback updates.

use crate::error::PersistenceError;
use scylla::Session;

/// Create the keyspace if it doesn't exist
pub async fn create_keyspace(
    session: &Session,
    keyspace: &str,
    replication_factor: u8,
) -> Result<(), PersistenceError> {
    let query = format!(
        "CREATE KEYSPACE IF NOT EXISTS {} WITH replication = {{'class': 'SimpleStrategy', 'replication_factor': {}}}",
        keyspace, replication_factor
    );

    session
        .query_unpaged(query, &[])
        .await
        .map_err(|e| PersistenceError::SchemaError(format!("Failed to create keyspace: {}", e)))?;

    Ok(())
}

/// Create all required tables
pub async fn create_tables(session: &Session, keyspace: &str) -> Result<(), PersistenceError> {
    // Records are never deleted, so no default TTL
    let interactions_table = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {}.interactions (
            day TEXT,
            created_at BIGINT,
            id UUID,
            question TEXT,
            answer TEXT,
            language TEXT,
            subject TEXT,
            grade INT,
            user_rating INT,
            retry_count INT,
            flagged_for_review BOOLEAN,
            response_time BIGINT,
            tokens_used INT,
            concept_difficulty TEXT,
            quality_json TEXT,
            PRIMARY KEY ((day), created_at, id)
        ) WITH CLUSTERING ORDER BY (created_at DESC, id ASC)
    "#,
        keyspace
    );

    session
        .query_unpaged(interactions_table, &[])
        .await
        .map_err(|e| {
            PersistenceError::SchemaError(format!("Failed to create interactions table: {}", e))
        })?;

    let keys_table = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {}.interaction_keys (
            id UUID,
            day TEXT,
            created_at BIGINT,
            PRIMARY KEY (id)
        )
    "#,
        keyspace
    );

    session
        .query_unpaged(keys_table, &[])
        .await
        .map_err(|e| {
            PersistenceError::SchemaError(format!(
                "Failed to create interaction_keys table: {}",
                e
            ))
        })?;

    tracing::info!("All tables created successfully");
    Ok(())
}
