//! Persistence errors

use scylla::transport::errors::{NewSessionError, QueryError};
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Schema error: {0}")]
    SchemaError(String),

    #[error("Interaction not found: {0}")]
    NotFound(Uuid),

    #[error("Interaction already exists: {0}")]
    AlreadyExists(Uuid),

    #[error("Field already set: {0}")]
    FieldAlreadySet(&'static str),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<NewSessionError> for PersistenceError {
    fn from(err: NewSessionError) -> Self {
        PersistenceError::Connection(err.to_string())
    }
}

impl From<QueryError> for PersistenceError {
    fn from(err: QueryError) -> Self {
        PersistenceError::Query(err.to_string())
    }
}

impl From<vidya_core::Error> for PersistenceError {
    fn from(err: vidya_core::Error) -> Self {
        PersistenceError::Validation(err.to_string())
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        PersistenceError::InvalidData(err.to_string())
    }
}
