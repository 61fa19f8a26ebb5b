//! Interaction record persistence for vidya
//!
//! Two [`InteractionStore`] backends:
//! - [`InMemoryInteractionStore`] for development and tests
//! - [`ScyllaInteractionStore`] backed by ScyllaDB
//!
//! Records are never deleted here; retention is handled outside this crate.

pub mod client;
pub mod error;
pub mod interactions;
pub mod memory;
pub mod schema;

pub use client::{ScyllaClient, ScyllaConfig};
pub use error::PersistenceError;
pub use interactions::{merge_feedback, InteractionStore, ScyllaInteractionStore};
pub use memory::InMemoryInteractionStore;

/// Connect to ScyllaDB, ensure the schema and return the interaction store
pub async fn init(config: ScyllaConfig) -> Result<ScyllaInteractionStore, PersistenceError> {
    let client = ScyllaClient::connect(config).await?;
    client.ensure_schema().await?;
    Ok(ScyllaInteractionStore::new(client))
}
