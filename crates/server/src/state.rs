//! Application State
//!
//! Shared state across all handlers. Everything here is immutable after
//! startup apart from the store's own contents.

use std::sync::Arc;

use vidya_config::{MarkerTables, Settings};
use vidya_persistence::{InMemoryInteractionStore, InteractionStore};
use vidya_quality::{FeedbackAnalyzer, QualityScorer};

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub scorer: Arc<QualityScorer>,
    pub analyzer: Arc<FeedbackAnalyzer>,
    /// ScyllaDB or in-memory
    pub store: Arc<dyn InteractionStore>,
}

impl AppState {
    /// State with the given marker tables and an in-memory store
    pub fn new(config: Settings, markers: MarkerTables) -> Self {
        Self::with_store(config, markers, Arc::new(InMemoryInteractionStore::new()))
    }

    pub fn with_store(
        config: Settings,
        markers: MarkerTables,
        store: Arc<dyn InteractionStore>,
    ) -> Self {
        let scorer = QualityScorer::from_config(&config.quality, markers);
        let analyzer = FeedbackAnalyzer::new(config.analytics.clone());
        Self {
            config: Arc::new(config),
            scorer: Arc::new(scorer),
            analyzer: Arc::new(analyzer),
            store,
        }
    }

    pub fn is_persistent(&self) -> bool {
        self.store.backend() != "memory"
    }
}
