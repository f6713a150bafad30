use crate::config::ServerConfig;
use dealership_reviews::{DealershipRepository, DocumentStore, ReviewRepository, SeedReport};
use once_cell::sync::OnceCell;
use std::sync::Arc;

/// Shared application state
pub struct ServerState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    pub reviews: ReviewRepository,

    pub dealerships: DealershipRepository,

    /// Outcome of the startup seed phase, unset when seeding is disabled
    seed_report: OnceCell<SeedReport>,
}

impl ServerState {
    /// Create new server state over an already-built store
    pub fn new(config: ServerConfig, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            reviews: ReviewRepository::with_allocation(store.clone(), config.id_allocation),
            dealerships: DealershipRepository::new(store),
            config: Arc::new(config),
            seed_report: OnceCell::new(),
        }
    }

    /// Record the seed outcome. Only the first report is kept.
    pub fn record_seed(&self, report: SeedReport) {
        if self.seed_report.set(report).is_err() {
            tracing::warn!("Seed report already recorded, ignoring the new one");
        }
    }

    pub fn seed_report(&self) -> Option<&SeedReport> {
        self.seed_report.get()
    }
}
