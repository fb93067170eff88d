//! Job context for dependency injection

use crate::db::store::SignalStore;
use crate::metrics::Metrics;
use crate::services::market_data::MarketDataProvider;
use crate::signals::engine::SignalEngine;
use std::sync::Arc;

/// Default number of retries for transient market-data failures
pub const DEFAULT_FETCH_RETRIES: usize = 2;

/// Collaborators shared by every job handler.
///
/// Handlers only read from the context; the store is the one place a job
/// writes.
pub struct JobContext {
    pub data_provider: Arc<dyn MarketDataProvider>,
    pub store: Arc<dyn SignalStore>,
    pub engine: Arc<SignalEngine>,
    pub metrics: Option<Arc<Metrics>>,
    pub fetch_retries: usize,
}

impl JobContext {
    pub fn new(
        data_provider: Arc<dyn MarketDataProvider>,
        store: Arc<dyn SignalStore>,
        engine: Arc<SignalEngine>,
        metrics: Option<Arc<Metrics>>,
    ) -> Self {
        Self {
            data_provider,
            store,
            engine,
            metrics,
            fetch_retries: DEFAULT_FETCH_RETRIES,
        }
    }

    pub fn with_fetch_retries(mut self, fetch_retries: usize) -> Self {
        self.fetch_retries = fetch_retries;
        self
    }
}
