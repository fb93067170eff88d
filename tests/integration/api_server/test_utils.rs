//! Test utilities for API server integration tests

use async_trait::async_trait;
use axum_test::TestServer;
use candlescore::core::http::{create_router, AppState};
use candlescore::core::runtime::{RuntimeConfig, SignalRuntime};
use candlescore::db::store::{InsertOutcome, SignalStore};
use candlescore::db::InMemorySignalStore;
use candlescore::error::StoreError;
use candlescore::jobs::context::JobContext;
use candlescore::metrics::Metrics;
use candlescore::models::indicators::Bar;
use candlescore::models::instrument::{InstrumentType, SymbolConfig, Timeframe};
use candlescore::models::signal::{SignalKey, SignalRecord};
use candlescore::services::market_data::InMemoryMarketDataProvider;
use candlescore::signals::engine::SignalEngine;
use std::sync::Arc;

/// Test helper for API server integration tests
#[allow(dead_code)]
pub struct TestApiServer {
    pub server: TestServer,
    pub metrics: Arc<Metrics>,
    pub store: Arc<InMemorySignalStore>,
}

impl TestApiServer {
    /// Serves a runtime over EURUSD (1h) and GBPUSD (1h); EURUSD gets `bars`.
    pub async fn new(bars: Vec<Bar>) -> Self {
        let store = Arc::new(InMemorySignalStore::new());
        let (server, metrics) = build_server(bars, store.clone()).await;

        Self {
            server,
            metrics,
            store,
        }
    }
}

/// Same universe as [`TestApiServer`] over a store whose connection is gone
#[allow(dead_code)]
pub async fn disconnected_server() -> (TestServer, Arc<Metrics>) {
    build_server(Vec::new(), Arc::new(DisconnectedStore)).await
}

async fn build_server(bars: Vec<Bar>, store: Arc<dyn SignalStore>) -> (TestServer, Arc<Metrics>) {
    let metrics = Arc::new(Metrics::new().expect("metrics initialization"));
    let provider = Arc::new(InMemoryMarketDataProvider::new());
    provider.set_bars("EURUSD", Timeframe::H1, bars).await;

    let ctx = Arc::new(JobContext::new(
        provider,
        store,
        Arc::new(SignalEngine::default()),
        Some(metrics.clone()),
    ));
    let config = RuntimeConfig {
        universe: vec![
            SymbolConfig::new("EURUSD", InstrumentType::Forex, &[Timeframe::H1]),
            SymbolConfig::new("GBPUSD", InstrumentType::Forex, &[Timeframe::H1]),
        ],
        ..RuntimeConfig::default()
    };
    let runtime = Arc::new(SignalRuntime::new(config, ctx).expect("runtime initialization"));

    let state = AppState::new(runtime, metrics.clone());
    let app = create_router(state);
    let server = TestServer::new(app).expect("start test server");

    (server, metrics)
}

/// Store whose connection task has exited
struct DisconnectedStore;

#[async_trait]
impl SignalStore for DisconnectedStore {
    async fn has_active_signal(&self, _key: &SignalKey) -> Result<bool, StoreError> {
        Err(StoreError::Connection("connection closed".to_string()))
    }

    async fn insert_if_absent(&self, _record: &SignalRecord) -> Result<InsertOutcome, StoreError> {
        Err(StoreError::Connection("connection closed".to_string()))
    }

    async fn close_signal(&self, _key: &SignalKey) -> Result<bool, StoreError> {
        Err(StoreError::Connection("connection closed".to_string()))
    }

    async fn is_available(&self) -> bool {
        false
    }
}
