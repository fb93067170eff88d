//! candlescore worker
//!
//! Runs the evaluation universe on a cron schedule and serves /health,
//! /metrics and /evaluate.

use candlescore::config::{
    get_database_url, get_environment, get_port, load_engine_config, load_risk_table,
};
use candlescore::core::http::{start_server, AppState};
use candlescore::core::runtime::{RuntimeConfig, SignalRuntime};
use candlescore::core::scheduler::JobScheduler;
use candlescore::db::{InMemorySignalStore, PostgresDatabase, SignalStore};
use candlescore::jobs::context::JobContext;
use candlescore::logging;
use candlescore::metrics::Metrics;
use candlescore::services::market_data::{InMemoryMarketDataProvider, MarketDataProvider};
use candlescore::signals::engine::SignalEngine;
use dotenvy::dotenv;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();

    logging::init_logging();

    let env = get_environment();
    info!("Starting candlescore worker");
    info!(environment = %env, "Environment");

    let runtime_config = RuntimeConfig::from_env()?;
    let engine = Arc::new(SignalEngine::new(load_engine_config()?, load_risk_table()?)?);
    let metrics = Arc::new(Metrics::new()?);

    let (data_provider, store): (Arc<dyn MarketDataProvider>, Arc<dyn SignalStore>) =
        match get_database_url() {
            Some(url) => {
                info!("Initializing PostgreSQL connection...");
                let db = Arc::new(PostgresDatabase::connect(&url).await?);
                info!("PostgreSQL connected");
                let data_provider: Arc<dyn MarketDataProvider> = db.clone();
                let store: Arc<dyn SignalStore> = db;
                (data_provider, store)
            }
            None => {
                warn!("DATABASE_URL not set - using in-memory market data and signal store");
                let data_provider: Arc<dyn MarketDataProvider> =
                    Arc::new(InMemoryMarketDataProvider::new());
                let store: Arc<dyn SignalStore> = Arc::new(InMemorySignalStore::new());
                (data_provider, store)
            }
        };

    let job_context = Arc::new(
        JobContext::new(data_provider, store, engine, Some(metrics.clone()))
            .with_fetch_retries(runtime_config.fetch_retries),
    );

    let interval = runtime_config.evaluation_interval_seconds;
    info!(
        concurrency = runtime_config.concurrency,
        interval = interval,
        pairs = runtime_config
            .universe
            .iter()
            .map(|s| s.timeframes.len())
            .sum::<usize>(),
        "Runtime configured"
    );

    let runtime = Arc::new(SignalRuntime::new(runtime_config, job_context)?);
    runtime.check_store().await;

    let scheduler = JobScheduler::new(runtime.clone(), interval)?;
    scheduler.start().await;

    let port = get_port();
    let state = AppState::new(runtime, metrics);
    let server = tokio::spawn(async move {
        if let Err(e) = start_server(state, port).await {
            error!(error = %e, "HTTP server failed");
        }
    });

    info!("Worker started, waiting for shutdown signal...");
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down worker...");
        }
        _ = server => {
            warn!("HTTP server exited");
        }
    }

    scheduler.stop().await;
    info!("Worker stopped");

    Ok(())
}
