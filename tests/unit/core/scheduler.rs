//! Unit tests for the cron scheduler

use candlescore::core::runtime::{RuntimeConfig, SignalRuntime};
use candlescore::core::scheduler::JobScheduler;
use candlescore::db::InMemorySignalStore;
use candlescore::error::ConfigError;
use candlescore::jobs::context::JobContext;
use candlescore::services::market_data::InMemoryMarketDataProvider;
use candlescore::signals::engine::SignalEngine;
use std::sync::Arc;

fn runtime() -> Arc<SignalRuntime> {
    let ctx = Arc::new(JobContext::new(
        Arc::new(InMemoryMarketDataProvider::new()),
        Arc::new(InMemorySignalStore::new()),
        Arc::new(SignalEngine::default()),
        None,
    ));
    Arc::new(SignalRuntime::new(RuntimeConfig::default(), ctx).unwrap())
}

#[test]
fn test_zero_interval_is_rejected() {
    assert!(JobScheduler::new(runtime(), 0).is_err());
}

#[test]
fn test_uneven_interval_is_rejected() {
    // 7 minutes leaves a 4 minute gap at the top of every hour
    let err = JobScheduler::new(runtime(), 420).err();
    assert!(matches!(err, Some(ConfigError::Invalid(_))));
}

#[test]
fn test_multi_hour_interval_is_accepted() {
    assert!(JobScheduler::new(runtime(), 4 * 3600).is_ok());
}

#[tokio::test]
async fn test_start_and_stop() {
    let scheduler = JobScheduler::new(runtime(), 900).unwrap();
    assert!(!scheduler.is_running().await);

    scheduler.start().await;
    assert!(scheduler.is_running().await);

    // second start is a no-op
    scheduler.start().await;
    assert!(scheduler.is_running().await);

    scheduler.stop().await;
    assert!(!scheduler.is_running().await);
}
