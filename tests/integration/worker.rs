//! Integration tests for the Worker
//!
//! Tests the job chain and full orchestration runs over in-memory and
//! misbehaving collaborators.


use crate::test_utils::{flat_bars, uptrend_pullback_bars};
use candlescore::core::runtime::RuntimeConfig;
use candlescore::db::SignalStore;
use candlescore::error::RuntimeError;
use candlescore::jobs::handlers::{handle_evaluate_signal, handle_fetch_bars, run_job};
use candlescore::jobs::types::{EvaluateSignalJob, FetchBarsJob, JobOutcome};
use candlescore::models::instrument::{InstrumentType, Timeframe};
use candlescore::models::signal::SignalDirection;
use candlescore::signals::candidate::Rejection;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use test_utils::{
    failing_store_runtime, provider_with, DownProvider, FlakyProvider, SlowProvider, TestWorker,
};

fn eurusd_h1() -> FetchBarsJob {
    FetchBarsJob {
        symbol: "EURUSD".to_string(),
        timeframe: Timeframe::H1,
        instrument: InstrumentType::Forex,
    }
}

#[tokio::test]
async fn run_creates_signal_and_skips_missing_pair() {
    let worker = TestWorker::new(provider_with(uptrend_pullback_bars()).await);

    let report = worker.runtime.run_once().await;

    assert_eq!(report.evaluated, 2);
    assert_eq!(report.created.len(), 1);
    assert_eq!(report.skipped, 1);
    assert!(report.errors.is_empty());
    assert!(report.finished_at >= report.started_at);

    let created = &report.created[0];
    assert_eq!(created.symbol, "EURUSD");
    assert_eq!(created.timeframe, Timeframe::H1);
    assert_eq!(created.direction, SignalDirection::Long);
    assert_eq!(worker.store.active_count().await, 1);
}

#[tokio::test]
async fn second_run_over_same_data_is_a_duplicate() {
    let worker = TestWorker::new(provider_with(uptrend_pullback_bars()).await);

    let first = worker.runtime.run_once().await;
    assert_eq!(first.created.len(), 1);

    let second = worker.runtime.run_once().await;
    assert!(second.created.is_empty());
    assert_eq!(second.duplicates, 1);
    assert_eq!(worker.store.active_count().await, 1);
}

#[tokio::test]
async fn closed_signal_allows_a_new_one() {
    let worker = TestWorker::new(provider_with(uptrend_pullback_bars()).await);

    let first = worker.runtime.run_once().await;
    let key = first.created[0].key();
    assert!(worker.store.close_signal(&key).await.unwrap());
    assert!(!worker.store.close_signal(&key).await.unwrap());

    let second = worker.runtime.run_once().await;
    assert_eq!(second.created.len(), 1);
    assert_eq!(worker.store.records().await.len(), 2);
    assert_eq!(worker.store.active_count().await, 1);
}

#[tokio::test]
async fn concurrent_runs_store_one_signal() {
    let worker = TestWorker::new(provider_with(uptrend_pullback_bars()).await);

    let (a, b) = tokio::join!(worker.runtime.run_once(), worker.runtime.run_once());

    assert_eq!(a.created.len() + b.created.len(), 1);
    assert_eq!(a.duplicates + b.duplicates, 1);
    assert_eq!(worker.store.active_count().await, 1);
}

#[tokio::test]
async fn flat_market_is_rejected() {
    let worker = TestWorker::new(provider_with(flat_bars(260)).await);

    let report = worker.runtime.run_once().await;

    assert_eq!(report.rejected, 1);
    assert!(report.created.is_empty());
    assert_eq!(worker.store.active_count().await, 0);
}

#[tokio::test]
async fn short_history_is_skipped() {
    let worker = TestWorker::new(provider_with(flat_bars(150)).await);

    let report = worker.runtime.run_once().await;

    assert_eq!(report.skipped, 2);
    assert!(report.errors.is_empty());
}

#[tokio::test]
async fn transient_failures_are_retried() {
    let provider = Arc::new(FlakyProvider::new(uptrend_pullback_bars(), 2));
    let worker = TestWorker::new(provider.clone());

    let report = worker.runtime.run_once().await;

    assert_eq!(report.created.len(), 1);
    assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn unavailable_provider_is_an_error_without_retry() {
    let provider = Arc::new(DownProvider {
        calls: AtomicUsize::new(0),
    });
    let worker = TestWorker::new(provider.clone());

    let report = worker.runtime.run_once().await;

    assert_eq!(report.evaluated, 2);
    assert_eq!(report.errors.len(), 2);
    assert!(report.errors[0].starts_with("EURUSD/1h:"));
    assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn slow_pairs_time_out_as_skips() {
    let provider = Arc::new(SlowProvider {
        delay: Duration::from_millis(500),
        bars: uptrend_pullback_bars(),
    });
    let config = RuntimeConfig {
        evaluation_timeout: Duration::from_millis(50),
        ..RuntimeConfig::default()
    };
    let worker = TestWorker::with_config(provider, config);

    let report = worker.runtime.run_once().await;

    assert_eq!(report.evaluated, 2);
    assert_eq!(report.skipped, 2);
    assert!(report.created.is_empty());
    assert!(report.errors.is_empty());

    let text = worker.metrics.export().unwrap();
    assert!(text.contains("signal_outcomes_total{outcome=\"timeout\"} 2"));
    assert!(text.contains("signal_evaluations_active 0"));
}

#[tokio::test]
async fn store_failure_is_recorded_and_run_completes() {
    let runtime = failing_store_runtime(provider_with(uptrend_pullback_bars()).await);

    let report = runtime.run_once().await;

    assert_eq!(report.evaluated, 2);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.skipped, 1);
    assert!(report.created.is_empty());
}

#[tokio::test]
async fn run_symbol_rejects_unknown_symbol() {
    let worker = TestWorker::new(provider_with(uptrend_pullback_bars()).await);

    let err = worker.runtime.run_symbol("GBPUSD").await.err();
    assert!(matches!(err, Some(RuntimeError::UnknownSymbol(_))));

    let report = worker.runtime.run_symbol("EURUSD").await.unwrap();
    assert_eq!(report.evaluated, 2);
}

#[tokio::test]
async fn run_records_outcome_metrics() {
    let worker = TestWorker::new(provider_with(uptrend_pullback_bars()).await);

    worker.runtime.run_once().await;

    let text = worker.metrics.export().unwrap();
    assert!(text.contains("signal_evaluations_total 2"));
    assert!(text.contains("signal_outcomes_total{outcome=\"created\"} 1"));
    assert!(text.contains("signal_outcomes_total{outcome=\"skipped\"} 1"));
    assert!(text.contains("signal_evaluations_active 0"));
}

#[tokio::test]
async fn fetch_handler_hands_bars_to_evaluation() {
    let worker = TestWorker::new(provider_with(uptrend_pullback_bars()).await);
    let ctx = worker.runtime.job_context();

    let next = handle_fetch_bars(eurusd_h1(), ctx).await.unwrap();
    let evaluate = next.expect("bars should be available");
    assert_eq!(evaluate.bars.len(), 260);

    let store = handle_evaluate_signal(evaluate, ctx).expect("candidate should be accepted");
    assert_eq!(store.candidate.score, 69);
}

#[tokio::test]
async fn evaluate_handler_reports_rejection() {
    let worker = TestWorker::new(provider_with(flat_bars(260)).await);
    let job = EvaluateSignalJob {
        symbol: "EURUSD".to_string(),
        timeframe: Timeframe::H1,
        instrument: InstrumentType::Forex,
        bars: flat_bars(260),
    };

    match handle_evaluate_signal(job, worker.runtime.job_context()) {
        Err(JobOutcome::Rejected(Rejection::BelowThreshold { .. })) => {}
        other => panic!("expected a rejection, got {:?}", other.map(|j| j.candidate.score)),
    }
}

#[tokio::test]
async fn run_job_walks_the_whole_chain() {
    let worker = TestWorker::new(provider_with(uptrend_pullback_bars()).await);

    let ctx = worker.runtime.job_context();
    let timeout = Duration::from_secs(5);

    let outcome = run_job(eurusd_h1(), ctx, timeout).await.unwrap();
    assert!(matches!(outcome, JobOutcome::Created(_)));

    let outcome = run_job(eurusd_h1(), ctx, timeout).await.unwrap();
    assert_eq!(outcome, JobOutcome::Duplicate);
}

#[tokio::test]
async fn in_memory_store_reports_available() {
    let worker = TestWorker::new(provider_with(uptrend_pullback_bars()).await);

    assert!(worker.store.is_available().await);
    assert!(worker.runtime.check_store().await);
    assert!(worker.metrics.export().unwrap().contains("database_connected 1"));
}
