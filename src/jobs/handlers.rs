//! Job handlers for the signal evaluation workflow
//!
//! FetchBarsJob -> EvaluateSignalJob -> StoreSignalJob. Each handler either
//! produces the next job or ends the chain with a `JobOutcome`.

use crate::db::store::InsertOutcome;
use crate::error::{JobError, MarketDataError};
use crate::jobs::context::JobContext;
use crate::jobs::types::{EvaluateSignalJob, FetchBarsJob, JobOutcome, StoreSignalJob};
use crate::models::signal::SignalRecord;
use crate::signals::engine::{EvaluationError, MIN_BARS};
use backon::{ExponentialBuilder, Retryable};
use chrono::Utc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Read bars from the data provider, retrying transient failures.
///
/// Missing or short data ends the chain with `Skipped`.
pub async fn handle_fetch_bars(
    job: FetchBarsJob,
    ctx: &JobContext,
) -> Result<Result<EvaluateSignalJob, JobOutcome>, JobError> {
    debug!(symbol = %job.symbol, timeframe = %job.timeframe, "FetchBarsJob: fetching bars");

    let fetch = || async {
        ctx.data_provider
            .get_bars(&job.symbol, job.timeframe, MIN_BARS)
            .await
    };

    let bars = fetch
        .retry(
            ExponentialBuilder::default()
                .with_min_delay(Duration::from_millis(200))
                .with_max_times(ctx.fetch_retries),
        )
        .when(MarketDataError::is_transient)
        .notify(|e: &MarketDataError, after: Duration| {
            warn!(
                symbol = %job.symbol,
                timeframe = %job.timeframe,
                error = %e,
                retry_in_ms = after.as_millis() as u64,
                "FetchBarsJob: transient market data failure, retrying"
            );
        })
        .await?;

    let bars = match bars {
        Some(bars) if bars.len() >= MIN_BARS => bars,
        Some(bars) => {
            debug!(
                symbol = %job.symbol,
                timeframe = %job.timeframe,
                count = bars.len(),
                min = MIN_BARS,
                "FetchBarsJob: not enough bars"
            );
            return Ok(Err(JobOutcome::Skipped(format!(
                "not enough bars: {} < {}",
                bars.len(),
                MIN_BARS
            ))));
        }
        None => {
            debug!(symbol = %job.symbol, timeframe = %job.timeframe, "FetchBarsJob: no data available");
            return Ok(Err(JobOutcome::Skipped("market data unavailable".to_string())));
        }
    };

    debug!(
        symbol = %job.symbol,
        timeframe = %job.timeframe,
        count = bars.len(),
        "FetchBarsJob: fetched bars"
    );

    Ok(Ok(EvaluateSignalJob {
        symbol: job.symbol,
        timeframe: job.timeframe,
        instrument: job.instrument,
        bars,
    }))
}

/// Run the engine over the fetched bars. Pure; never touches the store.
pub fn handle_evaluate_signal(
    job: EvaluateSignalJob,
    ctx: &JobContext,
) -> Result<StoreSignalJob, JobOutcome> {
    match ctx
        .engine
        .evaluate(&job.symbol, job.timeframe, job.instrument, &job.bars)
    {
        Ok(candidate) => {
            debug!(
                symbol = %job.symbol,
                timeframe = %job.timeframe,
                direction = %candidate.direction,
                score = candidate.score,
                "EvaluateSignalJob: candidate accepted"
            );
            Ok(StoreSignalJob { candidate })
        }
        Err(EvaluationError::Snapshot(e)) => {
            debug!(symbol = %job.symbol, timeframe = %job.timeframe, reason = %e, "EvaluateSignalJob: skipped");
            Err(JobOutcome::Skipped(e.to_string()))
        }
        Err(EvaluationError::Rejected(rejection)) => {
            debug!(
                symbol = %job.symbol,
                timeframe = %job.timeframe,
                reason = %rejection,
                "EvaluateSignalJob: no candidate"
            );
            Err(JobOutcome::Rejected(rejection))
        }
    }
}

/// Dedup against active signals, then insert through the conditional write.
pub async fn handle_store_signal(
    job: StoreSignalJob,
    ctx: &JobContext,
) -> Result<JobOutcome, JobError> {
    let candidate = job.candidate;
    let key = candidate.key();

    if ctx.store.has_active_signal(&key).await? {
        debug!(key = %key, "StoreSignalJob: active signal exists, discarding candidate");
        return Ok(JobOutcome::Duplicate);
    }

    let record = SignalRecord::from_candidate(&candidate, Utc::now());
    match ctx.store.insert_if_absent(&record).await? {
        InsertOutcome::Inserted => {
            info!(
                key = %key,
                score = candidate.score,
                tier = %candidate.tier,
                regime = %candidate.regime,
                entry = candidate.entry,
                stop = candidate.stop,
                target = candidate.primary_target(),
                "StoreSignalJob: signal created"
            );
            Ok(JobOutcome::Created(Box::new(candidate)))
        }
        InsertOutcome::Duplicate => {
            debug!(key = %key, "StoreSignalJob: lost insert race, discarding candidate");
            Ok(JobOutcome::Duplicate)
        }
    }
}

/// Run the full chain for one pair within `timeout` and record metrics
pub async fn run_job(
    job: FetchBarsJob,
    ctx: &JobContext,
    timeout: Duration,
) -> Result<JobOutcome, JobError> {
    let start = Instant::now();
    if let Some(ref metrics) = ctx.metrics {
        metrics.signal_evaluations_active.inc();
    }

    let result = match tokio::time::timeout(timeout, run_chain(job, ctx)).await {
        Ok(result) => result,
        Err(_) => Err(JobError::Timeout(timeout)),
    };

    if let Some(ref metrics) = ctx.metrics {
        metrics.signal_evaluations_active.dec();
        metrics.signal_evaluations_total.inc();
        metrics
            .signal_evaluation_duration_seconds
            .observe(start.elapsed().as_secs_f64());
        match &result {
            Ok(outcome) => metrics.record_outcome(outcome.as_str()),
            Err(JobError::Timeout(_)) => metrics.record_outcome("timeout"),
            Err(_) => metrics.record_outcome("error"),
        }
    }

    result
}

async fn run_chain(job: FetchBarsJob, ctx: &JobContext) -> Result<JobOutcome, JobError> {
    let evaluate = match handle_fetch_bars(job, ctx).await? {
        Ok(next) => next,
        Err(outcome) => return Ok(outcome),
    };
    let store = match handle_evaluate_signal(evaluate, ctx) {
        Ok(next) => next,
        Err(outcome) => return Ok(outcome),
    };
    handle_store_signal(store, ctx).await
}
