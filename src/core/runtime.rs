//! Orchestrator: evaluates the symbol x timeframe universe with bounded concurrency

use crate::config::load_universe;
use crate::error::{ConfigError, JobError, RuntimeError};
use crate::jobs::context::{JobContext, DEFAULT_FETCH_RETRIES};
use crate::jobs::handlers::run_job;
use crate::jobs::types::{FetchBarsJob, JobOutcome};
use crate::models::instrument::SymbolConfig;
use crate::models::signal::SignalCandidate;
use chrono::{DateTime, Utc};
use futures_util::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::env;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Configuration for the job runtime
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub evaluation_interval_seconds: u64,
    /// Maximum pairs evaluated at once.
    pub concurrency: usize,
    /// Upper bound on one pair's fetch + evaluate + store.
    pub evaluation_timeout: Duration,
    pub fetch_retries: usize,
    pub universe: Vec<SymbolConfig>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            evaluation_interval_seconds: 900,
            concurrency: 4,
            evaluation_timeout: Duration::from_secs(30),
            fetch_retries: DEFAULT_FETCH_RETRIES,
            universe: crate::models::instrument::default_universe(),
        }
    }
}

fn env_number<T: std::str::FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| ConfigError::invalid(format!("{name} is not a valid number: {raw}"))),
        Err(_) => Ok(default),
    }
}

impl RuntimeConfig {
    /// Read EVAL_INTERVAL_SECONDS, WORKER_CONCURRENCY, EVAL_TIMEOUT_SECONDS,
    /// FETCH_RETRIES and UNIVERSE_PATH, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            evaluation_interval_seconds: env_number(
                "EVAL_INTERVAL_SECONDS",
                defaults.evaluation_interval_seconds,
            )?,
            concurrency: env_number("WORKER_CONCURRENCY", defaults.concurrency)?,
            evaluation_timeout: Duration::from_secs(env_number(
                "EVAL_TIMEOUT_SECONDS",
                defaults.evaluation_timeout.as_secs(),
            )?),
            fetch_retries: env_number("FETCH_RETRIES", defaults.fetch_retries)?,
            universe: load_universe()?,
        })
    }
}

/// Result of one orchestration run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Pairs attempted.
    pub evaluated: usize,
    pub created: Vec<SignalCandidate>,
    pub skipped: usize,
    pub rejected: usize,
    pub duplicates: usize,
    /// One entry per failed pair, "SYMBOL/TF: error".
    pub errors: Vec<String>,
}

impl RunReport {
    fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            finished_at: started_at,
            evaluated: 0,
            created: Vec::new(),
            skipped: 0,
            rejected: 0,
            duplicates: 0,
            errors: Vec::new(),
        }
    }

    fn record(&mut self, label: String, result: Result<JobOutcome, JobError>) {
        self.evaluated += 1;
        match result {
            Ok(JobOutcome::Created(candidate)) => self.created.push(*candidate),
            Ok(JobOutcome::Duplicate) => self.duplicates += 1,
            Ok(JobOutcome::Rejected(_)) => self.rejected += 1,
            Ok(JobOutcome::Skipped(_)) => self.skipped += 1,
            // a timeout is a skip for that pair
            Err(JobError::Timeout(_)) => self.skipped += 1,
            Err(e) => self.errors.push(format!("{label}: {e}")),
        }
    }
}

/// Evaluates every enabled (symbol, timeframe) pair through the job chain
pub struct SignalRuntime {
    config: RuntimeConfig,
    job_context: Arc<JobContext>,
}

impl SignalRuntime {
    pub fn new(config: RuntimeConfig, job_context: Arc<JobContext>) -> Result<Self, RuntimeError> {
        if config.universe.iter().all(|s| s.timeframes.is_empty()) {
            return Err(RuntimeError::EmptyUniverse);
        }
        if job_context.engine.risk_table().is_empty() {
            return Err(RuntimeError::EmptyRiskTable);
        }
        if config.concurrency == 0 {
            return Err(ConfigError::invalid("concurrency must be > 0").into());
        }
        if config.evaluation_timeout.is_zero() {
            return Err(ConfigError::invalid("evaluation timeout must be > 0").into());
        }

        Ok(Self {
            config,
            job_context,
        })
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn job_context(&self) -> &Arc<JobContext> {
        &self.job_context
    }

    /// Check the signal store and publish the result on `database_connected`
    pub async fn check_store(&self) -> bool {
        let available = self.job_context.store.is_available().await;
        if let Some(ref metrics) = self.job_context.metrics {
            metrics
                .database_connected
                .set(if available { 1.0 } else { 0.0 });
        }
        if !available {
            warn!("SignalRuntime: signal store unavailable");
        }
        available
    }

    /// One job per enabled pair, optionally restricted to one symbol
    pub fn jobs(&self, symbol: Option<&str>) -> Result<Vec<FetchBarsJob>, RuntimeError> {
        let selected: Vec<&SymbolConfig> = self
            .config
            .universe
            .iter()
            .filter(|s| symbol.map_or(true, |wanted| s.symbol == wanted))
            .collect();

        if let (Some(wanted), true) = (symbol, selected.is_empty()) {
            return Err(RuntimeError::UnknownSymbol(wanted.to_string()));
        }

        Ok(selected
            .into_iter()
            .flat_map(|s| {
                s.timeframes.iter().map(move |tf| FetchBarsJob {
                    symbol: s.symbol.clone(),
                    timeframe: *tf,
                    instrument: s.instrument,
                })
            })
            .collect())
    }

    /// Evaluate the whole universe. Per-pair failures end up in the report.
    pub async fn run_once(&self) -> RunReport {
        match self.jobs(None) {
            Ok(jobs) => self.run_jobs(jobs).await,
            Err(e) => {
                let mut report = RunReport::new(Utc::now());
                report.errors.push(e.to_string());
                report
            }
        }
    }

    /// Evaluate every enabled timeframe of one symbol
    pub async fn run_symbol(&self, symbol: &str) -> Result<RunReport, RuntimeError> {
        let jobs = self.jobs(Some(symbol))?;
        Ok(self.run_jobs(jobs).await)
    }

    async fn run_jobs(&self, jobs: Vec<FetchBarsJob>) -> RunReport {
        let mut report = RunReport::new(Utc::now());
        let timeout = self.config.evaluation_timeout;
        let pair_count = jobs.len();

        info!(
            pairs = pair_count,
            concurrency = self.config.concurrency,
            "SignalRuntime: starting evaluation run"
        );

        let results: Vec<(String, Result<JobOutcome, JobError>)> = stream::iter(jobs)
            .map(|job| {
                let ctx = self.job_context.clone();
                async move {
                    let label = format!("{}/{}", job.symbol, job.timeframe);
                    let result = run_job(job, &ctx, timeout).await;
                    if let Err(ref e) = result {
                        warn!(pair = %label, error = %e, "SignalRuntime: pair evaluation failed");
                    }
                    (label, result)
                }
            })
            .buffer_unordered(self.config.concurrency)
            .collect()
            .await;

        for (label, result) in results {
            report.record(label, result);
        }
        report
            .created
            .sort_by(|a, b| a.key().to_string().cmp(&b.key().to_string()));
        report.errors.sort();
        report.finished_at = Utc::now();

        info!(
            evaluated = report.evaluated,
            created = report.created.len(),
            skipped = report.skipped,
            rejected = report.rejected,
            duplicates = report.duplicates,
            errors = report.errors.len(),
            "SignalRuntime: evaluation run finished"
        );

        report
    }
}
