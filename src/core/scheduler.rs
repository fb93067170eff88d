//! Cron-based scheduler for periodic evaluation runs

use crate::core::runtime::SignalRuntime;
use crate::error::ConfigError;
use cron::Schedule;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Cron expression (with seconds field) firing every `interval_seconds`.
///
/// A cron step restarts at the top of its field, so the interval must divide
/// a minute, an hour or a day evenly. Anything else is rejected.
pub fn cron_expression(interval_seconds: u64) -> Result<String, ConfigError> {
    // Cron format: second minute hour day month weekday
    let uneven = || {
        ConfigError::invalid(format!(
            "interval of {}s does not divide a minute, hour or day evenly",
            interval_seconds
        ))
    };

    match interval_seconds {
        0 => Err(ConfigError::invalid("scheduler disabled: interval_seconds is 0")),
        s if s < 60 => match 60 % s {
            0 => Ok(format!("*/{} * * * * *", s)),
            _ => Err(uneven()),
        },
        s if s % 60 != 0 => Err(uneven()),
        s if s < 3600 => match 60 % (s / 60) {
            0 => Ok(format!("0 */{} * * * *", s / 60)),
            _ => Err(uneven()),
        },
        s if s % 3600 != 0 => Err(uneven()),
        s if s < 86400 => match 24 % (s / 3600) {
            0 => Ok(format!("0 0 */{} * * *", s / 3600)),
            _ => Err(uneven()),
        },
        86400 => Ok("0 0 0 * * *".to_string()),
        _ => Err(uneven()),
    }
}

/// Scheduler that runs the whole universe on a cron tick
pub struct JobScheduler {
    runtime: Arc<SignalRuntime>,
    schedule: Schedule,
    handle: Arc<RwLock<Option<tokio::task::JoinHandle<()>>>>,
}

impl JobScheduler {
    /// `interval_seconds` must be non-zero and fit [`cron_expression`].
    pub fn new(runtime: Arc<SignalRuntime>, interval_seconds: u64) -> Result<Self, ConfigError> {
        let cron_expr = cron_expression(interval_seconds)?;
        let schedule = Schedule::from_str(&cron_expr).map_err(|e| {
            ConfigError::invalid(format!("invalid cron expression '{}': {}", cron_expr, e))
        })?;

        info!(
            interval = interval_seconds,
            cron = %cron_expr,
            "JobScheduler: created"
        );

        Ok(Self {
            runtime,
            schedule,
            handle: Arc::new(RwLock::new(None)),
        })
    }

    /// Start the scheduler loop in a background task
    pub async fn start(&self) {
        let mut guard = self.handle.write().await;
        if guard.is_some() {
            warn!("JobScheduler: already running");
            return;
        }

        let runtime = self.runtime.clone();
        let schedule = self.schedule.clone();

        let handle = tokio::spawn(async move {
            info!("JobScheduler: started, waiting for cron schedule...");

            loop {
                let mut upcoming = schedule.upcoming(chrono::Utc);
                if let Some(next_tick) = upcoming.next() {
                    let now = chrono::Utc::now();
                    if next_tick > now {
                        let duration = (next_tick - now).to_std().unwrap_or_default();
                        tokio::time::sleep(duration).await;
                    }
                } else {
                    tokio::time::sleep(tokio::time::Duration::from_secs(60)).await;
                    continue;
                }

                info!("JobScheduler: cron tick, running evaluation");
                runtime.check_store().await;
                let report = runtime.run_once().await;
                if !report.errors.is_empty() {
                    warn!(
                        errors = report.errors.len(),
                        "JobScheduler: run finished with per-pair errors"
                    );
                }
            }
        });

        *guard = Some(handle);
    }

    /// Stop the scheduler
    pub async fn stop(&self) {
        let mut handle = self.handle.write().await;
        if let Some(h) = handle.take() {
            h.abort();
            info!("JobScheduler: stopped");
        }
    }

    /// Check if the scheduler is running
    pub async fn is_running(&self) -> bool {
        let handle = self.handle.read().await;
        handle.is_some()
    }
}
