//! Per-pair evaluation jobs

pub mod context;
pub mod handlers;
pub mod types;

pub use context::JobContext;
pub use handlers::run_job;
pub use types::{EvaluateSignalJob, FetchBarsJob, JobOutcome, StoreSignalJob};
