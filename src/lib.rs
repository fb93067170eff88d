//! candlescore: OHLCV bars in, scored directional signal candidates out.
//!
//! The indicator and scoring layers (`indicators`, `signals`) are pure and
//! synchronous. `core` and `jobs` orchestrate them over a symbol universe
//! against injected market-data and signal-store collaborators.

pub mod common;
pub mod config;
pub mod core;
pub mod db;
pub mod error;
pub mod indicators;
pub mod jobs;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod signals;
