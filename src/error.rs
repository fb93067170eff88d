//! Error types shared across the crate.

use std::time::Duration;
use thiserror::Error;

/// Configuration could not be loaded or is inconsistent
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        ConfigError::Invalid(msg.into())
    }
}

/// Failures of the market-data collaborator
#[derive(Debug, Error)]
pub enum MarketDataError {
    /// Temporary failure worth retrying (network, provider throttling)
    #[error("transient market data failure: {0}")]
    Transient(String),

    /// Provider answered but the bars are unusable
    #[error("malformed bars for {symbol}: {reason}")]
    Malformed { symbol: String, reason: String },

    /// Provider could not be reached or refused the request
    #[error("market data unavailable: {0}")]
    Unavailable(String),
}

impl MarketDataError {
    pub fn is_transient(&self) -> bool {
        matches!(self, MarketDataError::Transient(_))
    }
}

/// Failures of the persistence collaborator
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store connection error: {0}")]
    Connection(String),

    #[error("store query failed: {0}")]
    Query(String),

    #[error("failed to serialize signal: {0}")]
    Serialization(String),
}

impl From<tokio_postgres::Error> for StoreError {
    fn from(e: tokio_postgres::Error) -> Self {
        if e.is_closed() {
            StoreError::Connection(e.to_string())
        } else {
            StoreError::Query(e.to_string())
        }
    }
}

/// Failure of a single (symbol, timeframe) job. Never aborts a run.
#[derive(Debug, Error)]
pub enum JobError {
    #[error(transparent)]
    MarketData(#[from] MarketDataError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("evaluation timed out after {0:?}")]
    Timeout(Duration),
}

/// Misconfiguration that makes a whole run impossible
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("symbol universe is empty")]
    EmptyUniverse,

    #[error("risk table is empty")]
    EmptyRiskTable,

    #[error("unknown symbol: {0}")]
    UnknownSymbol(String),

    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),
}
