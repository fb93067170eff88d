//! Job types for the signal evaluation workflow

use crate::models::indicators::Bar;
use crate::models::instrument::{InstrumentType, Timeframe};
use crate::models::signal::SignalCandidate;
use crate::signals::candidate::Rejection;
use serde::{Deserialize, Serialize};

/// Job to fetch bars for one (symbol, timeframe) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchBarsJob {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub instrument: InstrumentType,
}

/// Job to evaluate fetched bars
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluateSignalJob {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub instrument: InstrumentType,
    pub bars: Vec<Bar>,
}

/// Job to dedup and persist an accepted candidate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSignalJob {
    pub candidate: SignalCandidate,
}

/// How a pair's evaluation ended, short of an error
#[derive(Debug, Clone, PartialEq)]
pub enum JobOutcome {
    Created(Box<SignalCandidate>),
    /// An active signal with the same key already existed.
    Duplicate,
    Rejected(Rejection),
    /// Not enough or unusable data, or the evaluation timed out.
    Skipped(String),
}

impl JobOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobOutcome::Created(_) => "created",
            JobOutcome::Duplicate => "duplicate",
            JobOutcome::Rejected(_) => "rejected",
            JobOutcome::Skipped(_) => "skipped",
        }
    }
}
