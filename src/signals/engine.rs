//! Signal engine: snapshot -> regime -> scores -> candidate for one bar sequence.

use crate::config::EngineConfig;
use crate::error::ConfigError;
use crate::models::indicators::Bar;
use crate::models::instrument::{InstrumentType, RiskTable, Timeframe};
use crate::models::signal::{MarketRegime, SignalCandidate};
use crate::models::snapshot::FactorSnapshot;
use crate::signals::candidate::{build_candidate, Rejection};
use crate::signals::regime::classify;
use crate::signals::scoring::{score_both, DirectionalScores};
use crate::signals::snapshot::{build_snapshot, SnapshotError};
use thiserror::Error;

pub use crate::signals::snapshot::MIN_BARS;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluationError {
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error("rejected: {0}")]
    Rejected(#[from] Rejection),
}

impl EvaluationError {
    /// Data problem (not enough or unusable bars) rather than a quality rejection
    pub fn is_skip(&self) -> bool {
        matches!(self, EvaluationError::Snapshot(_))
    }
}

/// Everything the engine derived from one snapshot, accepted or not
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub snapshot: FactorSnapshot,
    pub regime: MarketRegime,
    pub scores: DirectionalScores,
    pub outcome: Result<SignalCandidate, Rejection>,
}

/// Pure evaluation pipeline. Holds only immutable configuration.
#[derive(Debug, Clone)]
pub struct SignalEngine {
    config: EngineConfig,
    risk_table: RiskTable,
}

impl SignalEngine {
    pub fn new(config: EngineConfig, risk_table: RiskTable) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, risk_table })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn risk_table(&self) -> &RiskTable {
        &self.risk_table
    }

    /// Evaluate the newest bar of `bars` (oldest first)
    pub fn evaluate(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        instrument: InstrumentType,
        bars: &[Bar],
    ) -> Result<SignalCandidate, EvaluationError> {
        let snapshot = build_snapshot(symbol, timeframe, bars)?;
        Ok(self.evaluate_snapshot(&snapshot, instrument)?)
    }

    pub fn evaluate_snapshot(
        &self,
        snapshot: &FactorSnapshot,
        instrument: InstrumentType,
    ) -> Result<SignalCandidate, Rejection> {
        self.explain_snapshot(snapshot, instrument).outcome
    }

    /// Full breakdown for debugging and the on-demand API
    pub fn explain_snapshot(&self, snapshot: &FactorSnapshot, instrument: InstrumentType) -> Evaluation {
        let regime = classify(snapshot, &self.config);
        let scores = score_both(snapshot, regime, &self.config);
        let outcome = build_candidate(
            snapshot,
            regime,
            &scores,
            instrument,
            &self.risk_table,
            &self.config,
        );

        tracing::debug!(
            symbol = %snapshot.symbol,
            timeframe = %snapshot.timeframe,
            regime = %regime,
            long_total = scores.long_total,
            short_total = scores.short_total,
            accepted = outcome.is_ok(),
            "Snapshot evaluated"
        );

        Evaluation {
            snapshot: snapshot.clone(),
            regime,
            scores,
            outcome,
        }
    }
}

impl Default for SignalEngine {
    fn default() -> Self {
        Self {
            config: EngineConfig::default(),
            risk_table: RiskTable::default(),
        }
    }
}
