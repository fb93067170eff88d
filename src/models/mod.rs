//! Shared data models spanning the engine layers.

pub mod indicators;
pub mod instrument;
pub mod signal;
pub mod snapshot;

pub use indicators::{
    AtrIndicator, Bar, EmaIndicator, LevelsIndicator, MacdIndicator, RsiIndicator, SmaIndicator,
    VolumeIndicator,
};
pub use instrument::{
    default_universe, InstrumentType, RiskConfig, RiskTable, SymbolConfig, Timeframe, DEFAULT_RISK,
};
pub use signal::{
    FactorScores, MarketRegime, QualityTier, SignalCandidate, SignalDirection, SignalKey,
    SignalRecord, SignalStatus, ENGINE_VERSION,
};
pub use snapshot::FactorSnapshot;
