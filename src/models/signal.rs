//! Signal candidates and their persisted form

use crate::models::instrument::{InstrumentType, Timeframe};
use crate::models::snapshot::FactorSnapshot;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tag written next to every stored signal so records can be traced back to
/// the scoring rules that produced them.
pub const ENGINE_VERSION: &str = concat!("candlescore-", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalDirection {
    Long,
    Short,
}

impl SignalDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalDirection::Long => "Long",
            SignalDirection::Short => "Short",
        }
    }

    /// +1 for Long, -1 for Short.
    pub fn sign(&self) -> f64 {
        match self {
            SignalDirection::Long => 1.0,
            SignalDirection::Short => -1.0,
        }
    }
}

impl fmt::Display for SignalDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarketRegime {
    Trend,
    Range,
    Breakout,
}

impl MarketRegime {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketRegime::Trend => "Trend",
            MarketRegime::Range => "Range",
            MarketRegime::Breakout => "Breakout",
        }
    }
}

impl fmt::Display for MarketRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum QualityTier {
    A,
    B,
    C,
}

impl QualityTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityTier::A => "A",
            QualityTier::B => "B",
            QualityTier::C => "C",
        }
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Five sub-scores for one direction, each in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorScores {
    pub trend: f64,
    pub momentum: f64,
    pub volatility: f64,
    pub volume: f64,
    pub structure: f64,
}

/// An accepted evaluation. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalCandidate {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub instrument: InstrumentType,
    pub direction: SignalDirection,
    pub score: u8,
    pub tier: QualityTier,
    pub entry: f64,
    pub stop: f64,
    /// Primary target first.
    pub targets: Vec<f64>,
    pub risk_reward: f64,
    pub regime: MarketRegime,
    pub scores: FactorScores,
    pub explanation: String,
    pub snapshot: FactorSnapshot,
}

impl SignalCandidate {
    pub fn primary_target(&self) -> f64 {
        self.targets.first().copied().unwrap_or(self.entry)
    }

    /// Risk:reward measured from the actual levels.
    pub fn realized_risk_reward(&self) -> f64 {
        let risk = (self.entry - self.stop).abs();
        if risk > 0.0 {
            (self.primary_target() - self.entry).abs() / risk
        } else {
            0.0
        }
    }

    pub fn key(&self) -> SignalKey {
        SignalKey {
            symbol: self.symbol.clone(),
            timeframe: self.timeframe,
            direction: self.direction,
        }
    }
}

/// Uniqueness key for active signals
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SignalKey {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub direction: SignalDirection,
}

impl fmt::Display for SignalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.symbol, self.timeframe, self.direction)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalStatus {
    Active,
    Closed,
}

impl SignalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalStatus::Active => "active",
            SignalStatus::Closed => "closed",
        }
    }
}

/// What the store persists for a candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRecord {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub direction: SignalDirection,
    pub entry: f64,
    pub stop: f64,
    pub targets: Vec<f64>,
    pub score: u8,
    pub tier: QualityTier,
    pub regime: MarketRegime,
    pub risk_reward: f64,
    pub explanation: String,
    pub engine_version: String,
    pub status: SignalStatus,
    pub activated_at: DateTime<Utc>,
}

impl SignalRecord {
    pub fn from_candidate(candidate: &SignalCandidate, activated_at: DateTime<Utc>) -> Self {
        Self {
            symbol: candidate.symbol.clone(),
            timeframe: candidate.timeframe,
            direction: candidate.direction,
            entry: candidate.entry,
            stop: candidate.stop,
            targets: candidate.targets.clone(),
            score: candidate.score,
            tier: candidate.tier,
            regime: candidate.regime,
            risk_reward: candidate.risk_reward,
            explanation: candidate.explanation.clone(),
            engine_version: ENGINE_VERSION.to_string(),
            status: SignalStatus::Active,
            activated_at,
        }
    }

    pub fn key(&self) -> SignalKey {
        SignalKey {
            symbol: self.symbol.clone(),
            timeframe: self.timeframe,
            direction: self.direction,
        }
    }
}
