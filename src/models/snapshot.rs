use crate::models::instrument::Timeframe;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Market state of one symbol/timeframe at the close of its newest bar.
///
/// Built only by `signals::snapshot::build_snapshot`, which guarantees every
/// numeric field is finite. Never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorSnapshot {
    pub symbol: String,
    pub timeframe: Timeframe,
    /// Timestamp of the newest bar the snapshot was computed from.
    pub as_of: DateTime<Utc>,
    pub close: f64,
    pub ema20: f64,
    pub ema50: f64,
    pub ema200: f64,
    pub rsi14: f64,
    pub macd_histogram: f64,
    pub macd_histogram_slope: f64,
    pub atr14: f64,
    pub atr_pct: f64,
    pub volume: f64,
    pub volume_avg20: f64,
    pub volume_ratio: f64,
    pub high20: f64,
    pub low20: f64,
    pub high50: f64,
    pub low50: f64,
}

impl FactorSnapshot {
    /// Relative EMA50/EMA200 spread as a fraction of price.
    pub fn ema_spread(&self) -> f64 {
        if self.close > 0.0 {
            (self.ema50 - self.ema200).abs() / self.close
        } else {
            0.0
        }
    }

    /// Name and value of every numeric field, in declaration order.
    pub fn numeric_fields(&self) -> [(&'static str, f64); 16] {
        [
            ("close", self.close),
            ("ema20", self.ema20),
            ("ema50", self.ema50),
            ("ema200", self.ema200),
            ("rsi14", self.rsi14),
            ("macd_histogram", self.macd_histogram),
            ("macd_histogram_slope", self.macd_histogram_slope),
            ("atr14", self.atr14),
            ("atr_pct", self.atr_pct),
            ("volume", self.volume),
            ("volume_avg20", self.volume_avg20),
            ("volume_ratio", self.volume_ratio),
            ("high20", self.high20),
            ("low20", self.low20),
            ("high50", self.high50),
            ("low50", self.low50),
        ]
    }
}
