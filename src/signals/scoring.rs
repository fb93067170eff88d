//! Per-direction factor scoring

use crate::config::{EngineConfig, ScoreWeights};
use crate::models::signal::{FactorScores, MarketRegime, SignalDirection};
use crate::models::snapshot::FactorSnapshot;
use crate::signals::regime::{near_high20, near_low20};

/// Long and short scores for one snapshot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalScores {
    pub long: FactorScores,
    pub long_total: u8,
    pub short: FactorScores,
    pub short_total: u8,
}

impl DirectionalScores {
    /// The stronger side. Ties resolve to Long.
    pub fn pick(&self) -> (SignalDirection, FactorScores, u8) {
        match pick_direction(self.long_total, self.short_total) {
            SignalDirection::Long => (SignalDirection::Long, self.long, self.long_total),
            SignalDirection::Short => (SignalDirection::Short, self.short, self.short_total),
        }
    }
}

pub fn pick_direction(long_total: u8, short_total: u8) -> SignalDirection {
    if short_total > long_total {
        SignalDirection::Short
    } else {
        SignalDirection::Long
    }
}

/// Score both directions
pub fn score_both(
    snapshot: &FactorSnapshot,
    regime: MarketRegime,
    config: &EngineConfig,
) -> DirectionalScores {
    let long = score_direction(snapshot, regime, SignalDirection::Long, config);
    let short = score_direction(snapshot, regime, SignalDirection::Short, config);

    DirectionalScores {
        long,
        long_total: total_score(&long, &config.weights),
        short,
        short_total: total_score(&short, &config.weights),
    }
}

pub fn score_direction(
    snapshot: &FactorSnapshot,
    regime: MarketRegime,
    direction: SignalDirection,
    config: &EngineConfig,
) -> FactorScores {
    FactorScores {
        trend: trend_score(snapshot, direction),
        momentum: momentum_score(snapshot, regime, direction),
        volatility: volatility_score(snapshot, regime, config),
        volume: volume_score(snapshot, config),
        structure: structure_score(snapshot, regime, direction, config),
    }
}

/// Weighted 0-100 total
pub fn total_score(scores: &FactorScores, weights: &ScoreWeights) -> u8 {
    let weighted: f64 = weighted_contributions(scores, weights)
        .iter()
        .map(|(_, c)| c)
        .sum();
    (weighted * 100.0).round().clamp(0.0, 100.0) as u8
}

/// (factor name, weight * sub-score) in declaration order
pub fn weighted_contributions(
    scores: &FactorScores,
    weights: &ScoreWeights,
) -> [(&'static str, f64); 5] {
    [
        ("trend", scores.trend * weights.trend),
        ("momentum", scores.momentum * weights.momentum),
        ("volatility", scores.volatility * weights.volatility),
        ("volume", scores.volume * weights.volume),
        ("structure", scores.structure * weights.structure),
    ]
}

/// `a` is beyond `b` in the trade's direction
fn beyond(direction: SignalDirection, a: f64, b: f64) -> bool {
    match direction {
        SignalDirection::Long => a > b,
        SignalDirection::Short => a < b,
    }
}

pub fn trend_score(s: &FactorSnapshot, direction: SignalDirection) -> f64 {
    let stacked = beyond(direction, s.ema50, s.ema200);

    if beyond(direction, s.ema20, s.ema50) && stacked {
        1.0
    } else if stacked && beyond(direction, s.close, s.ema50) {
        0.8
    } else if stacked {
        0.5
    } else if beyond(direction, s.ema20, s.ema50) && beyond(direction, s.close, s.ema20) {
        0.5
    } else {
        0.0
    }
}

pub fn momentum_score(s: &FactorSnapshot, regime: MarketRegime, direction: SignalDirection) -> f64 {
    // RSI seen from the trade's side: low means stretched against it
    let rsi = match direction {
        SignalDirection::Long => s.rsi14,
        SignalDirection::Short => 100.0 - s.rsi14,
    };

    let base: f64 = match regime {
        MarketRegime::Trend => {
            if rsi < 35.0 {
                0.8
            } else if rsi > 40.0 && rsi < 65.0 {
                0.6
            } else if rsi <= 40.0 {
                0.3
            } else {
                0.1
            }
        }
        MarketRegime::Breakout => {
            if rsi > 55.0 && rsi < 75.0 {
                0.7
            } else if rsi >= 75.0 {
                0.4
            } else {
                0.2
            }
        }
        MarketRegime::Range => {
            if rsi < 30.0 {
                0.8
            } else if rsi < 40.0 {
                0.6
            } else {
                0.2
            }
        }
    };

    let histogram = s.macd_histogram * direction.sign();
    let slope = s.macd_histogram_slope * direction.sign();
    let bonus = match (histogram > 0.0, slope > 0.0) {
        (true, true) => 0.3,
        (true, false) | (false, true) => 0.15,
        (false, false) => 0.0,
    };

    (base + bonus).min(1.0)
}

pub fn volatility_score(s: &FactorSnapshot, regime: MarketRegime, config: &EngineConfig) -> f64 {
    if config.volatility.for_regime(regime).contains(s.atr_pct) {
        1.0
    } else {
        0.5
    }
}

pub fn volume_score(s: &FactorSnapshot, config: &EngineConfig) -> f64 {
    if s.volume_ratio >= config.volume_surge_ratio {
        1.0
    } else if s.volume_ratio >= config.volume_normal_ratio {
        0.7
    } else {
        0.4
    }
}

pub fn structure_score(
    s: &FactorSnapshot,
    regime: MarketRegime,
    direction: SignalDirection,
    config: &EngineConfig,
) -> f64 {
    let matched = match (regime, direction) {
        (MarketRegime::Trend, _) => {
            let pullback = s.close > 0.0 && (s.close - s.ema20).abs() / s.close <= config.pullback_tolerance;
            pullback && beyond(direction, s.ema20, s.ema50)
        }
        (MarketRegime::Breakout, SignalDirection::Long) => near_high20(s, config.breakout_proximity),
        (MarketRegime::Breakout, SignalDirection::Short) => near_low20(s, config.breakout_proximity),
        (MarketRegime::Range, SignalDirection::Long) => near_low20(s, config.range_extreme_tolerance),
        (MarketRegime::Range, SignalDirection::Short) => near_high20(s, config.range_extreme_tolerance),
    };

    if matched {
        1.0
    } else {
        0.0
    }
}
