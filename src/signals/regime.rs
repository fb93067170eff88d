//! Market regime classification

use crate::config::EngineConfig;
use crate::models::signal::MarketRegime;
use crate::models::snapshot::FactorSnapshot;

/// Classify a snapshot. First matching rule wins: Trend, Breakout, Range.
pub fn classify(snapshot: &FactorSnapshot, config: &EngineConfig) -> MarketRegime {
    let spread = snapshot.ema_spread();

    if is_trending(snapshot) && spread > config.trend_spread {
        return MarketRegime::Trend;
    }

    if (near_high20(snapshot, config.breakout_proximity)
        || near_low20(snapshot, config.breakout_proximity))
        && spread > config.breakout_spread
    {
        return MarketRegime::Breakout;
    }

    MarketRegime::Range
}

/// close > ema50 > ema200, or the mirror
fn is_trending(s: &FactorSnapshot) -> bool {
    (s.close > s.ema50 && s.ema50 > s.ema200) || (s.close < s.ema50 && s.ema50 < s.ema200)
}

pub(crate) fn near_high20(s: &FactorSnapshot, proximity: f64) -> bool {
    s.close >= s.high20 * (1.0 - proximity)
}

pub(crate) fn near_low20(s: &FactorSnapshot, proximity: f64) -> bool {
    s.close <= s.low20 * (1.0 + proximity)
}
