//! Rolling high/low levels

use crate::common::math;
use crate::models::indicators::{Bar, LevelsIndicator};

/// Trailing max(high) per window end. Output length is `len - period + 1`.
pub fn rolling_high(highs: &[f64], period: u32) -> Option<Vec<f64>> {
    math::rolling_max(highs, period as usize)
}

/// Trailing min(low) per window end. Output length is `len - period + 1`.
pub fn rolling_low(lows: &[f64], period: u32) -> Option<Vec<f64>> {
    math::rolling_min(lows, period as usize)
}

/// Highest high and lowest low over the last `period` bars, current bar included
pub fn calculate_levels(bars: &[Bar], period: u32) -> Option<LevelsIndicator> {
    if period == 0 || bars.len() < period as usize {
        return None;
    }

    let window = &bars[bars.len() - period as usize..];
    let high = window.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
    let low = window.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);

    Some(LevelsIndicator { high, low, period })
}
