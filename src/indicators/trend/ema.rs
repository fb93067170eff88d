//! EMA (Exponential Moving Average) indicator

use crate::common::math;
use crate::models::indicators::{Bar, EmaIndicator};

/// EMA series over closes, seeded with the SMA of the first `period` closes
pub fn ema_series(closes: &[f64], period: u32) -> Option<Vec<f64>> {
    math::ema_series(closes, period as usize)
}

/// Calculate EMA for a specific period
pub fn calculate_ema(bars: &[Bar], period: u32) -> Option<EmaIndicator> {
    if period == 0 || bars.len() < period as usize {
        return None;
    }

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let value = math::ema(&closes, period as usize)?;

    Some(EmaIndicator { value, period })
}

/// Calculate multiple EMAs at once. Periods the bars cannot satisfy are dropped.
pub fn calculate_emas(bars: &[Bar], periods: &[u32]) -> Vec<EmaIndicator> {
    periods
        .iter()
        .filter_map(|&period| calculate_ema(bars, period))
        .collect()
}

/// Compare a fast and a slow EMA: 1 when fast is above, -1 below, 0 equal
pub fn check_ema_cross(bars: &[Bar], fast_period: u32, slow_period: u32) -> Option<i32> {
    let fast_ema = calculate_ema(bars, fast_period)?;
    let slow_ema = calculate_ema(bars, slow_period)?;

    if fast_ema.value > slow_ema.value {
        Some(1)
    } else if fast_ema.value < slow_ema.value {
        Some(-1)
    } else {
        Some(0)
    }
}
