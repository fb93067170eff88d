//! MACD (Moving Average Convergence Divergence) indicator

use crate::common::math;
use crate::models::indicators::{Bar, MacdIndicator};

/// MACD line, signal line and histogram, all aligned to the end of the input
#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    /// Aligned to the slow EMA: `len - slow + 1` values.
    pub macd: Vec<f64>,
    /// Aligned to the signal EMA: `len - slow - signal + 2` values.
    pub signal: Vec<f64>,
    /// Same length as `signal`.
    pub histogram: Vec<f64>,
}

/// MACD = EMA(fast) - EMA(slow)
/// Signal = EMA(signal) of MACD
/// Histogram = MACD - Signal
pub fn macd_series(
    closes: &[f64],
    fast_period: u32,
    slow_period: u32,
    signal_period: u32,
) -> Option<MacdSeries> {
    let (fast, slow, signal) = (
        fast_period as usize,
        slow_period as usize,
        signal_period as usize,
    );
    if fast == 0 || signal == 0 || fast >= slow {
        return None;
    }
    if closes.len() < slow + signal - 1 {
        return None;
    }

    let fast_ema = math::ema_series(closes, fast)?;
    let slow_ema = math::ema_series(closes, slow)?;

    // fast_ema starts (slow - fast) bars earlier than slow_ema
    let offset = slow - fast;
    let macd: Vec<f64> = slow_ema
        .iter()
        .enumerate()
        .map(|(i, s)| fast_ema[i + offset] - s)
        .collect();

    let signal_line = math::ema_series(&macd, signal)?;
    let skip = macd.len() - signal_line.len();
    let histogram = macd[skip..]
        .iter()
        .zip(signal_line.iter())
        .map(|(m, s)| m - s)
        .collect();

    Some(MacdSeries {
        macd,
        signal: signal_line,
        histogram,
    })
}

/// Calculate the latest MACD values.
///
/// Needs at least two histogram values so the slope is defined.
pub fn calculate_macd(
    bars: &[Bar],
    fast_period: u32,
    slow_period: u32,
    signal_period: u32,
) -> Option<MacdIndicator> {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let series = macd_series(&closes, fast_period, slow_period, signal_period)?;

    let n = series.histogram.len();
    if n < 2 {
        return None;
    }

    let histogram = series.histogram[n - 1];
    Some(MacdIndicator {
        macd: *series.macd.last()?,
        signal: *series.signal.last()?,
        histogram,
        histogram_slope: histogram - series.histogram[n - 2],
        period: (fast_period, slow_period, signal_period),
    })
}

/// Calculate MACD with default periods (12, 26, 9)
pub fn calculate_macd_default(bars: &[Bar]) -> Option<MacdIndicator> {
    calculate_macd(bars, 12, 26, 9)
}
