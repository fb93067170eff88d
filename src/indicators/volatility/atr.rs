//! ATR (Average True Range) indicator

use crate::common::math;
use crate::models::indicators::{AtrIndicator, Bar};

pub const DEFAULT_ATR_PERIOD: u32 = 14;

/// ATR series with Wilder smoothing.
///
/// The first bar's true range is its own high - low. The seed is the mean of
/// the first `period` true ranges; output length is `len - period + 1`.
pub fn atr_series(high: &[f64], low: &[f64], close: &[f64], period: u32) -> Option<Vec<f64>> {
    let tr = math::true_range_series(high, low, close)?;
    math::wilder_series(&tr, period as usize)
}

/// Calculate the latest ATR value
pub fn calculate_atr(bars: &[Bar], period: u32) -> Option<AtrIndicator> {
    let high: Vec<f64> = bars.iter().map(|b| b.high).collect();
    let low: Vec<f64> = bars.iter().map(|b| b.low).collect();
    let close: Vec<f64> = bars.iter().map(|b| b.close).collect();

    let value = atr_series(&high, &low, &close, period)?.last().copied()?;

    Some(AtrIndicator { value, period })
}

/// Calculate ATR with default period (14)
pub fn calculate_atr_default(bars: &[Bar]) -> Option<AtrIndicator> {
    calculate_atr(bars, DEFAULT_ATR_PERIOD)
}
