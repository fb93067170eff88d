//! SMA (Simple Moving Average) indicator

use crate::common::math;
use crate::models::indicators::{Bar, SmaIndicator};

pub fn sma_series(values: &[f64], period: u32) -> Option<Vec<f64>> {
    math::sma_series(values, period as usize)
}

/// Calculate the SMA of closes over the last `period` bars
pub fn calculate_sma(bars: &[Bar], period: u32) -> Option<SmaIndicator> {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let value = math::sma(&closes, period as usize)?;

    Some(SmaIndicator { value, period })
}
