//! RSI (Relative Strength Index) indicator

use crate::common::math;
use crate::models::indicators::{Bar, RsiIndicator};

pub const DEFAULT_RSI_PERIOD: u32 = 14;

/// RSI series with Wilder smoothing.
///
/// RSI = 100 - (100 / (1 + RS)), RS = average gain / average loss.
/// The first averages are the plain means of the first `period` changes.
/// Output length is `closes.len() - period`.
pub fn rsi_series(closes: &[f64], period: u32) -> Option<Vec<f64>> {
    let period = period as usize;
    if period == 0 || closes.len() < period + 1 {
        return None;
    }

    let (gains, losses): (Vec<f64>, Vec<f64>) = closes
        .windows(2)
        .map(|w| {
            let change = w[1] - w[0];
            (change.max(0.0), (-change).max(0.0))
        })
        .unzip();

    let avg_gains = math::wilder_series(&gains, period)?;
    let avg_losses = math::wilder_series(&losses, period)?;

    Some(
        avg_gains
            .iter()
            .zip(avg_losses.iter())
            .map(|(&gain, &loss)| rsi_value(gain, loss))
            .collect(),
    )
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    (100.0 - (100.0 / (1.0 + rs))).clamp(0.0, 100.0)
}

/// Calculate the latest RSI value
pub fn calculate_rsi(bars: &[Bar], period: u32) -> Option<RsiIndicator> {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let value = rsi_series(&closes, period)?.last().copied()?;

    Some(RsiIndicator { value, period })
}

/// Calculate RSI with default period (14)
pub fn calculate_rsi_default(bars: &[Bar]) -> Option<RsiIndicator> {
    calculate_rsi(bars, DEFAULT_RSI_PERIOD)
}
