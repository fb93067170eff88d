//! Factor snapshot construction from a bar sequence

use crate::indicators::momentum::{calculate_macd_default, calculate_rsi_default};
use crate::indicators::structure::calculate_levels;
use crate::indicators::trend::calculate_ema;
use crate::indicators::volatility::calculate_atr_default;
use crate::indicators::volume::{calculate_volume, DEFAULT_VOLUME_PERIOD};
use crate::models::indicators::Bar;
use crate::models::instrument::Timeframe;
use crate::models::snapshot::FactorSnapshot;
use thiserror::Error;

/// Longest lookback of any snapshot input (EMA200).
pub const MIN_BARS: usize = 200;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SnapshotError {
    #[error("insufficient data: need {required} bars, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("non-finite value in {0}")]
    NonFinite(&'static str),

    #[error("malformed bar at index {0}")]
    MalformedBar(usize),
}

/// Build the snapshot for the newest bar of `bars` (oldest first).
///
/// Either every field is populated and finite or an error is returned.
pub fn build_snapshot(
    symbol: &str,
    timeframe: Timeframe,
    bars: &[Bar],
) -> Result<FactorSnapshot, SnapshotError> {
    let insufficient = || SnapshotError::InsufficientData {
        required: MIN_BARS,
        actual: bars.len(),
    };

    if bars.len() < MIN_BARS {
        return Err(insufficient());
    }
    if let Some(index) = bars.iter().position(|b| !b.is_well_formed()) {
        tracing::debug!(symbol = %symbol, timestamp = %bars[index].timestamp, "Malformed bar in input");
        return Err(SnapshotError::MalformedBar(index));
    }

    let last = bars.last().ok_or_else(insufficient)?;
    let close = last.close;

    let ema20 = calculate_ema(bars, 20).ok_or_else(insufficient)?;
    let ema50 = calculate_ema(bars, 50).ok_or_else(insufficient)?;
    let ema200 = calculate_ema(bars, 200).ok_or_else(insufficient)?;
    let rsi = calculate_rsi_default(bars).ok_or_else(insufficient)?;
    let macd = calculate_macd_default(bars).ok_or_else(insufficient)?;
    let atr = calculate_atr_default(bars).ok_or_else(insufficient)?;
    let atr_pct = atr
        .percent_of(close)
        .ok_or(SnapshotError::NonFinite("atr_pct"))?;
    let volume = calculate_volume(bars, DEFAULT_VOLUME_PERIOD).ok_or_else(insufficient)?;
    let levels20 = calculate_levels(bars, 20).ok_or_else(insufficient)?;
    let levels50 = calculate_levels(bars, 50).ok_or_else(insufficient)?;

    let snapshot = FactorSnapshot {
        symbol: symbol.to_string(),
        timeframe,
        as_of: last.timestamp,
        close,
        ema20: ema20.value,
        ema50: ema50.value,
        ema200: ema200.value,
        rsi14: rsi.value,
        macd_histogram: macd.histogram,
        macd_histogram_slope: macd.histogram_slope,
        atr14: atr.value,
        atr_pct,
        volume: volume.volume,
        volume_avg20: volume.volume_ma,
        volume_ratio: volume.ratio,
        high20: levels20.high,
        low20: levels20.low,
        high50: levels50.high,
        low50: levels50.low,
    };

    if let Some((field, _)) = snapshot
        .numeric_fields()
        .into_iter()
        .find(|(_, v)| !v.is_finite())
    {
        return Err(SnapshotError::NonFinite(field));
    }

    Ok(snapshot)
}
