//! Unit tests for MACD

use crate::test_utils::bars_from_closes;
use candlescore::indicators::momentum::{calculate_macd, calculate_macd_default, macd_series};

#[test]
fn test_macd_series_alignment() {
    let closes: Vec<f64> = (0..40).map(|i| 100.0 + i as f64 * 0.5).collect();
    let series = macd_series(&closes, 12, 26, 9).unwrap();

    assert_eq!(series.macd.len(), 15);
    assert_eq!(series.signal.len(), 7);
    assert_eq!(series.histogram.len(), 7);
}

#[test]
fn test_macd_flat_series_is_zero() {
    let bars = bars_from_closes(&[100.0; 60], 0.5);
    let macd = calculate_macd_default(&bars).unwrap();
    assert_eq!(macd.macd, 0.0);
    assert_eq!(macd.signal, 0.0);
    assert_eq!(macd.histogram, 0.0);
    assert_eq!(macd.histogram_slope, 0.0);
    assert_eq!(macd.period, (12, 26, 9));
}

#[test]
fn test_macd_positive_in_accelerating_uptrend() {
    let closes: Vec<f64> = (0..80).map(|i| 100.0 + (i as f64).powi(2) * 0.01).collect();
    let macd = calculate_macd_default(&bars_from_closes(&closes, 0.5)).unwrap();
    assert!(macd.macd > 0.0);
    assert!(macd.histogram > 0.0);
}

#[test]
fn test_macd_needs_two_histogram_values() {
    // 34 bars give exactly one histogram value: no slope
    let bars = bars_from_closes(&[100.0; 34], 0.5);
    assert!(calculate_macd(&bars, 12, 26, 9).is_none());

    let bars = bars_from_closes(&[100.0; 35], 0.5);
    assert!(calculate_macd(&bars, 12, 26, 9).is_some());
}

#[test]
fn test_macd_rejects_invalid_periods() {
    let closes = vec![100.0; 100];
    assert!(macd_series(&closes, 26, 12, 9).is_none());
    assert!(macd_series(&closes, 0, 26, 9).is_none());
    assert!(macd_series(&closes, 12, 26, 0).is_none());
}
