//! Unit tests for RSI

use crate::test_utils::bars_from_closes;
use candlescore::indicators::momentum::{calculate_rsi, calculate_rsi_default, rsi_series};

#[test]
fn test_rsi_all_gains_is_100() {
    let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
    let rsi = calculate_rsi_default(&bars_from_closes(&closes, 0.5)).unwrap();
    assert_eq!(rsi.value, 100.0);
}

#[test]
fn test_rsi_all_losses_is_0() {
    let closes: Vec<f64> = (0..30).map(|i| 100.0 - i as f64).collect();
    let rsi = calculate_rsi_default(&bars_from_closes(&closes, 0.5)).unwrap();
    assert!(rsi.value.abs() < 1e-9);
}

#[test]
fn test_rsi_balanced_changes_is_50() {
    // +1, -1 alternating: first averages are equal and stay equal every other step
    let closes: Vec<f64> = (0..15).map(|i| if i % 2 == 0 { 100.0 } else { 101.0 }).collect();
    let rsi = rsi_series(&closes, 14).unwrap();
    assert_eq!(rsi.len(), 1);
    assert!((rsi[0] - 50.0).abs() < 1e-9);
}

#[test]
fn test_rsi_series_length() {
    let closes: Vec<f64> = (0..40).map(|i| 100.0 + (i as f64 * 0.7).sin()).collect();
    let rsi = rsi_series(&closes, 14).unwrap();
    assert_eq!(rsi.len(), 26);
    assert!(rsi.iter().all(|v| (0.0..=100.0).contains(v)));
}

#[test]
fn test_rsi_insufficient_data() {
    let bars = bars_from_closes(&[100.0; 14], 0.5);
    assert!(calculate_rsi(&bars, 14).is_none());
    assert!(calculate_rsi(&bars, 0).is_none());
}
