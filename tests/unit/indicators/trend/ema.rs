//! Unit tests for EMA and SMA indicators

use crate::test_utils::bars_from_closes;
use candlescore::indicators::trend::{calculate_ema, calculate_emas, calculate_sma, check_ema_cross};

fn rising_bars(count: usize) -> Vec<candlescore::models::indicators::Bar> {
    let closes: Vec<f64> = (0..count).map(|i| 100.0 + i as f64 * 0.1).collect();
    bars_from_closes(&closes, 0.05)
}

#[test]
fn test_ema_insufficient_data() {
    let bars = rising_bars(10);
    assert!(calculate_ema(&bars, 20).is_none());
    assert!(calculate_ema(&bars, 0).is_none());
}

#[test]
fn test_ema_reference_values() {
    let closes: Vec<f64> = (1..=30).map(|v| v as f64).collect();
    let bars = bars_from_closes(&closes, 0.5);
    let ema = calculate_ema(&bars, 10).unwrap();
    assert_eq!(ema.period, 10);
    assert!((ema.value - 25.5).abs() < 1e-9);
}

#[test]
fn test_calculate_multiple_emas_drops_unsatisfiable_periods() {
    let bars = rising_bars(100);
    let emas = calculate_emas(&bars, &[20, 50, 200]);
    assert_eq!(emas.len(), 2);
    assert_eq!(emas[0].period, 20);
    assert_eq!(emas[1].period, 50);
}

#[test]
fn test_ema_cross_in_uptrend() {
    let bars = rising_bars(60);
    assert_eq!(check_ema_cross(&bars, 12, 26), Some(1));
}

#[test]
fn test_sma_latest_window() {
    let bars = bars_from_closes(&[1.0, 2.0, 3.0, 4.0, 5.0], 0.5);
    let sma = calculate_sma(&bars, 2).unwrap();
    assert!((sma.value - 4.5).abs() < 1e-12);
    assert!(calculate_sma(&bars, 6).is_none());
}
