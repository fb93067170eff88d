//! Unit tests for bar validation

use candlescore::models::indicators::Bar;
use chrono::Utc;

fn bar(open: f64, high: f64, low: f64, close: f64, volume: f64) -> Bar {
    Bar::new(open, high, low, close, volume, Utc::now())
}

#[test]
fn test_bar_with_positive_prices_is_well_formed() {
    assert!(bar(100.0, 101.0, 99.0, 100.5, 0.0).is_well_formed());
}

#[test]
fn test_bar_with_non_positive_prices_is_malformed() {
    assert!(!bar(100.0, 101.0, 99.0, 0.0, 1000.0).is_well_formed());
    assert!(!bar(100.0, 101.0, -1.0, 100.0, 1000.0).is_well_formed());
    assert!(!bar(0.0, 101.0, 99.0, 100.0, 1000.0).is_well_formed());
}

#[test]
fn test_bar_with_non_finite_values_is_malformed() {
    assert!(!bar(100.0, f64::INFINITY, 99.0, 100.0, 1000.0).is_well_formed());
    assert!(!bar(100.0, 101.0, 99.0, 100.0, f64::NAN).is_well_formed());
}

#[test]
fn test_inverted_bar_is_malformed() {
    assert!(!bar(100.0, 99.0, 101.0, 100.0, 1000.0).is_well_formed());
}
