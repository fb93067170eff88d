//! End-to-end market scenarios through the engine

use crate::test_utils::{downtrend_bounce_bars, flat_bars, trend_snapshot, uptrend_pullback_bars};
use candlescore::models::instrument::{InstrumentType, Timeframe};
use candlescore::models::signal::{MarketRegime, QualityTier, SignalDirection};
use candlescore::signals::candidate::Rejection;
use candlescore::signals::engine::{EvaluationError, SignalEngine};

#[test]
fn test_trend_pullback_snapshot_produces_long() {
    let engine = SignalEngine::default();
    let evaluation = engine.explain_snapshot(&trend_snapshot(), InstrumentType::Forex);

    assert_eq!(evaluation.regime, MarketRegime::Trend);
    assert_eq!(evaluation.scores.long.trend, 1.0);
    assert!(evaluation.scores.long.momentum >= 0.8);
    assert_eq!(evaluation.scores.long.volatility, 1.0);
    assert_eq!(evaluation.scores.long.volume, 0.7);
    assert_eq!(evaluation.scores.long.structure, 1.0);

    let candidate = evaluation.outcome.unwrap();
    assert_eq!(candidate.direction, SignalDirection::Long);
    assert!(candidate.score >= 90);
    assert_eq!(candidate.tier, QualityTier::A);
    assert!((candidate.stop - 109.0).abs() < 1e-9);
    assert!((candidate.primary_target() - 118.0).abs() < 1e-9);
    assert_eq!(candidate.risk_reward, 2.0);
}

#[test]
fn test_uptrend_pullback_bars_produce_long() {
    let engine = SignalEngine::default();
    let candidate = engine
        .evaluate("EURUSD", Timeframe::H1, InstrumentType::Forex, &uptrend_pullback_bars())
        .unwrap();

    assert_eq!(candidate.direction, SignalDirection::Long);
    assert_eq!(candidate.regime, MarketRegime::Trend);
    assert_eq!(candidate.score, 69);
    assert_eq!(candidate.tier, QualityTier::C);
    assert!(candidate.stop < candidate.entry);
    assert!(candidate.primary_target() > candidate.entry);
    assert!((candidate.realized_risk_reward() - 2.0).abs() < 1e-9);
}

#[test]
fn test_downtrend_bounce_bars_produce_short() {
    let engine = SignalEngine::default();
    let candidate = engine
        .evaluate("EURUSD", Timeframe::H1, InstrumentType::Forex, &downtrend_bounce_bars())
        .unwrap();

    assert_eq!(candidate.direction, SignalDirection::Short);
    assert_eq!(candidate.score, 69);
    assert!(candidate.stop > candidate.entry);
    assert!(candidate.primary_target() < candidate.entry);
}

#[test]
fn test_flat_market_is_rejected() {
    let engine = SignalEngine::default();
    let err = engine
        .evaluate("EURUSD", Timeframe::H1, InstrumentType::Forex, &flat_bars(250))
        .unwrap_err();

    assert!(!err.is_skip());
    assert!(matches!(
        err,
        EvaluationError::Rejected(Rejection::BelowThreshold { .. })
    ));
}

#[test]
fn test_short_history_is_a_skip() {
    let engine = SignalEngine::default();
    let err = engine
        .evaluate("EURUSD", Timeframe::H1, InstrumentType::Forex, &flat_bars(120))
        .unwrap_err();
    assert!(err.is_skip());
}

#[test]
fn test_evaluation_is_deterministic() {
    let engine = SignalEngine::default();
    let bars = uptrend_pullback_bars();
    let first = engine.evaluate("EURUSD", Timeframe::H1, InstrumentType::Forex, &bars);
    let second = engine.evaluate("EURUSD", Timeframe::H1, InstrumentType::Forex, &bars);
    assert_eq!(first, second);
}
