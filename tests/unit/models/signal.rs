//! Unit tests for candidates and stored records

use crate::test_utils::{base_time, trend_snapshot};
use candlescore::models::instrument::{InstrumentType, Timeframe};
use candlescore::models::signal::{
    FactorScores, MarketRegime, QualityTier, SignalCandidate, SignalDirection, SignalRecord,
    SignalStatus, ENGINE_VERSION,
};

fn candidate() -> SignalCandidate {
    SignalCandidate {
        symbol: "EURUSD".to_string(),
        timeframe: Timeframe::H1,
        instrument: InstrumentType::Forex,
        direction: SignalDirection::Short,
        score: 74,
        tier: QualityTier::B,
        entry: 112.0,
        stop: 115.0,
        targets: vec![106.0],
        risk_reward: 2.0,
        regime: MarketRegime::Trend,
        scores: FactorScores {
            trend: 1.0,
            momentum: 0.6,
            volatility: 1.0,
            volume: 0.7,
            structure: 0.0,
        },
        explanation: "Short Trend setup".to_string(),
        snapshot: trend_snapshot(),
    }
}

#[test]
fn test_realized_risk_reward() {
    let c = candidate();
    assert_eq!(c.primary_target(), 106.0);
    assert!((c.realized_risk_reward() - 2.0).abs() < 1e-12);
}

#[test]
fn test_key_identifies_symbol_timeframe_direction() {
    let key = candidate().key();
    assert_eq!(key.symbol, "EURUSD");
    assert_eq!(key.timeframe, Timeframe::H1);
    assert_eq!(key.direction, SignalDirection::Short);
}

#[test]
fn test_record_from_candidate_is_active() {
    let c = candidate();
    let record = SignalRecord::from_candidate(&c, base_time());

    assert_eq!(record.status, SignalStatus::Active);
    assert_eq!(record.activated_at, base_time());
    assert_eq!(record.engine_version, ENGINE_VERSION);
    assert_eq!(record.key(), c.key());
}

#[test]
fn test_candidate_serializes_with_snapshot() {
    let value = serde_json::to_value(candidate()).unwrap();
    assert_eq!(value["direction"], "Short");
    assert_eq!(value["timeframe"], "1h");
    assert_eq!(value["snapshot"]["rsi14"], 28.0);
}
