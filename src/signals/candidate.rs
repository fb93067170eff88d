//! Candidate construction: direction pick, risk levels, tier and rationale

use crate::config::EngineConfig;
use crate::models::instrument::{InstrumentType, RiskTable};
use crate::models::signal::{
    FactorScores, MarketRegime, QualityTier, SignalCandidate, SignalDirection,
};
use crate::models::snapshot::FactorSnapshot;
use crate::signals::scoring::{weighted_contributions, DirectionalScores};
use thiserror::Error;

/// Why an evaluation produced no candidate. Expected outcome, not a failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Rejection {
    #[error("score {score} below threshold {threshold}")]
    BelowThreshold { score: u8, threshold: u8 },

    #[error("invalid ATR {0}")]
    InvalidAtr(f64),

    #[error("invalid levels: entry {entry}, stop {stop}")]
    InvalidLevels { entry: f64, stop: f64 },

    #[error("risk:reward {actual:.6} does not match configured {expected:.6}")]
    RiskRewardMismatch { expected: f64, actual: f64 },
}

impl Rejection {
    /// Label used for outcome metrics
    pub fn as_str(&self) -> &'static str {
        match self {
            Rejection::BelowThreshold { .. } => "below_threshold",
            Rejection::InvalidAtr(_) => "invalid_atr",
            Rejection::InvalidLevels { .. } => "invalid_levels",
            Rejection::RiskRewardMismatch { .. } => "risk_reward_mismatch",
        }
    }
}

pub fn tier_for(score: u8, config: &EngineConfig) -> QualityTier {
    if score >= config.tier_a_min {
        QualityTier::A
    } else if score >= config.tier_b_min {
        QualityTier::B
    } else {
        QualityTier::C
    }
}

/// Turn scored snapshot into a candidate, or say why not.
pub fn build_candidate(
    snapshot: &FactorSnapshot,
    regime: MarketRegime,
    scores: &DirectionalScores,
    instrument: InstrumentType,
    risk_table: &RiskTable,
    config: &EngineConfig,
) -> Result<SignalCandidate, Rejection> {
    let (direction, factor_scores, score) = scores.pick();

    if score < config.acceptance_threshold {
        return Err(Rejection::BelowThreshold {
            score,
            threshold: config.acceptance_threshold,
        });
    }

    let atr = snapshot.atr14;
    if !atr.is_finite() || atr <= 0.0 {
        return Err(Rejection::InvalidAtr(atr));
    }

    let risk = risk_table.get(instrument);
    let entry = snapshot.close;
    let sign = direction.sign();
    let stop_distance = atr * risk.atr_multiple;
    let stop = entry - sign * stop_distance;

    let mut targets = vec![entry + sign * stop_distance * risk.reward_multiple];
    if let Some(extended) = risk.extended_reward_multiple {
        targets.push(entry + sign * stop_distance * extended);
    }

    let levels_valid = risk.is_valid()
        && stop.is_finite()
        && stop > 0.0
        && stop != entry
        && targets.iter().all(|t| t.is_finite() && *t > 0.0);
    if !levels_valid {
        return Err(Rejection::InvalidLevels { entry, stop });
    }

    let realized = (targets[0] - entry).abs() / (entry - stop).abs();
    let expected = risk.reward_multiple;
    if (realized - expected).abs() > config.risk_reward_tolerance * expected {
        return Err(Rejection::RiskRewardMismatch {
            expected,
            actual: realized,
        });
    }

    let tier = tier_for(score, config);
    let explanation = explain(direction, regime, score, tier, &factor_scores, config);

    Ok(SignalCandidate {
        symbol: snapshot.symbol.clone(),
        timeframe: snapshot.timeframe,
        instrument,
        direction,
        score,
        tier,
        entry,
        stop,
        targets,
        risk_reward: expected,
        regime,
        scores: factor_scores,
        explanation,
        snapshot: snapshot.clone(),
    })
}

/// "Long Trend setup scored 87/100 (tier A). Drivers: trend 100%, momentum 80%, ..."
fn explain(
    direction: SignalDirection,
    regime: MarketRegime,
    score: u8,
    tier: QualityTier,
    scores: &FactorScores,
    config: &EngineConfig,
) -> String {
    let mut contributions = weighted_contributions(scores, &config.weights);
    // stable: equal contributions keep declaration order
    contributions.sort_by(|a, b| b.1.total_cmp(&a.1));

    let raw = [
        ("trend", scores.trend),
        ("momentum", scores.momentum),
        ("volatility", scores.volatility),
        ("volume", scores.volume),
        ("structure", scores.structure),
    ];
    let drivers: Vec<String> = contributions
        .iter()
        .take(3)
        .filter_map(|(name, _)| raw.iter().find(|(n, _)| n == name))
        .map(|(name, value)| format!("{} {:.0}%", name, value * 100.0))
        .collect();

    format!(
        "{} {} setup scored {}/100 (tier {}). Drivers: {}",
        direction,
        regime,
        score,
        tier,
        drivers.join(", ")
    )
}
