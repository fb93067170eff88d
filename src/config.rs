//! Environment lookups and the engine's threshold configuration.

use crate::error::ConfigError;
use crate::models::instrument::{default_universe, RiskTable, SymbolConfig};
use crate::models::signal::MarketRegime;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

pub fn get_environment() -> String {
    env::var("APP_ENV").unwrap_or_else(|_| "development".to_string())
}

pub fn is_production() -> bool {
    matches!(get_environment().as_str(), "production" | "prod")
}

pub fn get_database_url() -> Option<String> {
    env::var("DATABASE_URL").ok().filter(|url| !url.is_empty())
}

pub fn get_port() -> u16 {
    env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080)
}

/// Weights of the five sub-scores in the 0-100 total
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub trend: f64,
    pub momentum: f64,
    pub volatility: f64,
    pub volume: f64,
    pub structure: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            trend: 0.30,
            momentum: 0.30,
            volatility: 0.15,
            volume: 0.15,
            structure: 0.10,
        }
    }
}

impl ScoreWeights {
    pub fn sum(&self) -> f64 {
        self.trend + self.momentum + self.volatility + self.volume + self.structure
    }

    fn as_array(&self) -> [f64; 5] {
        [
            self.trend,
            self.momentum,
            self.volatility,
            self.volume,
            self.structure,
        ]
    }
}

/// Inclusive ATR% band (percent of price) considered healthy for a regime
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolatilityBand {
    pub min_pct: f64,
    pub max_pct: f64,
}

impl VolatilityBand {
    pub const fn new(min_pct: f64, max_pct: f64) -> Self {
        Self { min_pct, max_pct }
    }

    pub fn contains(&self, atr_pct: f64) -> bool {
        atr_pct >= self.min_pct && atr_pct <= self.max_pct
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolatilityBands {
    pub trend: VolatilityBand,
    pub range: VolatilityBand,
    pub breakout: VolatilityBand,
}

impl Default for VolatilityBands {
    fn default() -> Self {
        Self {
            trend: VolatilityBand::new(0.3, 2.5),
            range: VolatilityBand::new(0.2, 1.5),
            breakout: VolatilityBand::new(0.8, 5.0),
        }
    }
}

impl VolatilityBands {
    pub fn for_regime(&self, regime: MarketRegime) -> VolatilityBand {
        match regime {
            MarketRegime::Trend => self.trend,
            MarketRegime::Range => self.range,
            MarketRegime::Breakout => self.breakout,
        }
    }
}

/// Every threshold the regime classifier, scorer and candidate builder read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Minimum total score for a candidate.
    pub acceptance_threshold: u8,
    pub tier_a_min: u8,
    pub tier_b_min: u8,
    /// Minimum |ema50 - ema200| / close for a trend.
    pub trend_spread: f64,
    /// Minimum spread for a breakout.
    pub breakout_spread: f64,
    /// Fractional distance to the 20-bar extreme that counts as "at" it.
    pub breakout_proximity: f64,
    /// Max |close - ema20| / close for a trend pullback.
    pub pullback_tolerance: f64,
    /// Fractional distance to the opposite 20-bar extreme in a range.
    pub range_extreme_tolerance: f64,
    pub volume_surge_ratio: f64,
    pub volume_normal_ratio: f64,
    pub risk_reward_tolerance: f64,
    pub weights: ScoreWeights,
    pub volatility: VolatilityBands,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            acceptance_threshold: 60,
            tier_a_min: 80,
            tier_b_min: 70,
            trend_spread: 0.004,
            breakout_spread: 0.0015,
            breakout_proximity: 0.002,
            pullback_tolerance: 0.01,
            range_extreme_tolerance: 0.003,
            volume_surge_ratio: 1.5,
            volume_normal_ratio: 1.0,
            risk_reward_tolerance: 1e-9,
            weights: ScoreWeights::default(),
            volatility: VolatilityBands::default(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let weights = self.weights.as_array();
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(ConfigError::invalid("score weights must be finite and >= 0"));
        }
        if (self.weights.sum() - 1.0).abs() > 1e-6 {
            return Err(ConfigError::invalid(format!(
                "score weights must sum to 1.0, got {:.6}",
                self.weights.sum()
            )));
        }
        if self.acceptance_threshold > 100 || self.tier_a_min > 100 {
            return Err(ConfigError::invalid("score thresholds must be <= 100"));
        }
        if self.tier_b_min > self.tier_a_min {
            return Err(ConfigError::invalid("tier B cutoff exceeds tier A cutoff"));
        }

        let fractions = [
            ("trend_spread", self.trend_spread),
            ("breakout_spread", self.breakout_spread),
            ("breakout_proximity", self.breakout_proximity),
            ("pullback_tolerance", self.pullback_tolerance),
            ("range_extreme_tolerance", self.range_extreme_tolerance),
            ("risk_reward_tolerance", self.risk_reward_tolerance),
        ];
        for (name, value) in fractions {
            if !value.is_finite() || !(0.0..1.0).contains(&value) {
                return Err(ConfigError::invalid(format!("{name} must be in [0, 1)")));
            }
        }

        if !(self.volume_normal_ratio.is_finite()
            && self.volume_surge_ratio.is_finite()
            && self.volume_normal_ratio <= self.volume_surge_ratio)
        {
            return Err(ConfigError::invalid(
                "volume_normal_ratio must not exceed volume_surge_ratio",
            ));
        }

        for band in [
            self.volatility.trend,
            self.volatility.range,
            self.volatility.breakout,
        ] {
            if !(band.min_pct.is_finite() && band.max_pct.is_finite() && band.min_pct <= band.max_pct)
            {
                return Err(ConfigError::invalid(format!(
                    "invalid volatility band {:.3}..{:.3}",
                    band.min_pct, band.max_pct
                )));
            }
        }

        Ok(())
    }
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let display = path.display().to_string();
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: display.clone(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: display,
        source,
    })
}

/// Reads `ENGINE_CONFIG_PATH` if set, defaults otherwise. Always validated.
pub fn load_engine_config() -> Result<EngineConfig, ConfigError> {
    let config = match env::var("ENGINE_CONFIG_PATH") {
        Ok(path) => load_json(Path::new(&path))?,
        Err(_) => EngineConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

/// Reads `RISK_TABLE_PATH` if set, the built-in table otherwise.
pub fn load_risk_table() -> Result<RiskTable, ConfigError> {
    let table: RiskTable = match env::var("RISK_TABLE_PATH") {
        Ok(path) => load_json(Path::new(&path))?,
        Err(_) => RiskTable::default(),
    };
    if let Some((instrument, _)) = table.iter().find(|(_, risk)| !risk.is_valid()) {
        return Err(ConfigError::invalid(format!(
            "invalid risk parameters for {instrument}"
        )));
    }
    Ok(table)
}

/// Reads `UNIVERSE_PATH` if set, the built-in universe otherwise.
pub fn load_universe() -> Result<Vec<SymbolConfig>, ConfigError> {
    match env::var("UNIVERSE_PATH") {
        Ok(path) => load_json(Path::new(&path)),
        Err(_) => Ok(default_universe()),
    }
}
