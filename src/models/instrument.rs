//! Instrument classes, risk parameters and the symbol universe

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Instrument class used to pick risk parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstrumentType {
    Forex,
    Index,
    Stock,
    Crypto,
    Commodity,
    Metal,
}

impl InstrumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstrumentType::Forex => "forex",
            InstrumentType::Index => "index",
            InstrumentType::Stock => "stock",
            InstrumentType::Crypto => "crypto",
            InstrumentType::Commodity => "commodity",
            InstrumentType::Metal => "metal",
        }
    }

    pub fn all() -> [InstrumentType; 6] {
        [
            InstrumentType::Forex,
            InstrumentType::Index,
            InstrumentType::Stock,
            InstrumentType::Crypto,
            InstrumentType::Commodity,
            InstrumentType::Metal,
        ]
    }
}

impl fmt::Display for InstrumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stop distance and reward multiple for one instrument class
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Stop distance in ATRs.
    pub atr_multiple: f64,
    /// Target distance in units of stop distance. Also the candidate's RR.
    pub reward_multiple: f64,
    /// Optional second target, in units of stop distance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extended_reward_multiple: Option<f64>,
}

impl RiskConfig {
    pub const fn new(atr_multiple: f64, reward_multiple: f64) -> Self {
        Self {
            atr_multiple,
            reward_multiple,
            extended_reward_multiple: None,
        }
    }

    pub fn with_extended_target(mut self, reward_multiple: f64) -> Self {
        self.extended_reward_multiple = Some(reward_multiple);
        self
    }

    pub fn is_valid(&self) -> bool {
        self.atr_multiple.is_finite()
            && self.atr_multiple > 0.0
            && self.reward_multiple.is_finite()
            && self.reward_multiple > 0.0
            && self
                .extended_reward_multiple
                .map_or(true, |m| m.is_finite() && m > self.reward_multiple)
    }
}

/// Used for instruments the table does not map.
pub const DEFAULT_RISK: RiskConfig = RiskConfig::new(2.0, 2.0);

/// Immutable instrument-class → risk parameter table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RiskTable {
    entries: BTreeMap<InstrumentType, RiskConfig>,
}

impl RiskTable {
    pub fn new(entries: BTreeMap<InstrumentType, RiskConfig>) -> Self {
        Self { entries }
    }

    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn with(mut self, instrument: InstrumentType, risk: RiskConfig) -> Self {
        self.entries.insert(instrument, risk);
        self
    }

    /// Risk parameters for `instrument`, falling back to [`DEFAULT_RISK`].
    pub fn get(&self, instrument: InstrumentType) -> RiskConfig {
        self.entries.get(&instrument).copied().unwrap_or(DEFAULT_RISK)
    }

    pub fn is_mapped(&self, instrument: InstrumentType) -> bool {
        self.entries.contains_key(&instrument)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&InstrumentType, &RiskConfig)> {
        self.entries.iter()
    }
}

impl Default for RiskTable {
    fn default() -> Self {
        Self::empty()
            .with(InstrumentType::Forex, RiskConfig::new(1.5, 2.0))
            .with(InstrumentType::Index, RiskConfig::new(1.5, 2.0))
            .with(InstrumentType::Stock, RiskConfig::new(2.0, 2.0))
            .with(InstrumentType::Crypto, RiskConfig::new(2.5, 2.0))
            .with(InstrumentType::Commodity, RiskConfig::new(2.0, 2.0))
            .with(InstrumentType::Metal, RiskConfig::new(2.0, 2.0))
    }
}

/// Bar interval a symbol is evaluated on
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "15m")]
    M15,
    #[serde(rename = "1h")]
    H1,
    #[serde(rename = "4h")]
    H4,
    #[serde(rename = "1d")]
    D1,
}

impl Timeframe {
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::M15 => "15m",
            Timeframe::H1 => "1h",
            Timeframe::H4 => "4h",
            Timeframe::D1 => "1d",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "15m" | "m15" => Ok(Timeframe::M15),
            "1h" | "h1" => Ok(Timeframe::H1),
            "4h" | "h4" => Ok(Timeframe::H4),
            "1d" | "d1" => Ok(Timeframe::D1),
            other => Err(format!("unknown timeframe: {}", other)),
        }
    }
}

/// One tradeable symbol and the timeframes enabled for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolConfig {
    pub symbol: String,
    pub instrument: InstrumentType,
    pub timeframes: Vec<Timeframe>,
}

impl SymbolConfig {
    pub fn new(symbol: impl Into<String>, instrument: InstrumentType, timeframes: &[Timeframe]) -> Self {
        Self {
            symbol: symbol.into(),
            instrument,
            timeframes: timeframes.to_vec(),
        }
    }
}

/// The default evaluation universe.
pub fn default_universe() -> Vec<SymbolConfig> {
    use InstrumentType::*;
    use Timeframe::*;

    vec![
        SymbolConfig::new("EURUSD", Forex, &[H1, H4]),
        SymbolConfig::new("GBPUSD", Forex, &[H1, H4]),
        SymbolConfig::new("USDJPY", Forex, &[H1, H4]),
        SymbolConfig::new("US500", Index, &[H1, H4, D1]),
        SymbolConfig::new("NAS100", Index, &[H1, H4, D1]),
        SymbolConfig::new("AAPL", Stock, &[H4, D1]),
        SymbolConfig::new("BTCUSD", Crypto, &[M15, H1, H4]),
        SymbolConfig::new("ETHUSD", Crypto, &[H1, H4]),
        SymbolConfig::new("USOIL", Commodity, &[H1, H4]),
        SymbolConfig::new("XAUUSD", Metal, &[H1, H4, D1]),
    ]
}
