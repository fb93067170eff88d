//! Market data provider interface and an in-memory implementation.

use crate::error::MarketDataError;
use crate::models::indicators::Bar;
use crate::models::instrument::Timeframe;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Most recent bars for a symbol, oldest first.
    ///
    /// `Ok(None)` means the provider has no usable data for the pair (unknown
    /// symbol, or fewer than `min_bars` bars); callers skip it.
    async fn get_bars(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        min_bars: usize,
    ) -> Result<Option<Vec<Bar>>, MarketDataError>;
}

/// Bars held in memory, keyed by (symbol, timeframe)
#[derive(Default)]
pub struct InMemoryMarketDataProvider {
    bars: RwLock<HashMap<(String, Timeframe), Vec<Bar>>>,
}

impl InMemoryMarketDataProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the series for a pair. Bars must be oldest first.
    pub async fn set_bars(&self, symbol: &str, timeframe: Timeframe, bars: Vec<Bar>) {
        self.bars
            .write()
            .await
            .insert((symbol.to_string(), timeframe), bars);
    }
}

#[async_trait]
impl MarketDataProvider for InMemoryMarketDataProvider {
    async fn get_bars(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        min_bars: usize,
    ) -> Result<Option<Vec<Bar>>, MarketDataError> {
        let bars = self.bars.read().await;
        match bars.get(&(symbol.to_string(), timeframe)) {
            Some(series) if series.len() >= min_bars => Ok(Some(series.clone())),
            _ => Ok(None),
        }
    }
}
