//! PostgreSQL reader for candles and store for signals

use crate::db::store::{InsertOutcome, SignalStore};
use crate::error::{MarketDataError, StoreError};
use crate::models::indicators::Bar;
use crate::models::instrument::Timeframe;
use crate::models::signal::{SignalKey, SignalRecord, SignalStatus};
use crate::services::market_data::MarketDataProvider;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_postgres::{Client, NoTls};

/// Bars fetched per pair when the caller asks for fewer.
pub const HISTORY_BARS: usize = 500;

pub struct PostgresDatabase {
    client: Arc<RwLock<Option<Client>>>,
}

impl PostgresDatabase {
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let (client, connection) = tokio_postgres::connect(database_url, NoTls)
            .await
            .map_err(|e| StoreError::Connection(format!("Failed to connect to PostgreSQL: {}", e)))?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!(error = %e, "PostgreSQL connection error");
            }
        });

        let db = Self {
            client: Arc::new(RwLock::new(Some(client))),
        };

        db.init_schema().await?;

        Ok(db)
    }

    async fn init_schema(&self) -> Result<(), StoreError> {
        let client = self.client.read().await;
        let c = client
            .as_ref()
            .ok_or_else(|| StoreError::Connection("Database connection not available".into()))?;

        // Filled by an external ingester; created here so reads never fail on a fresh database
        c.batch_execute(
            "CREATE TABLE IF NOT EXISTS candles (
                timestamp TIMESTAMPTZ NOT NULL,
                symbol TEXT NOT NULL,
                timeframe TEXT NOT NULL,
                open DOUBLE PRECISION NOT NULL,
                high DOUBLE PRECISION NOT NULL,
                low DOUBLE PRECISION NOT NULL,
                close DOUBLE PRECISION NOT NULL,
                volume DOUBLE PRECISION NOT NULL,
                PRIMARY KEY (symbol, timeframe, timestamp)
            );

            CREATE TABLE IF NOT EXISTS signals (
                id BIGSERIAL PRIMARY KEY,
                symbol TEXT NOT NULL,
                timeframe TEXT NOT NULL,
                direction TEXT NOT NULL,
                entry DOUBLE PRECISION NOT NULL,
                stop DOUBLE PRECISION NOT NULL,
                targets DOUBLE PRECISION[] NOT NULL,
                score SMALLINT NOT NULL,
                tier TEXT NOT NULL,
                regime TEXT NOT NULL,
                risk_reward DOUBLE PRECISION NOT NULL,
                explanation TEXT NOT NULL,
                engine_version TEXT NOT NULL,
                status TEXT NOT NULL,
                activated_at TIMESTAMPTZ NOT NULL
            );

            CREATE UNIQUE INDEX IF NOT EXISTS signals_one_active
                ON signals (symbol, timeframe, direction)
                WHERE status = 'active';",
        )
        .await
        .map_err(|e| StoreError::Query(format!("Failed to create schema: {}", e)))?;

        Ok(())
    }
}

fn market_data_error(e: tokio_postgres::Error) -> MarketDataError {
    if e.is_closed() {
        MarketDataError::Transient(e.to_string())
    } else {
        MarketDataError::Unavailable(e.to_string())
    }
}

#[async_trait]
impl MarketDataProvider for PostgresDatabase {
    async fn get_bars(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        min_bars: usize,
    ) -> Result<Option<Vec<Bar>>, MarketDataError> {
        let client = self.client.read().await;
        let c = client
            .as_ref()
            .ok_or_else(|| MarketDataError::Transient("Database connection not available".into()))?;

        let limit = min_bars.max(HISTORY_BARS) as i64;
        let rows = c
            .query(
                "SELECT timestamp, open, high, low, close, volume
                 FROM candles
                 WHERE symbol = $1 AND timeframe = $2
                 ORDER BY timestamp DESC
                 LIMIT $3",
                &[&symbol, &timeframe.as_str(), &limit],
            )
            .await
            .map_err(market_data_error)?;

        if rows.len() < min_bars {
            tracing::debug!(
                symbol = %symbol,
                timeframe = %timeframe,
                available = rows.len(),
                required = min_bars,
                "Not enough stored bars"
            );
            return Ok(None);
        }

        let mut bars = Vec::with_capacity(rows.len());
        for row in rows {
            let timestamp: DateTime<Utc> = row.get(0);
            let bar = Bar::new(
                row.get(1),
                row.get(2),
                row.get(3),
                row.get(4),
                row.get(5),
                timestamp,
            );
            if !bar.is_well_formed() {
                return Err(MarketDataError::Malformed {
                    symbol: symbol.to_string(),
                    reason: format!("bar at {} is not well formed", timestamp),
                });
            }
            bars.push(bar);
        }

        // Reverse to get oldest first
        bars.reverse();

        Ok(Some(bars))
    }
}

#[async_trait]
impl SignalStore for PostgresDatabase {
    async fn has_active_signal(&self, key: &SignalKey) -> Result<bool, StoreError> {
        let client = self.client.read().await;
        let c = client
            .as_ref()
            .ok_or_else(|| StoreError::Connection("Database connection not available".into()))?;

        let row = c
            .query_opt(
                "SELECT 1 FROM signals
                 WHERE symbol = $1 AND timeframe = $2 AND direction = $3 AND status = 'active'
                 LIMIT 1",
                &[&key.symbol, &key.timeframe.as_str(), &key.direction.as_str()],
            )
            .await?;

        Ok(row.is_some())
    }

    async fn insert_if_absent(&self, record: &SignalRecord) -> Result<InsertOutcome, StoreError> {
        let client = self.client.read().await;
        let c = client
            .as_ref()
            .ok_or_else(|| StoreError::Connection("Database connection not available".into()))?;

        let score = i16::from(record.score);
        let rows = c
            .execute(
                "INSERT INTO signals (symbol, timeframe, direction, entry, stop, targets, score,
                                      tier, regime, risk_reward, explanation, engine_version,
                                      status, activated_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
                 ON CONFLICT (symbol, timeframe, direction) WHERE status = 'active' DO NOTHING",
                &[
                    &record.symbol,
                    &record.timeframe.as_str(),
                    &record.direction.as_str(),
                    &record.entry,
                    &record.stop,
                    &record.targets,
                    &score,
                    &record.tier.as_str(),
                    &record.regime.as_str(),
                    &record.risk_reward,
                    &record.explanation,
                    &record.engine_version,
                    &record.status.as_str(),
                    &record.activated_at,
                ],
            )
            .await?;

        if rows == 0 {
            Ok(InsertOutcome::Duplicate)
        } else {
            Ok(InsertOutcome::Inserted)
        }
    }

    async fn close_signal(&self, key: &SignalKey) -> Result<bool, StoreError> {
        let client = self.client.read().await;
        let c = client
            .as_ref()
            .ok_or_else(|| StoreError::Connection("Database connection not available".into()))?;

        let rows = c
            .execute(
                "UPDATE signals SET status = $4
                 WHERE symbol = $1 AND timeframe = $2 AND direction = $3 AND status = 'active'",
                &[
                    &key.symbol,
                    &key.timeframe.as_str(),
                    &key.direction.as_str(),
                    &SignalStatus::Closed.as_str(),
                ],
            )
            .await?;

        Ok(rows > 0)
    }

    /// False once the connection task has exited
    async fn is_available(&self) -> bool {
        match self.client.read().await.as_ref() {
            Some(c) => !c.is_closed(),
            None => false,
        }
    }
}
