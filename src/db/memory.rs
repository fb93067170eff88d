//! In-memory signal store

use crate::db::store::{InsertOutcome, SignalStore};
use crate::error::StoreError;
use crate::models::signal::{SignalKey, SignalRecord, SignalStatus};
use async_trait::async_trait;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemorySignalStore {
    records: RwLock<Vec<SignalRecord>>,
}

impl InMemorySignalStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn records(&self) -> Vec<SignalRecord> {
        self.records.read().await.clone()
    }

    pub async fn active_count(&self) -> usize {
        self.records
            .read()
            .await
            .iter()
            .filter(|r| r.status == SignalStatus::Active)
            .count()
    }
}

fn is_active_for(record: &SignalRecord, key: &SignalKey) -> bool {
    record.status == SignalStatus::Active
        && record.symbol == key.symbol
        && record.timeframe == key.timeframe
        && record.direction == key.direction
}

#[async_trait]
impl SignalStore for InMemorySignalStore {
    async fn has_active_signal(&self, key: &SignalKey) -> Result<bool, StoreError> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .any(|r| is_active_for(r, key)))
    }

    async fn insert_if_absent(&self, record: &SignalRecord) -> Result<InsertOutcome, StoreError> {
        // check and insert under one write lock
        let mut records = self.records.write().await;
        let key = record.key();
        if records.iter().any(|r| is_active_for(r, &key)) {
            return Ok(InsertOutcome::Duplicate);
        }
        records.push(record.clone());
        Ok(InsertOutcome::Inserted)
    }

    async fn close_signal(&self, key: &SignalKey) -> Result<bool, StoreError> {
        let mut records = self.records.write().await;
        match records.iter_mut().find(|r| is_active_for(r, key)) {
            Some(record) => {
                record.status = SignalStatus::Closed;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
