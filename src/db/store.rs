//! Signal persistence contract

use crate::error::StoreError;
use crate::models::signal::{SignalKey, SignalRecord};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsertOutcome {
    Inserted,
    /// An active signal with the same key already existed; nothing was written.
    Duplicate,
}

#[async_trait]
pub trait SignalStore: Send + Sync {
    async fn has_active_signal(&self, key: &SignalKey) -> Result<bool, StoreError>;

    /// Insert unless an active signal with the same key exists. Must be atomic
    /// with respect to concurrent callers.
    async fn insert_if_absent(&self, record: &SignalRecord) -> Result<InsertOutcome, StoreError>;

    /// Mark the active signal for `key` closed, freeing the key. Returns
    /// whether an active signal was found.
    async fn close_signal(&self, key: &SignalKey) -> Result<bool, StoreError>;

    /// Whether the store can currently serve reads and writes
    async fn is_available(&self) -> bool {
        true
    }
}
