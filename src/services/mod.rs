//! External collaborators the orchestrator reads from.

pub mod market_data;

pub use market_data::{InMemoryMarketDataProvider, MarketDataProvider};
