//! Signal storage: the store contract and its implementations.

pub mod memory;
pub mod postgres;
pub mod store;

pub use memory::InMemorySignalStore;
pub use postgres::PostgresDatabase;
pub use store::{InsertOutcome, SignalStore};
