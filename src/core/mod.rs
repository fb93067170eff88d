//! Core application primitives: orchestrator, scheduler, HTTP surface

pub mod http;
pub mod runtime;
pub mod scheduler;

pub use http::{create_router, start_server, AppState};
pub use runtime::{RunReport, RuntimeConfig, SignalRuntime};
pub use scheduler::JobScheduler;
