//! Technical indicators over oldest-first bar sequences.
//!
//! `*_series` functions return the full end-aligned output; `calculate_*`
//! functions return the latest value. Both return `None` when the input is
//! shorter than the indicator's warm-up.

pub mod momentum;
pub mod structure;
pub mod trend;
pub mod volatility;
pub mod volume;
