//! Market structure: rolling extremes

pub mod levels;

pub use levels::*;
