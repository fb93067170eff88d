//! Signal evaluation: snapshot, regime, scoring and candidate construction.

pub mod candidate;
pub mod engine;
pub mod regime;
pub mod scoring;
pub mod snapshot;

pub use candidate::{build_candidate, tier_for, Rejection};
pub use engine::{Evaluation, EvaluationError, SignalEngine};
pub use regime::classify;
pub use scoring::{pick_direction, score_both, score_direction, total_score, DirectionalScores};
pub use snapshot::{build_snapshot, SnapshotError, MIN_BARS};
