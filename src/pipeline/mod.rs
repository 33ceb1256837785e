//! Training pipeline
//!
//! This module provides:
//! - The episode driver (one bounded attempt at the goal)
//! - The training loop with its epsilon schedule
//! - Observers for progress, metrics and exports
//! - Greedy rollouts of a trained solver

pub mod episode;
pub mod observers;
pub mod schedule;
pub mod solve;
pub mod training;

pub use episode::{EpisodeDriver, EpisodeResult, EpisodeState, StepRecord};
// Re-export observer implementations (adapters)
pub use observers::{
    CellValue, EpisodeObservation, JsonlObserver, MetricsObserver, MetricsSummary,
    ProgressLogObserver, ProgressObserver, QTableSnapshot, QTableSnapshotObserver, SharedObserver,
};
pub use schedule::{EPSILON_DECIMALS, EpsilonSchedule, round_to};
pub use solve::{SolvePath, solve};
pub use training::{FirstSolve, TrainingConfig, TrainingPipeline, TrainingResult};

pub use crate::ports::Observer;
