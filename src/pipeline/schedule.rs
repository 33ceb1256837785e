//! Exploration-rate schedule

use serde::{Deserialize, Serialize};

/// Decimal places kept after every epsilon decay
pub const EPSILON_DECIMALS: i32 = 5;

/// Round `value` to `decimals` places.
///
/// Keeps long runs of multiplicative decay from accumulating float noise in
/// the printed and stored epsilon values.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// Multiplicative epsilon decay applied once per episode.
///
/// # Examples
///
/// ```
/// use maze_explorer::pipeline::EpsilonSchedule;
///
/// let mut schedule = EpsilonSchedule::new(1.0, 0.9);
/// let decayed: Vec<f64> = (0..3).map(|_| schedule.decay()).collect();
/// assert_eq!(decayed, vec![0.9, 0.81, 0.729]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpsilonSchedule {
    epsilon: f64,
    decay: f64,
}

impl EpsilonSchedule {
    pub fn new(initial: f64, decay: f64) -> Self {
        Self {
            epsilon: initial,
            decay,
        }
    }

    /// Exploration rate for the current episode
    pub fn current(&self) -> f64 {
        self.epsilon
    }

    /// Apply one episode's decay and return the new rate.
    pub fn decay(&mut self) -> f64 {
        self.epsilon = round_to(self.epsilon * self.decay, EPSILON_DECIMALS);
        self.epsilon
    }
}
