//! Configuration types for solver creation.

use crate::q_learning::QTable;

/// Configuration for creating a solver.
///
/// # Examples
///
/// ```
/// use maze_explorer::app::SolverConfig;
///
/// let config = SolverConfig::new().with_q_init(0.5);
/// assert_eq!(config.q_init, 0.5);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SolverConfig {
    /// Value every action of an unvisited cell reads as
    pub q_init: f64,
    /// Previously trained table to continue from. Its own `q_init` wins.
    pub warm_start: Option<QTable>,
}

impl SolverConfig {
    /// Create a configuration for an untrained solver with zeroed values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the initial action value for unvisited cells.
    pub fn with_q_init(mut self, q_init: f64) -> Self {
        self.q_init = q_init;
        self
    }

    /// Start from an existing Q-table instead of an empty one.
    pub fn with_warm_start(mut self, q_table: QTable) -> Self {
        self.warm_start = Some(q_table);
        self
    }

    pub(crate) fn into_q_table(self) -> QTable {
        self.warm_start
            .unwrap_or_else(|| QTable::new(self.q_init))
    }
}
