//! Tabular Q-learning
//!
//! This module holds the learning core shared by both agents in the maze:
//!
//! - [`QTable`]: four action-values per visited cell
//! - [`RewardSchedule`]: move / off-grid / goal rewards and outcome classification
//! - [`UpdateRule`]: the Bellman update with a goal short-circuit
//! - [`policy`]: random and ε-greedy action selection
//! - [`SavedSolver`]: versioned persistence of a trained table
//!
//! ## Usage Example
//!
//! ```
//! use maze_explorer::q_learning::{QTable, RewardSchedule, StepOutcome, Transition, UpdateRule};
//! use maze_explorer::types::{Action, Cell};
//!
//! let rewards = RewardSchedule::new(-1.0, -5.0, 10.0);
//! let rule = UpdateRule::new(1.0, 0.0);
//! let mut table = QTable::default();
//!
//! let new_q = rule.apply(
//!     &mut table,
//!     &Transition {
//!         previous: Cell::new(0, 0),
//!         action: Action::Right,
//!         current: Cell::new(0, 1),
//!         reward: rewards.reward(StepOutcome::Moved),
//!         outcome: StepOutcome::Moved,
//!     },
//! );
//! assert_eq!(new_q, -1.0);
//! ```

pub mod policy;
pub mod q_table;
pub mod reward;
pub mod serialization;
pub mod update;

// Public re-exports
pub use q_table::{QRow, QTable};
pub use reward::{RewardSchedule, StepOutcome};
pub use serialization::{SavedSolver, TrainingMetadata};
pub use update::{Transition, UpdateRule};
