//! Serialization support for trained solvers.

use serde::{Deserialize, Serialize};

use super::{q_table::QTable, reward::RewardSchedule};
use crate::{Error, Result};

/// Metadata about the training process
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetadata {
    /// Number of episodes trained
    pub episodes_trained: Option<usize>,
    /// Step budget per episode
    pub max_steps: Option<usize>,
    pub learning_rate: Option<f64>,
    pub discount: Option<f64>,
    /// Reward constants used during training
    pub rewards: Option<RewardSchedule>,
    /// Random seed used (if any)
    pub seed: Option<u64>,
    /// Episodes in which the solver reached the goal
    pub solved_count: Option<usize>,
    /// Exploration rate after the last episode
    pub final_epsilon: Option<f64>,
    /// Maze file the table was trained on
    pub maze: Option<String>,
}

/// A trained Q-table together with how it was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedSolver {
    pub version: u32,
    pub q_table: QTable,
    pub metadata: TrainingMetadata,
}

impl SavedSolver {
    /// Current save format version
    pub const VERSION: u32 = 1;

    pub fn new(q_table: QTable, metadata: TrainingMetadata) -> Self {
        Self {
            version: Self::VERSION,
            q_table,
            metadata,
        }
    }

    /// Reject files written by an incompatible version.
    pub fn check_version(&self) -> Result<()> {
        if self.version != Self::VERSION {
            return Err(Error::SerializationContext {
                operation: "load saved solver".to_string(),
                message: format!(
                    "unsupported save format version {} (expected {})",
                    self.version,
                    Self::VERSION
                ),
            });
        }
        Ok(())
    }

    /// Encode as MessagePack
    pub fn to_msgpack(&self) -> Result<Vec<u8>> {
        rmp_serde::to_vec(self).map_err(|e| Error::SerializationContext {
            operation: "serialize solver to MessagePack".to_string(),
            message: e.to_string(),
        })
    }

    /// Decode from MessagePack and check the format version
    pub fn from_msgpack(bytes: &[u8]) -> Result<Self> {
        let saved: Self = rmp_serde::from_slice(bytes).map_err(|e| Error::SerializationContext {
            operation: "deserialize solver from MessagePack".to_string(),
            message: e.to_string(),
        })?;
        saved.check_version()?;
        Ok(saved)
    }
}
