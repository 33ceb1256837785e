//! Reward assignment for a single agent move

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, Result, ports::MazeAgent};

/// What a move achieved, judged from the agent's state after the move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepOutcome {
    /// The agent stands on its goal
    Goal,
    /// The move had no effect (off the grid or into a wall)
    OffGrid,
    /// An ordinary move to a different cell
    Moved,
}

impl StepOutcome {
    /// Classify the agent's last move.
    ///
    /// The checks run in priority order: reaching the goal wins over an
    /// unchanged state, so an agent bumping a wall while already on the goal
    /// still scores the goal.
    pub fn of<A: MazeAgent + ?Sized>(agent: &A) -> Self {
        if agent.current_state() == agent.goal_state() {
            StepOutcome::Goal
        } else if agent.current_state() == agent.previous_state() {
            StepOutcome::OffGrid
        } else {
            StepOutcome::Moved
        }
    }

    pub fn is_goal(self) -> bool {
        self == StepOutcome::Goal
    }
}

/// The three reward constants used during training.
///
/// Parsed from and displayed as `move,offgrid,goal`, e.g. `-1,-5,10`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardSchedule {
    /// Reward for an ordinary move
    pub move_penalty: f64,
    /// Reward for a move that left the agent in place
    pub offgrid_penalty: f64,
    /// Reward for reaching the goal
    pub goal_reward: f64,
}

impl RewardSchedule {
    pub fn new(move_penalty: f64, offgrid_penalty: f64, goal_reward: f64) -> Self {
        Self {
            move_penalty,
            offgrid_penalty,
            goal_reward,
        }
    }

    /// Reward for an outcome
    pub fn reward(&self, outcome: StepOutcome) -> f64 {
        match outcome {
            StepOutcome::Goal => self.goal_reward,
            StepOutcome::OffGrid => self.offgrid_penalty,
            StepOutcome::Moved => self.move_penalty,
        }
    }

    /// Classify the agent's last move and return it with its reward.
    pub fn assess<A: MazeAgent + ?Sized>(&self, agent: &A) -> (StepOutcome, f64) {
        let outcome = StepOutcome::of(agent);
        (outcome, self.reward(outcome))
    }

    /// Check that all values are finite and the goal reward is strictly the
    /// largest, so a goal reward can never be confused with a penalty.
    pub fn validate(&self) -> Result<()> {
        let values = [self.move_penalty, self.offgrid_penalty, self.goal_reward];
        if values.iter().any(|value| !value.is_finite()) {
            return Err(Error::config(format!("rewards must be finite, got {self}")));
        }
        if self.goal_reward <= self.move_penalty || self.goal_reward <= self.offgrid_penalty {
            return Err(Error::config(format!(
                "goal reward must be strictly larger than both penalties, got {self}"
            )));
        }
        Ok(())
    }
}

impl Default for RewardSchedule {
    fn default() -> Self {
        Self::new(-1.0, -5.0, 10.0)
    }
}

impl fmt::Display for RewardSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{}",
            self.move_penalty, self.offgrid_penalty, self.goal_reward
        )
    }
}

impl FromStr for RewardSchedule {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        let [move_penalty, offgrid_penalty, goal_reward] = parts.as_slice() else {
            return Err(Error::config(format!(
                "reward schedule '{s}' must have three comma-separated values (move,offgrid,goal)"
            )));
        };

        let parse = |name: &str, raw: &str| {
            raw.parse::<f64>()
                .map_err(|e| Error::config(format!("invalid {name} reward '{raw}': {e}")))
        };

        Ok(Self::new(
            parse("move", move_penalty)?,
            parse("offgrid", offgrid_penalty)?,
            parse("goal", goal_reward)?,
        ))
    }
}
