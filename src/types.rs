//! Core value types shared across the crate: maze cells and movement actions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Number of discrete actions available to every agent.
pub const ACTION_COUNT: usize = 4;

/// A maze cell, used as the Q-table state key.
///
/// Rows grow downward and columns grow rightward, with `(0, 0)` at the
/// top-left corner of the maze text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Neighbour in the direction of `action`, or `None` when it would leave
    /// the non-negative quadrant.
    pub fn neighbour(self, action: Action) -> Option<Cell> {
        let (row, col) = match action {
            Action::Up => (self.row.checked_sub(1)?, self.col),
            Action::Down => (self.row.checked_add(1)?, self.col),
            Action::Left => (self.row, self.col.checked_sub(1)?),
            Action::Right => (self.row, self.col.checked_add(1)?),
        };
        Some(Cell::new(row, col))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// One of the four movement directions.
///
/// The learning core only ever sees the index in `0..4`; the direction
/// matters to the agent that executes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
}

impl Action {
    /// All actions in index order.
    pub const ALL: [Action; ACTION_COUNT] = [Action::Up, Action::Down, Action::Left, Action::Right];

    /// Index of this action in a Q-table row.
    pub const fn index(self) -> usize {
        match self {
            Action::Up => 0,
            Action::Down => 1,
            Action::Left => 2,
            Action::Right => 3,
        }
    }

    /// Convert a Q-table column back into an action.
    pub fn from_index(index: usize) -> Result<Self> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(Error::InvalidAction { index })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Up => "up",
            Action::Down => "down",
            Action::Left => "left",
            Action::Right => "right",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which of the two agents sharing the maze is acting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentRole {
    /// Random walker whose moves still update the shared Q-table
    Explorer,
    /// Epsilon-greedy learner that owns the Q-table
    Solver,
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentRole::Explorer => f.write_str("explorer"),
            AgentRole::Solver => f.write_str("solver"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_index_roundtrip() {
        for (index, action) in Action::ALL.iter().enumerate() {
            assert_eq!(action.index(), index);
            assert_eq!(Action::from_index(index).unwrap(), *action);
        }
    }

    #[test]
    fn test_action_index_out_of_range() {
        assert!(matches!(
            Action::from_index(4),
            Err(Error::InvalidAction { index: 4 })
        ));
    }

    #[test]
    fn test_neighbour_at_origin() {
        let origin = Cell::new(0, 0);
        assert_eq!(origin.neighbour(Action::Up), None);
        assert_eq!(origin.neighbour(Action::Left), None);
        assert_eq!(origin.neighbour(Action::Down), Some(Cell::new(1, 0)));
        assert_eq!(origin.neighbour(Action::Right), Some(Cell::new(0, 1)));
    }
}
