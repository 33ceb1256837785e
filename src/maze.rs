//! Maze environment: the grid the agents walk and the agents themselves

pub mod agent;
pub mod grid;

pub use agent::{GridAgent, Solver};
pub use grid::{Maze, Tile};
