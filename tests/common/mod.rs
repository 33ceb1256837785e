//! Shared helpers for the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use maze_explorer::{
    maze::{GridAgent, Maze, Solver},
    pipeline::TrainingConfig,
};

/// Straight corridor, start on the left, goal on the right
pub const CORRIDOR: &str = "S...G";

/// Goal sealed off by a wall
pub const UNREACHABLE: &str = "S.#G";

/// Small maze with a detour around a wall block
pub const DETOUR: &str = "\
S..
.#.
..G";

pub fn setup(text: &str) -> (GridAgent, Solver) {
    let maze = Arc::new(Maze::parse(text).expect("test maze should parse"));
    (GridAgent::explorer(Arc::clone(&maze)), Solver::for_maze(maze))
}

pub fn config(episodes: usize, max_steps: usize, seed: u64) -> TrainingConfig {
    TrainingConfig {
        episodes,
        max_steps,
        seed: Some(seed),
        ..TrainingConfig::default()
    }
}
