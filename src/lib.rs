//! Tabular Q-learning on grid mazes
//!
//! This crate provides:
//! - Maze parsing and grid agents
//! - A Q-table owned by the solver and shared with a random explorer
//! - The reward policy, update rule and epsilon-greedy action selection
//! - An episode driver and a training pipeline with pluggable observers
//! - Reporting, Q-table persistence and a command-line front end
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use maze_explorer::{
//!     maze::{GridAgent, Maze, Solver},
//!     pipeline::{TrainingConfig, TrainingPipeline, solve},
//! };
//!
//! let maze = Arc::new(Maze::parse("S..\n.#.\n..G")?);
//! let mut explorer = GridAgent::explorer(Arc::clone(&maze));
//! let mut solver = Solver::for_maze(maze);
//!
//! let config = TrainingConfig {
//!     episodes: 50,
//!     max_steps: 50,
//!     seed: Some(7),
//!     ..TrainingConfig::default()
//! };
//! let result = TrainingPipeline::new(config).run(&mut explorer, &mut solver)?;
//! assert_eq!(result.episodes, 50);
//!
//! let path = solve(&mut solver, 50);
//! assert_eq!(path.cells[0], maze_explorer::types::Cell::new(0, 0));
//! # Ok::<(), maze_explorer::Error>(())
//! ```

pub mod adapters;
pub mod app;
pub mod cli;
pub mod error;
pub mod maze;
pub mod pipeline;
pub mod ports;
pub mod q_learning;
pub mod report;
pub mod types;

pub use error::{Error, Result};
pub use maze::{GridAgent, Maze, Solver};
pub use pipeline::{TrainingConfig, TrainingPipeline, TrainingResult};
pub use q_learning::{QTable, RewardSchedule, UpdateRule};
pub use types::{Action, AgentRole, Cell};
