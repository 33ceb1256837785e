//! CLI infrastructure for the maze explorer
//!
//! This module provides the command-line interface for training solvers,
//! replaying their greedy policy and inspecting saved Q-tables.

pub mod commands;
pub mod config;
pub mod output;
