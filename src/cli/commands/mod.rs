//! Command implementations for the CLI

pub mod inspect;
pub mod solve;
pub mod train;
