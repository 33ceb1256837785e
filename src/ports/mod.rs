//! Ports (trait boundaries) for external collaborators.
//!
//! The training core talks to agents, observers and persistence only through
//! these traits. Concrete implementations live in `maze`, `pipeline::observers`
//! and `adapters`.

pub mod agent;
pub mod observer;
pub mod repository;

pub use agent::MazeAgent;
pub use observer::Observer;
pub use repository::QTableRepository;
