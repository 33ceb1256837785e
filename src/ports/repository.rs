//! Repository port for Q-table persistence.
//!
//! This module defines the trait boundary between the learning core and the
//! storage used for trained solvers.

use std::path::Path;

use crate::{Result, q_learning::SavedSolver};

/// Port for persisting and loading trained solvers.
///
/// This trait abstracts the storage mechanism, allowing different implementations
/// (MessagePack, in-memory, etc.) without coupling the training code to a
/// specific serialization format.
///
/// # Examples
///
/// ```no_run
/// use maze_explorer::ports::QTableRepository;
/// use maze_explorer::q_learning::SavedSolver;
/// use std::path::Path;
///
/// fn save_solver<R: QTableRepository>(
///     repo: &R,
///     saved: &SavedSolver,
///     path: &Path,
/// ) -> maze_explorer::Result<()> {
///     repo.save(saved, path)
/// }
/// ```
pub trait QTableRepository {
    /// Save a trained solver to persistent storage.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The path cannot be created or written to
    /// - Serialization fails
    fn save(&self, saved: &SavedSolver, path: &Path) -> Result<()>;

    /// Load a trained solver from persistent storage.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file does not exist or cannot be read
    /// - The file format is invalid, corrupted, or an unsupported version
    fn load(&self, path: &Path) -> Result<SavedSolver>;
}
