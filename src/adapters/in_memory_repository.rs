//! In-memory solver repository for testing.
//!
//! This adapter provides a pure in-memory implementation of QTableRepository,
//! enabling fast tests without any file system I/O.

use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crate::{Result, error::Error, ports::QTableRepository, q_learning::SavedSolver};

/// In-memory repository for testing.
///
/// Keeps MessagePack-encoded solvers in a shared map keyed by path, so the
/// same encoding is exercised as on disk.
///
/// # Examples
///
/// ```
/// use maze_explorer::adapters::InMemoryRepository;
/// use maze_explorer::ports::QTableRepository;
/// use maze_explorer::q_learning::{QTable, SavedSolver, TrainingMetadata};
/// use std::path::Path;
///
/// let repo = InMemoryRepository::new();
/// let saved = SavedSolver::new(QTable::default(), TrainingMetadata::default());
///
/// repo.save(&saved, Path::new("trained"))?;
/// let loaded = repo.load(Path::new("trained"))?;
/// assert_eq!(loaded, saved);
/// # Ok::<(), maze_explorer::Error>(())
/// ```
///
/// # Thread Safety
///
/// Clones share the same underlying storage.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    storage: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl InMemoryRepository {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    // A panic while holding the lock can't leave the map half-written
    fn storage(&self) -> MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.storage.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn key(path: &Path) -> String {
        path.to_string_lossy().into_owned()
    }

    /// Get the number of solvers currently stored.
    pub fn count(&self) -> usize {
        self.storage().len()
    }

    /// Clear all stored solvers.
    pub fn clear(&self) {
        self.storage().clear();
    }

    /// Check if a solver exists at the given path.
    pub fn contains(&self, path: &Path) -> bool {
        self.storage().contains_key(&Self::key(path))
    }
}

impl QTableRepository for InMemoryRepository {
    fn save(&self, saved: &SavedSolver, path: &Path) -> Result<()> {
        let bytes = saved.to_msgpack()?;
        self.storage().insert(Self::key(path), bytes);
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<SavedSolver> {
        let storage = self.storage();
        let bytes = storage.get(&Self::key(path)).ok_or_else(|| Error::Io {
            operation: format!("load solver from in-memory storage at {path:?}"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "key not found in memory"),
        })?;

        SavedSolver::from_msgpack(bytes)
    }
}
