//! MessagePack implementation of the Q-table repository.
//!
//! This adapter implements the QTableRepository port using rmp_serde for
//! compact binary serialization.

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::Path,
};

use crate::{Result, error::Error, ports::QTableRepository, q_learning::SavedSolver};

/// MessagePack-based solver repository.
///
/// Stores a [`SavedSolver`] (Q-table plus training metadata) as a single
/// MessagePack file.
///
/// # Examples
///
/// ```no_run
/// use maze_explorer::adapters::MsgPackRepository;
/// use maze_explorer::ports::QTableRepository;
/// use maze_explorer::q_learning::{QTable, SavedSolver, TrainingMetadata};
/// use std::path::Path;
///
/// let repo = MsgPackRepository;
/// let saved = SavedSolver::new(QTable::default(), TrainingMetadata::default());
///
/// repo.save(&saved, Path::new("q_table.msgpack"))?;
/// let loaded = repo.load(Path::new("q_table.msgpack"))?;
/// # Ok::<(), maze_explorer::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgPackRepository;

impl MsgPackRepository {
    /// Create a new MessagePack repository.
    pub fn new() -> Self {
        Self
    }
}

impl QTableRepository for MsgPackRepository {
    fn save(&self, saved: &SavedSolver, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create file {path:?}"),
            source,
        })?;
        let mut writer = BufWriter::new(file);

        rmp_serde::encode::write(&mut writer, saved).map_err(|e| {
            Error::SerializationContext {
                operation: "serialize solver to MessagePack".to_string(),
                message: e.to_string(),
            }
        })?;

        writer.flush().map_err(|source| Error::Io {
            operation: format!("flush file {path:?}"),
            source,
        })
    }

    fn load(&self, path: &Path) -> Result<SavedSolver> {
        let bytes = fs::read(path).map_err(|source| Error::Io {
            operation: format!("read file {path:?}"),
            source,
        })?;

        SavedSolver::from_msgpack(&bytes)
    }
}
