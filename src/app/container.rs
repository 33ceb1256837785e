//! Dependency injection container for the maze explorer.
//!
//! The container owns infrastructure dependencies and provides factory
//! methods for agents, solvers and training pipelines.

use std::{path::Path, sync::Arc};

use tracing::debug;

use super::config::SolverConfig;
use crate::{
    Result,
    adapters::MsgPackRepository,
    maze::{GridAgent, Maze, Solver},
    pipeline::{TrainingConfig, TrainingPipeline},
    ports::QTableRepository,
    q_learning::{SavedSolver, TrainingMetadata},
};

/// Application with dependency injection.
///
/// # Examples
///
/// ## Production usage
///
/// ```
/// use std::sync::Arc;
/// use maze_explorer::app::{App, SolverConfig};
/// use maze_explorer::maze::Maze;
///
/// let app = App::new();
/// let maze = Arc::new(Maze::parse("S..G")?);
/// let explorer = app.create_explorer(Arc::clone(&maze));
/// let solver = app.create_solver(maze, SolverConfig::new());
/// # Ok::<(), maze_explorer::Error>(())
/// ```
///
/// ## Testing with dependency injection
///
/// ```
/// use maze_explorer::app::App;
/// use maze_explorer::adapters::InMemoryRepository;
///
/// let app = App::for_testing()
///     .with_repository(InMemoryRepository::new())
///     .with_default_seed(42)
///     .build();
/// ```
pub struct App {
    /// Repository for trained solvers
    repository: Arc<dyn QTableRepository + Send + Sync>,
    /// Default random seed (None = non-deterministic)
    default_seed: Option<u64>,
}

impl App {
    /// Create a new app with production defaults.
    ///
    /// Uses:
    /// - `MsgPackRepository` for persistence
    /// - No default seed (non-deterministic RNG)
    pub fn new() -> Self {
        Self {
            repository: Arc::new(MsgPackRepository::new()),
            default_seed: None,
        }
    }

    /// Create a builder for constructing app with custom dependencies.
    pub fn for_testing() -> AppBuilder {
        AppBuilder::new()
    }

    /// Get the solver repository.
    pub fn repository(&self) -> Arc<dyn QTableRepository + Send + Sync> {
        Arc::clone(&self.repository)
    }

    pub fn default_seed(&self) -> Option<u64> {
        self.default_seed
    }

    /// Read and parse a maze file.
    pub fn load_maze(&self, path: &Path) -> Result<Arc<Maze>> {
        let maze = Maze::from_file(path)?;
        debug!(
            path = %path.display(),
            width = maze.width(),
            height = maze.height(),
            "maze loaded"
        );
        Ok(Arc::new(maze))
    }

    /// Create the random-walking explorer for `maze`.
    pub fn create_explorer(&self, maze: Arc<Maze>) -> GridAgent {
        GridAgent::explorer(maze)
    }

    /// Create a solver for `maze` owning a fresh or warm-started Q-table.
    pub fn create_solver(&self, maze: Arc<Maze>, config: SolverConfig) -> Solver {
        Solver::new(GridAgent::solver(maze), config.into_q_table())
    }

    /// Create a training pipeline.
    ///
    /// A seed in `config` takes precedence over the app's default seed.
    pub fn create_pipeline(&self, mut config: TrainingConfig) -> TrainingPipeline {
        config.seed = config.seed.or(self.default_seed);
        TrainingPipeline::new(config)
    }

    /// Persist the solver's Q-table together with its training metadata.
    pub fn save_solver(
        &self,
        solver: &Solver,
        metadata: TrainingMetadata,
        path: &Path,
    ) -> Result<()> {
        let saved = SavedSolver::new(solver.q_table().clone(), metadata);
        self.repository.save(&saved, path)
    }

    /// Load a saved Q-table and attach it to a solver for `maze`.
    pub fn load_solver(&self, maze: Arc<Maze>, path: &Path) -> Result<(Solver, TrainingMetadata)> {
        let saved = self.repository.load(path)?;
        let solver = self.create_solver(maze, SolverConfig::new().with_warm_start(saved.q_table));
        Ok((solver, saved.metadata))
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for constructing app with custom dependencies.
///
/// # Examples
///
/// ```
/// use maze_explorer::app::AppBuilder;
/// use maze_explorer::adapters::InMemoryRepository;
///
/// let app = AppBuilder::new()
///     .with_repository(InMemoryRepository::new())
///     .with_default_seed(42)
///     .build();
/// ```
#[derive(Default)]
pub struct AppBuilder {
    repository: Option<Arc<dyn QTableRepository + Send + Sync>>,
    default_seed: Option<u64>,
}

impl AppBuilder {
    /// Create a new app builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom solver repository.
    pub fn with_repository<R: QTableRepository + Send + Sync + 'static>(mut self, repo: R) -> Self {
        self.repository = Some(Arc::new(repo));
        self
    }

    /// Set a default random seed for pipelines created by this app.
    pub fn with_default_seed(mut self, seed: u64) -> Self {
        self.default_seed = Some(seed);
        self
    }

    /// Build the app with the configured dependencies.
    ///
    /// If no repository was specified, uses `MsgPackRepository` by default.
    pub fn build(self) -> App {
        App {
            repository: self
                .repository
                .unwrap_or_else(|| Arc::new(MsgPackRepository::new())),
            default_seed: self.default_seed,
        }
    }
}
