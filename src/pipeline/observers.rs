//! Observer implementations for training pipelines
//!
//! Observers allow composable data collection during training without coupling
//! the training loop to specific output formats.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{
    episode::{EpisodeResult, EpisodeState, StepRecord},
    training::TrainingResult,
};
use crate::{
    Result,
    ports::Observer,
    q_learning::{QTable, StepOutcome},
    types::{Action, AgentRole, Cell},
};

/// Progress bar observer - Shows training progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    solved: usize,
    epsilon: f64,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            solved: 0,
            epsilon: 0.0,
        }
    }

    fn message(&self) -> String {
        format!("solved:{} eps:{:.5}", self.solved, self.epsilon)
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_episodes: usize, initial_epsilon: f64) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes ({msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.epsilon = initial_epsilon;
        pb.set_message(self.message());
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_episode_start(&mut self, _episode: usize, epsilon: f64) -> Result<()> {
        self.epsilon = epsilon;
        Ok(())
    }

    fn on_episode_end(&mut self, episode: usize, result: &EpisodeResult) -> Result<()> {
        if result.solved {
            self.solved += 1;
        }
        if let Some(pb) = &self.progress_bar {
            pb.set_position(episode as u64 + 1);
            pb.set_message(self.message());
        }
        Ok(())
    }

    fn on_training_end(&mut self, result: &TrainingResult) -> Result<()> {
        self.epsilon = result.final_epsilon;
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

/// Progress log observer - Emits a log line every `interval` episodes
pub struct ProgressLogObserver {
    interval: usize,
    total_episodes: usize,
    epsilon: f64,
    solved: usize,
}

impl ProgressLogObserver {
    /// Create a new progress log observer
    ///
    /// # Panics
    ///
    /// Panics if `interval` is zero.
    pub fn new(interval: usize) -> Self {
        assert!(interval > 0, "progress interval must be a positive integer");
        Self {
            interval,
            total_episodes: 0,
            epsilon: 0.0,
            solved: 0,
        }
    }
}

impl Observer for ProgressLogObserver {
    fn on_training_start(&mut self, total_episodes: usize, _initial_epsilon: f64) -> Result<()> {
        self.total_episodes = total_episodes;
        self.solved = 0;
        Ok(())
    }

    fn on_episode_start(&mut self, _episode: usize, epsilon: f64) -> Result<()> {
        self.epsilon = epsilon;
        Ok(())
    }

    fn on_episode_end(&mut self, episode: usize, result: &EpisodeResult) -> Result<()> {
        if result.solved {
            self.solved += 1;
        }
        let done = episode + 1;
        if done.is_multiple_of(self.interval) || done == self.total_episodes {
            info!(
                episode = done,
                total = self.total_episodes,
                epsilon = self.epsilon,
                reward = result.reward,
                steps = result.steps,
                solved = self.solved,
                "training progress"
            );
        }
        Ok(())
    }
}

/// Metrics observer - Tracks training metrics
#[derive(Debug, Default)]
pub struct MetricsObserver {
    total_episodes: usize,
    solved: usize,
    step_limit_hits: usize,
    total_reward: f64,
    total_steps: usize,
    solved_steps: usize,
    offgrid_moves: usize,
    explorer_goal_hits: usize,
}

impl MetricsObserver {
    /// Create a new metrics observer
    pub fn new() -> Self {
        Self::default()
    }

    /// Fraction of episodes solved
    pub fn solve_rate(&self) -> f64 {
        if self.total_episodes == 0 {
            0.0
        } else {
            self.solved as f64 / self.total_episodes as f64
        }
    }

    /// Mean solver reward per episode
    pub fn avg_reward(&self) -> f64 {
        if self.total_episodes == 0 {
            0.0
        } else {
            self.total_reward / self.total_episodes as f64
        }
    }

    /// Mean episode length
    pub fn avg_steps(&self) -> f64 {
        if self.total_episodes == 0 {
            0.0
        } else {
            self.total_steps as f64 / self.total_episodes as f64
        }
    }

    /// Mean length of solved episodes
    pub fn avg_solved_steps(&self) -> Option<f64> {
        (self.solved > 0).then(|| self.solved_steps as f64 / self.solved as f64)
    }

    /// Get metrics summary
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            total_episodes: self.total_episodes,
            solved: self.solved,
            step_limit_hits: self.step_limit_hits,
            solve_rate: self.solve_rate(),
            avg_reward: self.avg_reward(),
            avg_steps: self.avg_steps(),
            avg_solved_steps: self.avg_solved_steps(),
            offgrid_moves: self.offgrid_moves,
            explorer_goal_hits: self.explorer_goal_hits,
        }
    }
}

/// Summary of training metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub total_episodes: usize,
    pub solved: usize,
    pub step_limit_hits: usize,
    pub solve_rate: f64,
    pub avg_reward: f64,
    pub avg_steps: f64,
    pub avg_solved_steps: Option<f64>,
    /// Solver moves that left it in place
    pub offgrid_moves: usize,
    /// Times the random explorer stepped onto the goal
    pub explorer_goal_hits: usize,
}

impl Observer for MetricsObserver {
    fn on_step(&mut self, step: &StepRecord) -> Result<()> {
        if step.role == AgentRole::Explorer && step.transition.outcome == StepOutcome::Goal {
            self.explorer_goal_hits += 1;
        }
        Ok(())
    }

    fn on_episode_end(&mut self, _episode: usize, result: &EpisodeResult) -> Result<()> {
        self.total_episodes += 1;
        self.total_reward += result.reward;
        self.total_steps += result.steps;
        self.offgrid_moves += result.offgrid_moves;
        match result.termination {
            EpisodeState::Solved => {
                self.solved += 1;
                self.solved_steps += result.steps;
            }
            EpisodeState::StepLimitReached | EpisodeState::Running => self.step_limit_hits += 1,
        }
        Ok(())
    }
}

/// Record of one finished episode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeObservation {
    pub episode: usize,
    /// Exploration rate used during the episode
    pub epsilon: f64,
    pub reward: f64,
    pub steps: usize,
    pub solved: bool,
    pub termination: EpisodeState,
}

/// JSONL observer - Exports one JSON object per episode
pub struct JsonlObserver {
    writer: BufWriter<File>,
    epsilon: f64,
}

impl JsonlObserver {
    /// Create a new JSONL observer
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        Ok(Self {
            writer,
            epsilon: 0.0,
        })
    }
}

impl Observer for JsonlObserver {
    fn on_episode_start(&mut self, _episode: usize, epsilon: f64) -> Result<()> {
        self.epsilon = epsilon;
        Ok(())
    }

    fn on_episode_end(&mut self, episode: usize, result: &EpisodeResult) -> Result<()> {
        let observation = EpisodeObservation {
            episode,
            epsilon: self.epsilon,
            reward: result.reward,
            steps: result.steps,
            solved: result.solved,
            termination: result.termination,
        };

        serde_json::to_writer(&mut self.writer, &observation)?;
        writeln!(&mut self.writer)?;
        Ok(())
    }

    fn on_training_end(&mut self, _result: &TrainingResult) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Learned value of one cell at a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellValue {
    pub cell: Cell,
    pub max_q: f64,
    pub greedy: Action,
}

/// Per-cell best values after a given episode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QTableSnapshot {
    /// Number of episodes completed when the snapshot was taken
    pub episodes_completed: usize,
    pub cells: Vec<CellValue>,
}

impl QTableSnapshot {
    pub fn capture(episodes_completed: usize, q_table: &QTable) -> Self {
        let cells = q_table
            .sorted_states()
            .into_iter()
            .map(|cell| CellValue {
                cell,
                max_q: q_table.max_q(cell),
                greedy: q_table.greedy_action(cell),
            })
            .collect();
        Self {
            episodes_completed,
            cells,
        }
    }
}

/// Q-table snapshot observer - Tracks how learned values evolve
///
/// Captures the best value and greedy action of every visited cell every
/// `interval` episodes and after the final episode.
pub struct QTableSnapshotObserver {
    interval: usize,
    total_episodes: usize,
    snapshots: Vec<QTableSnapshot>,
}

impl QTableSnapshotObserver {
    /// Create a new snapshot observer
    ///
    /// # Panics
    ///
    /// Panics if `interval` is zero.
    pub fn new(interval: usize) -> Self {
        assert!(
            interval > 0,
            "snapshot interval must be a positive integer"
        );
        Self {
            interval,
            total_episodes: 0,
            snapshots: Vec::new(),
        }
    }

    /// Get collected snapshots
    pub fn snapshots(&self) -> &[QTableSnapshot] {
        &self.snapshots
    }

    /// Export snapshots to JSON file
    pub fn export<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &self.snapshots)?;
        Ok(())
    }
}

impl Observer for QTableSnapshotObserver {
    fn on_training_start(&mut self, total_episodes: usize, _initial_epsilon: f64) -> Result<()> {
        self.total_episodes = total_episodes;
        self.snapshots.clear();
        Ok(())
    }

    fn on_q_table_snapshot(&mut self, episode: usize, q_table: &QTable) -> Result<()> {
        let done = episode + 1;
        if done.is_multiple_of(self.interval) || done == self.total_episodes {
            self.snapshots.push(QTableSnapshot::capture(done, q_table));
        }
        Ok(())
    }
}

/// Shares an observer with the caller while the pipeline owns a handle to it
///
/// The pipeline takes observers as `Box<dyn Observer>`, which hides their
/// concrete type. Wrapping one in a `SharedObserver` keeps a clone around so
/// its collected data can be read once training is over.
pub struct SharedObserver<O> {
    inner: Arc<Mutex<O>>,
}

impl<O> SharedObserver<O> {
    pub fn new(observer: O) -> Self {
        Self {
            inner: Arc::new(Mutex::new(observer)),
        }
    }

    /// Lock the wrapped observer
    pub fn lock(&self) -> MutexGuard<'_, O> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<O> Clone for SharedObserver<O> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<O: Observer> Observer for SharedObserver<O> {
    fn on_training_start(&mut self, total_episodes: usize, initial_epsilon: f64) -> Result<()> {
        self.lock().on_training_start(total_episodes, initial_epsilon)
    }

    fn on_episode_start(&mut self, episode: usize, epsilon: f64) -> Result<()> {
        self.lock().on_episode_start(episode, epsilon)
    }

    fn on_step(&mut self, step: &StepRecord) -> Result<()> {
        self.lock().on_step(step)
    }

    fn on_episode_end(&mut self, episode: usize, result: &EpisodeResult) -> Result<()> {
        self.lock().on_episode_end(episode, result)
    }

    fn on_q_table_snapshot(&mut self, episode: usize, q_table: &QTable) -> Result<()> {
        self.lock().on_q_table_snapshot(episode, q_table)
    }

    fn on_training_end(&mut self, result: &TrainingResult) -> Result<()> {
        self.lock().on_training_end(result)
    }
}
