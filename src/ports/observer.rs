//! Observer port - abstraction for training observation and data collection
//!
//! This port defines the interface for observing training events,
//! allowing composable data collection without coupling the training
//! loop to progress bars, log output or export formats.

use crate::{
    Result,
    pipeline::{EpisodeResult, StepRecord, TrainingResult},
    q_learning::QTable,
};

/// Observer trait for monitoring training
///
/// Observers can be composed to collect different kinds of data during training.
/// Examples include:
/// - Progress bars for user feedback
/// - Periodic progress log lines
/// - JSONL export of per-episode results
/// - Q-table snapshots for later inspection
///
/// # Event Sequence
///
/// The observer methods are called in the following order:
/// 1. `on_training_start(total_episodes, initial_epsilon)` - Once at the beginning
/// 2. For each episode:
///    - `on_episode_start(episode, epsilon)`
///    - `on_step(...)` - For each agent move, explorer first then solver
///    - `on_episode_end(episode, result)`
///    - `on_q_table_snapshot(episode, q_table)`
/// 3. `on_training_end(result)` - Once at the end
///
/// # Examples
///
/// ```no_run
/// use maze_explorer::{pipeline::EpisodeResult, ports::Observer};
///
/// struct SolveCounter {
///     solved: usize,
/// }
///
/// impl Observer for SolveCounter {
///     fn on_episode_end(
///         &mut self,
///         _episode: usize,
///         result: &EpisodeResult,
///     ) -> maze_explorer::Result<()> {
///         if result.solved {
///             self.solved += 1;
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    /// Called when training starts.
    ///
    /// # Parameters
    ///
    /// * `total_episodes` - Number of episodes that will be run
    /// * `initial_epsilon` - Exploration rate for the first episode
    fn on_training_start(&mut self, _total_episodes: usize, _initial_epsilon: f64) -> Result<()> {
        Ok(())
    }

    /// Called before the agents are reset for a new episode.
    ///
    /// `epsilon` is the exploration rate the solver uses during this episode.
    fn on_episode_start(&mut self, _episode: usize, _epsilon: f64) -> Result<()> {
        Ok(())
    }

    /// Called after each agent move, once the Q-table update has been applied.
    fn on_step(&mut self, _step: &StepRecord) -> Result<()> {
        Ok(())
    }

    /// Called when an episode is solved or runs out of steps.
    fn on_episode_end(&mut self, _episode: usize, _result: &EpisodeResult) -> Result<()> {
        Ok(())
    }

    /// Called after every episode with read access to the shared Q-table.
    ///
    /// Observers that track how the learned values evolve decide for
    /// themselves how often to record anything.
    fn on_q_table_snapshot(&mut self, _episode: usize, _q_table: &QTable) -> Result<()> {
        Ok(())
    }

    /// Called when training completes.
    ///
    /// Use this to finalize outputs, close files, or display summaries.
    fn on_training_end(&mut self, _result: &TrainingResult) -> Result<()> {
        Ok(())
    }
}
