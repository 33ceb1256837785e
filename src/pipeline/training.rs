//! Training loop: runs episodes, decays epsilon and accumulates results

use std::time::Instant;

use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{
    episode::{EpisodeDriver, EpisodeResult},
    schedule::EpsilonSchedule,
};
use crate::{
    Error, Result,
    maze::Solver,
    ports::{MazeAgent, Observer},
    q_learning::{RewardSchedule, StepOutcome, UpdateRule},
    types::AgentRole,
};

/// Training configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Number of training episodes
    pub episodes: usize,

    /// Step budget per episode
    pub max_steps: usize,

    /// Learning rate α in (0, 1]
    pub learning_rate: f64,

    /// Discount factor γ in [0, 1]
    pub discount: f64,

    /// Exploration rate for the first episode
    pub eps_initial: f64,

    /// Multiplicative epsilon decay per episode
    pub eps_decay: f64,

    /// Move / off-grid / goal rewards
    pub rewards: RewardSchedule,

    /// Random seed
    pub seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            episodes: 500,
            max_steps: 200,
            learning_rate: 0.1,
            discount: 0.9,
            eps_initial: 1.0,
            eps_decay: 0.99,
            rewards: RewardSchedule::default(),
            seed: None,
        }
    }
}

impl TrainingConfig {
    /// Check every parameter against its documented range.
    pub fn validate(&self) -> Result<()> {
        if self.episodes == 0 {
            return Err(Error::config("episodes must be greater than zero"));
        }
        if self.max_steps == 0 {
            return Err(Error::config("max steps must be greater than zero"));
        }
        self.update_rule().validate()?;
        if !(0.0..=1.0).contains(&self.eps_initial) {
            return Err(Error::config(format!(
                "initial epsilon must be in [0, 1], got {}",
                self.eps_initial
            )));
        }
        if !(self.eps_decay > 0.0 && self.eps_decay <= 1.0) {
            return Err(Error::config(format!(
                "epsilon decay must be in (0, 1], got {}",
                self.eps_decay
            )));
        }
        self.rewards.validate()
    }

    pub fn update_rule(&self) -> UpdateRule {
        UpdateRule::new(self.learning_rate, self.discount)
    }

    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| Error::Io {
            operation: format!("open config file {path:?}"),
            source,
        })?;
        let config = serde_json::from_reader(std::io::BufReader::new(file))?;
        Ok(config)
    }
}

/// Marker for the first episode the solver solved
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FirstSolve {
    /// Zero-based episode index
    pub episode: usize,
    /// Seconds from the start of training to the solver's arrival on the goal
    pub elapsed_secs: f64,
}

/// Result of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingResult {
    /// Episodes run
    pub episodes: usize,

    /// Solver reward per episode
    pub cumulative_rewards: Vec<f64>,

    /// Steps per episode
    pub cumulative_steps: Vec<usize>,

    /// Epsilon after each episode's decay
    pub epsilons: Vec<f64>,

    /// Whether each episode was solved
    pub solved_episodes: Vec<bool>,

    /// Episodes in which the solver reached the goal
    pub solved_count: usize,

    /// First solved episode, if any
    pub first_solve: Option<FirstSolve>,

    /// Epsilon after the last episode
    pub final_epsilon: f64,

    /// Wall-clock training time in seconds
    pub elapsed_secs: f64,
}

impl TrainingResult {
    fn empty(initial_epsilon: f64, capacity: usize) -> Self {
        Self {
            episodes: 0,
            cumulative_rewards: Vec::with_capacity(capacity),
            cumulative_steps: Vec::with_capacity(capacity),
            epsilons: Vec::with_capacity(capacity),
            solved_episodes: Vec::with_capacity(capacity),
            solved_count: 0,
            first_solve: None,
            final_epsilon: initial_epsilon,
            elapsed_secs: 0.0,
        }
    }

    /// `goal_reached_secs` is the time since training started at which the
    /// solver stepped onto the goal in this episode.
    fn record(
        &mut self,
        result: &EpisodeResult,
        epsilon_after: f64,
        goal_reached_secs: Option<f64>,
    ) {
        self.episodes += 1;
        self.cumulative_rewards.push(result.reward);
        self.cumulative_steps.push(result.steps);
        self.epsilons.push(epsilon_after);
        self.solved_episodes.push(result.solved);
        self.final_epsilon = epsilon_after;

        if result.solved {
            self.solved_count += 1;
            if self.first_solve.is_none() {
                self.first_solve = Some(FirstSolve {
                    episode: result.episode,
                    elapsed_secs: goal_reached_secs.unwrap_or_default(),
                });
            }
        }
    }

    /// Fraction of episodes solved
    pub fn solve_rate(&self) -> f64 {
        if self.episodes > 0 {
            self.solved_count as f64 / self.episodes as f64
        } else {
            0.0
        }
    }
}

/// Training pipeline for a solver sharing the maze with an explorer
pub struct TrainingPipeline {
    config: TrainingConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl TrainingPipeline {
    /// Create a new training pipeline
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Train `solver` for the configured number of episodes.
    ///
    /// The explorer's moves update the solver's Q-table exactly like the
    /// solver's own moves.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] before any episode runs if the
    /// configuration is out of range, and propagates observer failures.
    pub fn run<E, A>(&mut self, explorer: &mut E, solver: &mut Solver<A>) -> Result<TrainingResult>
    where
        E: MazeAgent + ?Sized,
        A: MazeAgent,
    {
        self.config.validate()?;

        let config = &self.config;
        let mut rng = build_rng(config.seed);
        let driver = EpisodeDriver::new(config.rewards, config.update_rule(), config.max_steps);
        let mut schedule = EpsilonSchedule::new(config.eps_initial, config.eps_decay);
        let mut result = TrainingResult::empty(config.eps_initial, config.episodes);
        let start_time = Instant::now();

        info!(
            episodes = config.episodes,
            max_steps = config.max_steps,
            learning_rate = config.learning_rate,
            discount = config.discount,
            epsilon = config.eps_initial,
            eps_decay = config.eps_decay,
            rewards = %config.rewards,
            seed = ?config.seed,
            "training started"
        );

        for observer in &mut self.observers {
            observer.on_training_start(config.episodes, config.eps_initial)?;
        }

        for episode in 0..config.episodes {
            let epsilon = schedule.current();
            for observer in &mut self.observers {
                observer.on_episode_start(episode, epsilon)?;
            }

            let observers = &mut self.observers;
            let mut goal_reached_secs = None;
            let outcome = driver.run(episode, epsilon, explorer, solver, &mut rng, |step| {
                if step.role == AgentRole::Solver && step.transition.outcome == StepOutcome::Goal {
                    goal_reached_secs = Some(start_time.elapsed().as_secs_f64());
                }
                for observer in observers.iter_mut() {
                    observer.on_step(step)?;
                }
                Ok(())
            })?;

            let epsilon_after = schedule.decay();
            result.record(&outcome, epsilon_after, goal_reached_secs);

            if outcome.solved && result.solved_count == 1 {
                info!(episode, steps = outcome.steps, "solver reached the goal for the first time");
            }
            debug!(
                episode,
                reward = outcome.reward,
                steps = outcome.steps,
                solved = outcome.solved,
                epsilon = epsilon_after,
                "episode complete"
            );

            for observer in &mut self.observers {
                observer.on_episode_end(episode, &outcome)?;
                observer.on_q_table_snapshot(episode, solver.q_table())?;
            }
        }

        result.elapsed_secs = start_time.elapsed().as_secs_f64();

        for observer in &mut self.observers {
            observer.on_training_end(&result)?;
        }

        info!(
            solved = result.solved_count,
            episodes = result.episodes,
            final_epsilon = result.final_epsilon,
            elapsed_secs = result.elapsed_secs,
            "training finished"
        );

        Ok(result)
    }
}

pub(crate) fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}
