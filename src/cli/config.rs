//! Training configuration assembled from a config file and command-line flags

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use crate::{pipeline::TrainingConfig, q_learning::RewardSchedule};

/// Training parameters that can be set on the command line.
///
/// Every field is optional so that only flags actually passed override the
/// values from `--config` (or the built-in defaults).
#[derive(Args, Debug, Clone, Default)]
pub struct TrainingOverrides {
    /// Number of training episodes
    #[arg(long, short = 'e')]
    pub episodes: Option<usize>,

    /// Step budget per episode
    #[arg(long, short = 's')]
    pub max_steps: Option<usize>,

    /// Learning rate in (0, 1]
    #[arg(long)]
    pub learning_rate: Option<f64>,

    /// Discount factor in [0, 1]
    #[arg(long)]
    pub discount: Option<f64>,

    /// Initial exploration rate in [0, 1]
    #[arg(long)]
    pub epsilon: Option<f64>,

    /// Multiplicative epsilon decay per episode in (0, 1]
    #[arg(long)]
    pub epsilon_decay: Option<f64>,

    /// Rewards as move,offgrid,goal (e.g. -1,-5,10)
    #[arg(long, allow_hyphen_values = true, value_parser = parse_rewards)]
    pub rewards: Option<RewardSchedule>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,
}

fn parse_rewards(value: &str) -> std::result::Result<RewardSchedule, String> {
    value.parse::<RewardSchedule>().map_err(|e| e.to_string())
}

impl TrainingOverrides {
    /// Replace the fields of `base` for which a flag was passed.
    pub fn apply(&self, mut base: TrainingConfig) -> TrainingConfig {
        if let Some(episodes) = self.episodes {
            base.episodes = episodes;
        }
        if let Some(max_steps) = self.max_steps {
            base.max_steps = max_steps;
        }
        if let Some(learning_rate) = self.learning_rate {
            base.learning_rate = learning_rate;
        }
        if let Some(discount) = self.discount {
            base.discount = discount;
        }
        if let Some(epsilon) = self.epsilon {
            base.eps_initial = epsilon;
        }
        if let Some(decay) = self.epsilon_decay {
            base.eps_decay = decay;
        }
        if let Some(rewards) = self.rewards {
            base.rewards = rewards;
        }
        if self.seed.is_some() {
            base.seed = self.seed;
        }
        base
    }
}

/// Load the base configuration, then apply flag overrides and validate.
pub fn resolve_training_config(
    config_file: Option<&Path>,
    overrides: &TrainingOverrides,
) -> Result<TrainingConfig> {
    let base = match config_file {
        Some(path) => TrainingConfig::load(path)
            .with_context(|| format!("failed to load config file {}", path.display()))?,
        None => TrainingConfig::default(),
    };

    let config = overrides.apply(base);
    config.validate().context("invalid training configuration")?;
    Ok(config)
}
