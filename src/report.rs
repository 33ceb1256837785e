//! End-of-run reporting
//!
//! Turns the per-episode series of a [`TrainingResult`] into summary numbers,
//! a printable block and CSV/JSON exports.

use std::{fmt::Write as _, fs::File, io::BufWriter, path::Path};

use serde::{Deserialize, Serialize};

use crate::{Error, Result, pipeline::TrainingResult};

/// Share of trailing episodes used for the "recent" averages
pub const RECENT_FRACTION: f64 = 0.1;

/// Summary statistics of one training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    pub episodes: usize,
    pub max_steps: usize,
    pub solved: usize,
    pub solve_rate: f64,
    /// Zero-based index of the first solved episode
    pub first_solve_episode: Option<usize>,
    pub first_solve_secs: Option<f64>,
    pub mean_reward: f64,
    pub mean_steps: f64,
    /// Fewest steps among solved episodes
    pub best_steps: Option<usize>,
    pub recent_episodes: usize,
    pub recent_mean_reward: f64,
    pub recent_mean_steps: f64,
    /// Episodes that used the whole step budget without solving
    pub step_limit_hits: usize,
    pub final_epsilon: f64,
    pub elapsed_secs: f64,
    #[serde(skip)]
    rows: Vec<ResultRow>,
}

/// One CSV row
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    pub episode: usize,
    pub reward: f64,
    pub steps: usize,
    pub epsilon: f64,
}

fn mean<I>(values: I) -> f64
where
    I: ExactSizeIterator<Item = f64>,
{
    let len = values.len();
    if len == 0 {
        0.0
    } else {
        values.sum::<f64>() / len as f64
    }
}

impl TrainingReport {
    /// Summarize `result`. `max_steps` is the per-episode budget the run used.
    pub fn new(result: &TrainingResult, max_steps: usize) -> Self {
        // Series built outside the pipeline may disagree in length.
        let episodes = result
            .cumulative_rewards
            .len()
            .min(result.cumulative_steps.len());
        let rewards = &result.cumulative_rewards[..episodes];
        let steps = &result.cumulative_steps[..episodes];

        let step_limit_hits = result.solved_episodes.iter().filter(|&&solved| !solved).count();
        let best_steps = steps
            .iter()
            .zip(&result.solved_episodes)
            .filter(|&(_, &solved)| solved)
            .map(|(&s, _)| s)
            .min();

        let recent_episodes = if episodes == 0 {
            0
        } else {
            ((episodes as f64 * RECENT_FRACTION).ceil() as usize).max(1)
        };
        let tail = episodes - recent_episodes;

        let rows = rewards
            .iter()
            .zip(steps)
            .zip(&result.epsilons)
            .enumerate()
            .map(|(episode, ((&reward, &steps), &epsilon))| ResultRow {
                episode,
                reward,
                steps,
                epsilon,
            })
            .collect();

        Self {
            episodes,
            max_steps,
            solved: result.solved_count,
            solve_rate: result.solve_rate(),
            first_solve_episode: result.first_solve.map(|f| f.episode),
            first_solve_secs: result.first_solve.map(|f| f.elapsed_secs),
            mean_reward: mean(rewards.iter().copied()),
            mean_steps: mean(steps.iter().map(|&s| s as f64)),
            best_steps,
            recent_episodes,
            recent_mean_reward: mean(rewards[tail..].iter().copied()),
            recent_mean_steps: mean(steps[tail..].iter().map(|&s| s as f64)),
            step_limit_hits,
            final_epsilon: result.final_epsilon,
            elapsed_secs: result.elapsed_secs,
            rows,
        }
    }

    /// Human-readable summary block
    pub fn render(&self) -> String {
        let mut out = String::new();
        let mut line = |key: &str, value: String| {
            let _ = writeln!(out, "  {:24} {}", format!("{key}:"), value);
        };

        line("Episodes", self.episodes.to_string());
        line("Max steps", self.max_steps.to_string());
        line(
            "Solved",
            format!("{} ({:.1}%)", self.solved, self.solve_rate * 100.0),
        );
        match (self.first_solve_episode, self.first_solve_secs) {
            (Some(episode), Some(secs)) => {
                line("First solve", format!("episode {episode} after {secs:.3}s"))
            }
            _ => line("First solve", "never".to_string()),
        }
        line("Mean reward", format!("{:.3}", self.mean_reward));
        line("Mean steps", format!("{:.2}", self.mean_steps));
        line(
            "Best steps",
            self.best_steps
                .map_or_else(|| "-".to_string(), |s| s.to_string()),
        );
        line(
            &format!("Last {} episodes", self.recent_episodes),
            format!(
                "reward {:.3}, steps {:.2}",
                self.recent_mean_reward, self.recent_mean_steps
            ),
        );
        line("Step limit reached", self.step_limit_hits.to_string());
        line("Final epsilon", format!("{:.5}", self.final_epsilon));
        line("Elapsed", format!("{:.3}s", self.elapsed_secs));
        out
    }

    /// Write `episode,reward,steps,epsilon` rows
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create results file {path:?}"),
            source,
        })?;
        let mut writer = csv::Writer::from_writer(BufWriter::new(file));
        for row in &self.rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Save the summary as pretty JSON
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create summary file {path:?}"),
            source,
        })?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }
}
