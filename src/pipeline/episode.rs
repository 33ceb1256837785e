//! Episode driver: one bounded attempt by the solver to reach the goal
//!
//! Each step moves the explorer and then the solver. Both moves are scored
//! and both update the solver's Q-table, so within a step the solver already
//! sees whatever the explorer's move just wrote.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{
    Result,
    maze::Solver,
    ports::MazeAgent,
    q_learning::{QTable, RewardSchedule, StepOutcome, Transition, UpdateRule, policy},
    types::AgentRole,
};

/// Lifecycle of an episode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EpisodeState {
    Running,
    /// The solver reached its goal
    Solved,
    /// The step budget ran out first
    StepLimitReached,
}

/// One agent move as seen by observers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub episode: usize,
    /// Zero-based step index within the episode
    pub step: usize,
    pub role: AgentRole,
    pub transition: Transition,
    /// Value written to `Q[previous][action]`
    pub new_q: f64,
}

/// Outcome of a finished episode
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpisodeResult {
    pub episode: usize,
    /// Sum of the solver's rewards
    pub reward: f64,
    /// Steps taken, counting the step on which the goal was reached
    pub steps: usize,
    pub solved: bool,
    /// `Solved` or `StepLimitReached`
    pub termination: EpisodeState,
    /// Solver moves that left it in place
    pub offgrid_moves: usize,
}

/// Runs episodes with a fixed reward schedule, update rule and step budget.
#[derive(Debug, Clone, Copy)]
pub struct EpisodeDriver {
    rewards: RewardSchedule,
    rule: UpdateRule,
    max_steps: usize,
}

impl EpisodeDriver {
    pub fn new(rewards: RewardSchedule, rule: UpdateRule, max_steps: usize) -> Self {
        Self {
            rewards,
            rule,
            max_steps,
        }
    }

    /// Run one episode.
    ///
    /// Both agents are reset first. `on_step` is called after every move with
    /// the Q-table update already applied; an error from it aborts the
    /// episode.
    pub fn run<E, A, R, F>(
        &self,
        episode: usize,
        epsilon: f64,
        explorer: &mut E,
        solver: &mut Solver<A>,
        rng: &mut R,
        mut on_step: F,
    ) -> Result<EpisodeResult>
    where
        E: MazeAgent + ?Sized,
        A: MazeAgent,
        R: Rng + ?Sized,
        F: FnMut(&StepRecord) -> Result<()>,
    {
        explorer.reset();
        solver.reset();

        let mut state = EpisodeState::Running;
        let mut reward = 0.0;
        let mut steps = 0;
        let mut offgrid_moves = 0;

        for step in 0..self.max_steps {
            steps += 1;

            let explored = self.move_agent(
                AgentRole::Explorer,
                explorer,
                solver.q_table_mut(),
                epsilon,
                rng,
            );
            on_step(&StepRecord {
                episode,
                step,
                ..explored
            })?;

            let (agent, q_table) = solver.parts_mut();
            let solved = self.move_agent(AgentRole::Solver, agent, q_table, epsilon, rng);
            on_step(&StepRecord {
                episode,
                step,
                ..solved
            })?;

            reward += solved.transition.reward;
            match solved.transition.outcome {
                StepOutcome::Goal => state = EpisodeState::Solved,
                StepOutcome::OffGrid => offgrid_moves += 1,
                StepOutcome::Moved => {}
            }

            if state == EpisodeState::Solved {
                break;
            }
        }

        if state == EpisodeState::Running {
            state = EpisodeState::StepLimitReached;
        }

        trace!(episode, steps, reward, ?state, "episode finished");

        Ok(EpisodeResult {
            episode,
            reward,
            steps,
            solved: state == EpisodeState::Solved,
            termination: state,
            offgrid_moves,
        })
    }

    /// Select, execute, score and learn from one move.
    ///
    /// The returned record carries placeholder episode and step indices that
    /// the caller fills in.
    fn move_agent<M, R>(
        &self,
        role: AgentRole,
        agent: &mut M,
        q_table: &mut QTable,
        epsilon: f64,
        rng: &mut R,
    ) -> StepRecord
    where
        M: MazeAgent + ?Sized,
        R: Rng + ?Sized,
    {
        let action = policy::select_action(role, q_table, agent.current_state(), epsilon, rng);
        agent.choose_action(action);

        let (outcome, reward) = self.rewards.assess(agent);
        let transition = Transition {
            previous: agent.previous_state(),
            action,
            current: agent.current_state(),
            reward,
            outcome,
        };
        let new_q = self.rule.apply(q_table, &transition);

        StepRecord {
            episode: 0,
            step: 0,
            role,
            transition,
            new_q,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::{
        maze::{GridAgent, Maze},
        types::Action,
    };

    fn driver(max_steps: usize) -> EpisodeDriver {
        EpisodeDriver::new(RewardSchedule::default(), UpdateRule::new(0.5, 0.9), max_steps)
    }

    fn setup(text: &str) -> (GridAgent, Solver) {
        let maze = Arc::new(Maze::parse(text).unwrap());
        (GridAgent::explorer(Arc::clone(&maze)), Solver::for_maze(maze))
    }

    #[test]
    fn test_unreachable_goal_hits_step_limit() {
        let (mut explorer, mut solver) = setup("S.#G");
        let mut rng = StdRng::seed_from_u64(5);

        let result = driver(5)
            .run(0, 1.0, &mut explorer, &mut solver, &mut rng, |_| Ok(()))
            .unwrap();

        assert_eq!(result.steps, 5);
        assert!(!result.solved);
        assert_eq!(result.termination, EpisodeState::StepLimitReached);
    }

    #[test]
    fn test_greedy_solver_solves_in_one_step() {
        let (mut explorer, mut solver) = setup("SG");
        let start = solver.current_state();
        solver.q_table_mut().set(start, Action::Right, 1.0);
        let mut rng = StdRng::seed_from_u64(6);

        let result = driver(10)
            .run(3, 0.0, &mut explorer, &mut solver, &mut rng, |_| Ok(()))
            .unwrap();

        assert!(result.solved);
        assert_eq!(result.episode, 3);
        assert_eq!(result.steps, 1);
        assert_eq!(result.reward, 10.0);
        assert_eq!(result.termination, EpisodeState::Solved);
        assert!(solver.at_goal());
        assert_eq!(solver.q_table().get(start, Action::Right), 10.0);
    }

    #[test]
    fn test_explorer_moves_before_solver() {
        let (mut explorer, mut solver) = setup("S.#G");
        let mut rng = StdRng::seed_from_u64(7);
        let mut roles = Vec::new();

        driver(3)
            .run(0, 1.0, &mut explorer, &mut solver, &mut rng, |record| {
                roles.push((record.step, record.role));
                Ok(())
            })
            .unwrap();

        assert_eq!(
            roles,
            vec![
                (0, AgentRole::Explorer),
                (0, AgentRole::Solver),
                (1, AgentRole::Explorer),
                (1, AgentRole::Solver),
                (2, AgentRole::Explorer),
                (2, AgentRole::Solver),
            ]
        );
    }

    #[test]
    fn test_episode_reward_counts_only_solver() {
        let (mut explorer, mut solver) = setup("S.#G");
        let mut rng = StdRng::seed_from_u64(8);
        let mut solver_total = 0.0;

        let result = driver(20)
            .run(0, 1.0, &mut explorer, &mut solver, &mut rng, |record| {
                if record.role == AgentRole::Solver {
                    solver_total += record.transition.reward;
                }
                Ok(())
            })
            .unwrap();

        assert_eq!(result.reward, solver_total);
    }

    #[test]
    fn test_observer_error_aborts_episode() {
        let (mut explorer, mut solver) = setup("S.#G");
        let mut rng = StdRng::seed_from_u64(9);

        let result = driver(5).run(0, 1.0, &mut explorer, &mut solver, &mut rng, |_| {
            Err(crate::Error::config("stop"))
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_explorer_updates_shared_table() {
        let (mut explorer, mut solver) = setup("S.#G");
        let mut rng = StdRng::seed_from_u64(10);
        let mut explorer_writes = Vec::new();

        driver(4)
            .run(0, 1.0, &mut explorer, &mut solver, &mut rng, |record| {
                if record.role == AgentRole::Explorer {
                    explorer_writes.push(record.transition);
                }
                Ok(())
            })
            .unwrap();

        assert_eq!(explorer_writes.len(), 4);
        for transition in explorer_writes {
            assert!(solver.q_table().contains(transition.previous));
        }
    }
}
