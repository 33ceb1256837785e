//! End-to-end behaviour of the training pipeline.

mod common;

use common::{CORRIDOR, DETOUR, UNREACHABLE, config, setup};
use maze_explorer::{
    Result,
    pipeline::{
        EpisodeResult, EpisodeState, Observer, SharedObserver, StepRecord, TrainingConfig,
        TrainingPipeline, solve,
    },
    ports::MazeAgent,
    q_learning::{RewardSchedule, StepOutcome},
    types::{Action, AgentRole},
};

/// Keeps every step and episode result
#[derive(Default)]
struct Recorder {
    steps: Vec<StepRecord>,
    episodes: Vec<EpisodeResult>,
}

impl Observer for Recorder {
    fn on_step(&mut self, step: &StepRecord) -> Result<()> {
        self.steps.push(*step);
        Ok(())
    }

    fn on_episode_end(&mut self, _episode: usize, result: &EpisodeResult) -> Result<()> {
        self.episodes.push(*result);
        Ok(())
    }
}

#[test]
fn epsilon_decays_and_rounds_per_episode() {
    let (mut explorer, mut solver) = setup(UNREACHABLE);
    let config = TrainingConfig {
        eps_initial: 1.0,
        eps_decay: 0.9,
        ..config(3, 5, 1)
    };

    let result = TrainingPipeline::new(config)
        .run(&mut explorer, &mut solver)
        .unwrap();

    assert_eq!(result.epsilons, vec![0.9, 0.81, 0.729]);
    assert_eq!(result.final_epsilon, 0.729);
}

#[test]
fn epsilon_never_increases_and_keeps_five_decimals() {
    let (mut explorer, mut solver) = setup(UNREACHABLE);
    let config = TrainingConfig {
        eps_decay: 0.97,
        ..config(60, 2, 2)
    };

    let result = TrainingPipeline::new(config)
        .run(&mut explorer, &mut solver)
        .unwrap();

    for pair in result.epsilons.windows(2) {
        assert!(pair[1] <= pair[0]);
    }
    for &epsilon in &result.epsilons {
        let scaled = epsilon * 1e5;
        assert!((scaled - scaled.round()).abs() < 1e-6, "{epsilon} not rounded");
    }
}

#[test]
fn unreachable_goal_uses_full_step_budget() {
    let (mut explorer, mut solver) = setup(UNREACHABLE);

    let result = TrainingPipeline::new(config(4, 5, 3))
        .run(&mut explorer, &mut solver)
        .unwrap();

    assert_eq!(result.cumulative_steps, vec![5; 4]);
    assert_eq!(result.solved_count, 0);
    assert!(result.first_solve.is_none());
    assert!(result.solved_episodes.iter().all(|&solved| !solved));
}

#[test]
fn first_solve_and_count_match_solved_episodes() {
    let recorder = SharedObserver::new(Recorder::default());
    let (mut explorer, mut solver) = setup(CORRIDOR);

    let result = TrainingPipeline::new(config(40, 30, 4))
        .with_observer(Box::new(recorder.clone()))
        .run(&mut explorer, &mut solver)
        .unwrap();

    let solved: Vec<usize> = result
        .solved_episodes
        .iter()
        .enumerate()
        .filter_map(|(i, &s)| s.then_some(i))
        .collect();
    assert!(!solved.is_empty(), "corridor should be solved at least once");
    assert_eq!(result.solved_count, solved.len());
    assert_eq!(result.first_solve.map(|f| f.episode), solved.first().copied());

    let recorder = recorder.lock();
    for episode in &recorder.episodes {
        assert_eq!(episode.solved, episode.termination == EpisodeState::Solved);
    }
}

#[test]
fn solved_episode_ends_with_solver_on_goal() {
    let recorder = SharedObserver::new(Recorder::default());
    let (mut explorer, mut solver) = setup(DETOUR);
    let goal = solver.goal_state();

    TrainingPipeline::new(config(30, 40, 5))
        .with_observer(Box::new(recorder.clone()))
        .run(&mut explorer, &mut solver)
        .unwrap();

    let recorder = recorder.lock();
    for episode in recorder.episodes.iter().filter(|e| e.solved) {
        let last_solver_move = recorder
            .steps
            .iter()
            .rev()
            .find(|s| s.episode == episode.episode && s.role == AgentRole::Solver)
            .unwrap();
        assert_eq!(last_solver_move.transition.current, goal);
        assert_eq!(last_solver_move.step + 1, episode.steps);
    }
}

#[test]
fn goal_moves_write_goal_reward_exactly() {
    let recorder = SharedObserver::new(Recorder::default());
    let (mut explorer, mut solver) = setup(CORRIDOR);
    let config = TrainingConfig {
        learning_rate: 0.3,
        ..config(30, 30, 6)
    };

    TrainingPipeline::new(config)
        .with_observer(Box::new(recorder.clone()))
        .run(&mut explorer, &mut solver)
        .unwrap();

    let recorder = recorder.lock();
    let goal_moves: Vec<_> = recorder
        .steps
        .iter()
        .filter(|s| s.transition.outcome == StepOutcome::Goal)
        .collect();
    assert!(!goal_moves.is_empty());
    for step in goal_moves {
        assert_eq!(step.new_q, 10.0);
    }
}

#[test]
fn full_learning_rate_without_discount_stores_raw_rewards() {
    let (mut explorer, mut solver) = setup(DETOUR);
    let config = TrainingConfig {
        learning_rate: 1.0,
        discount: 0.0,
        rewards: RewardSchedule::new(-1.0, -5.0, 10.0),
        ..config(20, 20, 7)
    };

    TrainingPipeline::new(config)
        .run(&mut explorer, &mut solver)
        .unwrap();

    for (_, row) in solver.q_table().iter() {
        for value in row {
            assert!(
                [0.0, -1.0, -5.0, 10.0].contains(value),
                "unexpected value {value}"
            );
        }
    }
}

#[test]
fn explorer_moves_precede_solver_moves() {
    let recorder = SharedObserver::new(Recorder::default());
    let (mut explorer, mut solver) = setup(UNREACHABLE);

    TrainingPipeline::new(config(2, 3, 8))
        .with_observer(Box::new(recorder.clone()))
        .run(&mut explorer, &mut solver)
        .unwrap();

    let roles: Vec<AgentRole> = recorder.lock().steps.iter().map(|s| s.role).collect();
    assert_eq!(roles.len(), 12);
    for pair in roles.chunks(2) {
        assert_eq!(pair, [AgentRole::Explorer, AgentRole::Solver]);
    }
}

#[test]
fn same_seed_gives_same_run() {
    let run = || {
        let (mut explorer, mut solver) = setup(DETOUR);
        let result = TrainingPipeline::new(config(25, 30, 99))
            .run(&mut explorer, &mut solver)
            .unwrap();
        (result.cumulative_rewards, result.cumulative_steps, solver.q_table().clone())
    };

    assert_eq!(run(), run());
}

#[test]
fn trained_solver_walks_the_corridor() {
    let (mut explorer, mut solver) = setup(CORRIDOR);
    let config = TrainingConfig {
        learning_rate: 0.5,
        ..config(400, 50, 11)
    };

    let result = TrainingPipeline::new(config)
        .run(&mut explorer, &mut solver)
        .unwrap();
    assert!(result.solved_count > 0);

    let path = solve(&mut solver, 10);
    assert!(path.reached_goal);
    assert_eq!(path.steps, 4);
    for cell in &path.cells[..4] {
        assert_eq!(solver.q_table().greedy_action(*cell), Action::Right);
    }
}
