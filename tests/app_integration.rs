//! Integration tests for the application container.
//!
//! These use the in-memory repository so no files are touched.

mod common;

use std::{path::Path, sync::Arc};

use common::{DETOUR, config};
use maze_explorer::{
    adapters::InMemoryRepository,
    app::{App, SolverConfig},
    maze::Maze,
    pipeline::solve,
    q_learning::TrainingMetadata,
};

fn app(repo: &InMemoryRepository) -> App {
    App::for_testing()
        .with_repository(repo.clone())
        .with_default_seed(42)
        .build()
}

#[test]
fn trained_solver_survives_save_and_load() {
    let repo = InMemoryRepository::new();
    let app = app(&repo);
    let maze = Arc::new(Maze::parse(DETOUR).unwrap());

    let mut explorer = app.create_explorer(Arc::clone(&maze));
    let mut solver = app.create_solver(Arc::clone(&maze), SolverConfig::new());
    let result = app
        .create_pipeline(config(40, 30, 1))
        .run(&mut explorer, &mut solver)
        .unwrap();

    let path = Path::new("detour");
    let metadata = TrainingMetadata {
        episodes_trained: Some(result.episodes),
        solved_count: Some(result.solved_count),
        ..TrainingMetadata::default()
    };
    app.save_solver(&solver, metadata, path).unwrap();
    assert_eq!(repo.count(), 1);

    let (mut loaded, metadata) = app.load_solver(Arc::clone(&maze), path).unwrap();
    assert_eq!(metadata.episodes_trained, Some(40));
    assert_eq!(loaded.q_table(), solver.q_table());
    assert_eq!(solve(&mut loaded, 20), solve(&mut solver, 20));
}

#[test]
fn default_seed_makes_runs_repeatable() {
    let repo = InMemoryRepository::new();
    let run = || {
        let app = app(&repo);
        let maze = Arc::new(Maze::parse(DETOUR).unwrap());
        let mut explorer = app.create_explorer(Arc::clone(&maze));
        let mut solver = app.create_solver(maze, SolverConfig::new());
        let mut config = config(15, 20, 0);
        config.seed = None;
        app.create_pipeline(config)
            .run(&mut explorer, &mut solver)
            .unwrap()
            .cumulative_steps
    };

    assert_eq!(run(), run());
}

#[test]
fn warm_start_keeps_learned_values() {
    let repo = InMemoryRepository::new();
    let app = app(&repo);
    let maze = Arc::new(Maze::parse(DETOUR).unwrap());

    let mut explorer = app.create_explorer(Arc::clone(&maze));
    let mut solver = app.create_solver(Arc::clone(&maze), SolverConfig::new());
    app.create_pipeline(config(10, 20, 3))
        .run(&mut explorer, &mut solver)
        .unwrap();

    let warm = app.create_solver(
        maze,
        SolverConfig::new().with_warm_start(solver.q_table().clone()),
    );
    assert_eq!(warm.q_table(), solver.q_table());
}

#[test]
fn loading_unknown_path_fails() {
    let repo = InMemoryRepository::new();
    let app = app(&repo);
    let maze = Arc::new(Maze::parse(DETOUR).unwrap());

    assert!(app.load_solver(maze, Path::new("missing")).is_err());
}
