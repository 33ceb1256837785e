//! Solve command - Replay the greedy policy of a saved Q-table

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    app::App,
    cli::output::{print_kv, print_section},
    pipeline::solve,
};

/// Step budget when neither the flag nor the saved metadata provides one
const DEFAULT_MAX_STEPS: usize = 200;

#[derive(Parser, Debug)]
#[command(about = "Walk a maze with the greedy policy of a trained Q-table")]
pub struct SolveArgs {
    /// Maze file
    pub maze: PathBuf,

    /// Trained Q-table (MessagePack)
    pub q_table: PathBuf,

    /// Maximum number of moves (defaults to the training step budget)
    #[arg(long, short = 's')]
    pub max_steps: Option<usize>,

    /// Also print the action taken in every step
    #[arg(long)]
    pub actions: bool,
}

pub fn execute(args: SolveArgs) -> Result<()> {
    let app = App::new();
    let maze = app
        .load_maze(&args.maze)
        .with_context(|| format!("failed to load maze {}", args.maze.display()))?;
    let (mut solver, metadata) = app
        .load_solver(Arc::clone(&maze), &args.q_table)
        .with_context(|| format!("failed to load Q-table {}", args.q_table.display()))?;

    let max_steps = args
        .max_steps
        .or(metadata.max_steps)
        .unwrap_or(DEFAULT_MAX_STEPS);
    let path = solve(&mut solver, max_steps);

    print_section(&format!("Greedy path through {}", args.maze.display()));
    println!("{}", maze.render_with_path(&path.cells));
    print_kv("Reached goal", &path.reached_goal.to_string());
    print_kv("Steps", &path.steps.to_string());
    print_kv("Step budget", &max_steps.to_string());

    if args.actions {
        for (step, cell) in path.cells.iter().enumerate().skip(1) {
            let from = path.cells[step - 1];
            let action = solver.q_table().greedy_action(from);
            println!("  {step:>4}: {from} --{action}--> {cell}");
        }
    }

    if !path.reached_goal {
        println!("\nThe greedy policy did not reach the goal within {max_steps} steps.");
    }

    Ok(())
}
