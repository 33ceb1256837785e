//! maze-explorer CLI - Tabular Q-learning on grid mazes
//!
//! A solver learns to reach the goal with epsilon-greedy Q-learning while a
//! random explorer shares (and updates) its Q-table.
//!
//! - `train` a solver and optionally save its Q-table and run reports
//! - `solve` a maze with the greedy policy of a saved Q-table
//! - `inspect` a saved Q-table

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "maze-explorer")]
#[command(version, about = "Tabular Q-learning maze solver", long_about = None)]
struct Cli {
    /// Log debug output (overridden by RUST_LOG)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a solver on a maze
    Train(Box<maze_explorer::cli::commands::train::TrainArgs>),

    /// Walk a maze with a trained Q-table's greedy policy
    Solve(maze_explorer::cli::commands::solve::SolveArgs),

    /// Show the contents of a saved Q-table
    Inspect(maze_explorer::cli::commands::inspect::InspectArgs),
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Train(args) => maze_explorer::cli::commands::train::execute(*args),
        Commands::Solve(args) => maze_explorer::cli::commands::solve::execute(args),
        Commands::Inspect(args) => maze_explorer::cli::commands::inspect::execute(args),
    }
}
