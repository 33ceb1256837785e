//! Train command - Train a solver on a maze alongside a random explorer

use std::{
    num::NonZeroUsize,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::info;

use crate::{
    app::{App, SolverConfig},
    cli::{
        config::{TrainingOverrides, resolve_training_config},
        output::{format_number, format_opt, print_kv, print_section, print_subsection},
    },
    pipeline::{
        JsonlObserver, MetricsObserver, MetricsSummary, ProgressLogObserver, ProgressObserver,
        QTableSnapshotObserver, SharedObserver, TrainingConfig, solve,
    },
    q_learning::TrainingMetadata,
    report::TrainingReport,
};

#[derive(Debug, Serialize)]
struct TrainingSummaryFile<'a> {
    maze: String,
    config: &'a TrainingConfig,
    report: &'a TrainingReport,
    metrics: MetricsSummary,
}

fn sanitize_summary_path(raw: &Path) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    // Treat trailing separators or missing filename as a directory target.
    if raw_str.ends_with(std::path::MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push("training_summary.json");
        return normalized;
    }

    match normalized.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => normalized,
        _ => {
            normalized.set_extension("json");
            normalized
        }
    }
}

#[derive(Parser, Debug)]
#[command(about = "Train a solver on a maze")]
pub struct TrainArgs {
    /// Maze file (# wall, . open, S solver start, E explorer start, G goal)
    pub maze: PathBuf,

    #[command(flatten)]
    pub training: TrainingOverrides,

    /// JSON file with training parameters; flags take precedence
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Initial value of every action in unvisited cells
    #[arg(long, allow_negative_numbers = true, conflicts_with = "resume")]
    pub q_init: Option<f64>,

    /// Continue training from a saved Q-table
    #[arg(long)]
    pub resume: Option<PathBuf>,

    /// Show progress bar
    #[arg(long)]
    pub progress: bool,

    /// Log a progress line every N episodes
    #[arg(long, value_name = "N")]
    pub print_progress: Option<NonZeroUsize>,

    /// Record a Q-table snapshot every N episodes
    #[arg(long, value_name = "N")]
    pub snapshot_every: Option<NonZeroUsize>,

    /// Output file for the trained Q-table
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Optional CSV file with one row per episode
    #[arg(long)]
    pub results: Option<PathBuf>,

    /// Optional file for JSONL observations
    #[arg(long)]
    pub observations: Option<PathBuf>,

    /// Optional JSON file for Q-table snapshots
    #[arg(long)]
    pub snapshots: Option<PathBuf>,

    /// Print the greedy path after training
    #[arg(long)]
    pub show_solution: bool,
}

/// Snapshot interval used when only `--snapshots` is given
fn default_snapshot_interval(episodes: usize) -> usize {
    (episodes / 10).max(1)
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let config = resolve_training_config(args.config.as_deref(), &args.training)?;

    let app = App::new();
    let maze = app
        .load_maze(&args.maze)
        .with_context(|| format!("failed to load maze {}", args.maze.display()))?;

    let solver_config = match &args.resume {
        Some(path) => {
            let saved = app
                .repository()
                .load(path)
                .with_context(|| format!("failed to load Q-table {}", path.display()))?;
            info!(
                path = %path.display(),
                states = saved.q_table.size(),
                "resuming from saved Q-table"
            );
            SolverConfig::new().with_warm_start(saved.q_table)
        }
        None => SolverConfig::new().with_q_init(args.q_init.unwrap_or_default()),
    };

    let mut explorer = app.create_explorer(Arc::clone(&maze));
    let mut solver = app.create_solver(Arc::clone(&maze), solver_config);

    let metrics = SharedObserver::new(MetricsObserver::new());
    let mut pipeline = app
        .create_pipeline(config.clone())
        .with_observer(Box::new(metrics.clone()));

    if args.progress {
        pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
    }
    if let Some(interval) = args.print_progress {
        pipeline = pipeline.with_observer(Box::new(ProgressLogObserver::new(interval.get())));
    }
    if let Some(path) = &args.observations {
        let observer = JsonlObserver::new(path)
            .with_context(|| format!("failed to create observations file {}", path.display()))?;
        pipeline = pipeline.with_observer(Box::new(observer));
    }

    let snapshots = (args.snapshot_every.is_some() || args.snapshots.is_some()).then(|| {
        let interval = args
            .snapshot_every
            .map_or_else(|| default_snapshot_interval(config.episodes), NonZeroUsize::get);
        SharedObserver::new(QTableSnapshotObserver::new(interval))
    });
    if let Some(observer) = &snapshots {
        pipeline = pipeline.with_observer(Box::new(observer.clone()));
    }

    let result = pipeline
        .run(&mut explorer, &mut solver)
        .context("training failed")?;
    let report = TrainingReport::new(&result, config.max_steps);
    let metrics = metrics.lock().summary();

    print_section(&format!("Training on {}", args.maze.display()));
    print_kv("Maze", &format!("{}x{}", maze.width(), maze.height()));
    print_kv("Rewards", &config.rewards.to_string());
    print_kv("Seed", &format_opt(config.seed));
    print!("{}", report.render());

    print_subsection("Episode metrics");
    print_kv("Solver off-grid moves", &format_number(metrics.offgrid_moves));
    print_kv(
        "Explorer goal visits",
        &format_number(metrics.explorer_goal_hits),
    );
    print_kv(
        "Avg steps when solved",
        &format_opt(metrics.avg_solved_steps.map(|s| format!("{s:.2}"))),
    );
    print_kv("States learned", &format_number(solver.q_table().size()));

    if args.show_solution {
        let path = solve(&mut solver, config.max_steps);
        print_section("Greedy solution");
        println!("{}", maze.render_with_path(&path.cells));
        print_kv("Reached goal", &path.reached_goal.to_string());
        print_kv("Steps", &path.steps.to_string());
    }

    if let Some(path) = &args.output {
        let metadata = TrainingMetadata {
            episodes_trained: Some(result.episodes),
            max_steps: Some(config.max_steps),
            learning_rate: Some(config.learning_rate),
            discount: Some(config.discount),
            rewards: Some(config.rewards),
            seed: config.seed,
            solved_count: Some(result.solved_count),
            final_epsilon: Some(result.final_epsilon),
            maze: Some(args.maze.display().to_string()),
        };
        app.save_solver(&solver, metadata, path)
            .with_context(|| format!("failed to save Q-table to {}", path.display()))?;
        println!("\nQ-table saved to {}", path.display());
    }

    if let Some(path) = &args.results {
        report
            .write_csv(path)
            .with_context(|| format!("failed to write results to {}", path.display()))?;
        println!("Results written to {}", path.display());
    }

    if let (Some(observer), Some(path)) = (&snapshots, &args.snapshots) {
        let observer = observer.lock();
        observer
            .export(path)
            .with_context(|| format!("failed to write snapshots to {}", path.display()))?;
        println!(
            "{} Q-table snapshots written to {}",
            observer.snapshots().len(),
            path.display()
        );
    }

    if let Some(raw) = &args.summary {
        let summary_path = sanitize_summary_path(raw);
        if summary_path != *raw {
            println!(
                "\nNormalizing summary path to {}",
                summary_path.display()
            );
        }
        if let Some(parent) = summary_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        let summary = TrainingSummaryFile {
            maze: args.maze.display().to_string(),
            config: &config,
            report: &report,
            metrics,
        };
        let file = std::fs::File::create(&summary_path)?;
        serde_json::to_writer_pretty(file, &summary)?;
        println!("Summary written to {}", summary_path.display());
    }

    Ok(())
}
