//! Inspect command - Show metadata and learned values of a saved Q-table

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    app::App,
    cli::output::{format_number, format_opt, print_kv, print_section, print_subsection},
    maze::Maze,
    q_learning::QTable,
    types::{Action, Cell},
};

#[derive(Parser, Debug)]
#[command(about = "Show what a saved Q-table contains")]
pub struct InspectArgs {
    /// Trained Q-table (MessagePack)
    pub q_table: PathBuf,

    /// Draw the greedy action of every learned cell over this maze
    #[arg(long)]
    pub maze: Option<PathBuf>,

    /// Print every row of the table
    #[arg(long)]
    pub rows: bool,
}

fn arrow(action: Action) -> char {
    match action {
        Action::Up => '^',
        Action::Down => 'v',
        Action::Left => '<',
        Action::Right => '>',
    }
}

/// Maze drawing with each learned open cell replaced by its greedy arrow
pub fn render_policy(maze: &Maze, q_table: &QTable) -> String {
    let mut out = String::new();
    for row in 0..maze.height() {
        for col in 0..maze.width() {
            let cell = Cell::new(row, col);
            let glyph = if cell == maze.goal() {
                'G'
            } else if maze.is_open(cell) && q_table.contains(cell) {
                arrow(q_table.greedy_action(cell))
            } else if maze.is_open(cell) {
                '.'
            } else {
                '#'
            };
            out.push(glyph);
        }
        out.push('\n');
    }
    out
}

pub fn execute(args: InspectArgs) -> Result<()> {
    let app = App::new();
    let saved = app
        .repository()
        .load(&args.q_table)
        .with_context(|| format!("failed to load Q-table {}", args.q_table.display()))?;
    let table = &saved.q_table;
    let metadata = &saved.metadata;

    print_section(&format!("Q-table {}", args.q_table.display()));
    print_kv("Format version", &saved.version.to_string());
    print_kv("States", &format_number(table.size()));
    print_kv("Initial value", &table.q_init().to_string());
    if let Some((low, high)) = value_range(table) {
        print_kv("Value range", &format!("{low:.3} .. {high:.3}"));
    }

    print_subsection("Training");
    print_kv("Maze", &format_opt(metadata.maze.as_ref()));
    print_kv("Episodes", &format_opt(metadata.episodes_trained));
    print_kv("Max steps", &format_opt(metadata.max_steps));
    print_kv("Learning rate", &format_opt(metadata.learning_rate));
    print_kv("Discount", &format_opt(metadata.discount));
    print_kv("Rewards", &format_opt(metadata.rewards));
    print_kv("Seed", &format_opt(metadata.seed));
    print_kv("Solved episodes", &format_opt(metadata.solved_count));
    print_kv("Final epsilon", &format_opt(metadata.final_epsilon));

    if let Some(path) = &args.maze {
        let maze = app
            .load_maze(path)
            .with_context(|| format!("failed to load maze {}", path.display()))?;
        print_subsection("Greedy policy");
        print!("{}", render_policy(&maze, table));
    }

    if args.rows {
        print_subsection("Rows (up, down, left, right)");
        for cell in table.sorted_states() {
            let [up, down, left, right] = table.row(cell);
            let label = cell.to_string();
            println!("  {label:>10} {up:>9.3} {down:>9.3} {left:>9.3} {right:>9.3}");
        }
    }

    Ok(())
}

fn value_range(table: &QTable) -> Option<(f64, f64)> {
    table
        .iter()
        .flat_map(|(_, row)| row.iter().copied())
        .fold(None, |range, value| match range {
            None => Some((value, value)),
            Some((low, high)) => Some((low.min(value), high.max(value))),
        })
}
