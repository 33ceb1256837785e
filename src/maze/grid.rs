//! Grid maze representation and movement rules

use std::{fmt, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    types::{Action, Cell},
};

/// A single tile of the maze
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    Open,
    Wall,
}

impl Tile {
    pub fn to_char(self) -> char {
        match self {
            Tile::Open => '.',
            Tile::Wall => '#',
        }
    }
}

/// Rectangular maze with a goal and start cells for both agents.
///
/// Mazes are written as text, one row per line:
///
/// ```text
/// #######
/// #S...G#
/// #.###.#
/// #E....#
/// #######
/// ```
///
/// `#` is a wall, `.` or a space is open floor, `S` marks the solver start,
/// `E` the explorer start (defaults to `S` when absent) and `G` the goal.
///
/// # Examples
///
/// ```
/// use maze_explorer::maze::Maze;
/// use maze_explorer::types::{Action, Cell};
///
/// let maze = Maze::parse("S.G")?;
/// assert_eq!(maze.step(Cell::new(0, 0), Action::Right), Cell::new(0, 1));
/// assert_eq!(maze.step(Cell::new(0, 0), Action::Up), Cell::new(0, 0));
/// # Ok::<(), maze_explorer::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Maze {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
    solver_start: Cell,
    explorer_start: Cell,
    goal: Cell,
}

impl Maze {
    /// Parse a maze from its text form.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMaze`] if the maze is empty, rows have different
    /// lengths, or the solver start or goal is missing or duplicated, and
    /// [`Error::InvalidMazeCharacter`] for unknown glyphs.
    pub fn parse(text: &str) -> Result<Self> {
        let rows: Vec<&str> = text
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .skip_while(|line| line.is_empty())
            .collect();
        // A row of spaces is open floor, so only truly empty lines are dropped.
        let rows: Vec<&str> = {
            let end = rows
                .iter()
                .rposition(|line| !line.is_empty())
                .map_or(0, |idx| idx + 1);
            rows[..end].to_vec()
        };

        if rows.is_empty() {
            return Err(Error::InvalidMaze {
                message: "maze text is empty".to_string(),
            });
        }

        let width = rows[0].chars().count();
        let height = rows.len();
        let mut tiles = Vec::with_capacity(width * height);
        let mut solver_start = None;
        let mut explorer_start = None;
        let mut goal = None;

        for (row, line) in rows.iter().enumerate() {
            let len = line.chars().count();
            if len != width {
                return Err(Error::InvalidMaze {
                    message: format!("row {row} has {len} cells, expected {width}"),
                });
            }

            for (col, character) in line.chars().enumerate() {
                let cell = Cell::new(row, col);
                let tile = match character {
                    '#' => Tile::Wall,
                    '.' | ' ' => Tile::Open,
                    'S' | 's' => {
                        set_once(&mut solver_start, cell, "solver start 'S'")?;
                        Tile::Open
                    }
                    'E' | 'e' => {
                        set_once(&mut explorer_start, cell, "explorer start 'E'")?;
                        Tile::Open
                    }
                    'G' | 'g' => {
                        set_once(&mut goal, cell, "goal 'G'")?;
                        Tile::Open
                    }
                    other => {
                        return Err(Error::InvalidMazeCharacter {
                            character: other,
                            row,
                            col,
                        });
                    }
                };
                tiles.push(tile);
            }
        }

        let solver_start = solver_start.ok_or_else(|| Error::InvalidMaze {
            message: "missing solver start 'S'".to_string(),
        })?;
        let goal = goal.ok_or_else(|| Error::InvalidMaze {
            message: "missing goal 'G'".to_string(),
        })?;

        Ok(Self {
            width,
            height,
            tiles,
            solver_start,
            explorer_start: explorer_start.unwrap_or(solver_start),
            goal,
        })
    }

    /// Read and parse a maze file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            operation: format!("read maze file {path:?}"),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn solver_start(&self) -> Cell {
        self.solver_start
    }

    pub fn explorer_start(&self) -> Cell {
        self.explorer_start
    }

    pub fn goal(&self) -> Cell {
        self.goal
    }

    /// Tile at `cell`, or `None` outside the grid
    pub fn tile(&self, cell: Cell) -> Option<Tile> {
        if cell.row >= self.height || cell.col >= self.width {
            return None;
        }
        Some(self.tiles[cell.row * self.width + cell.col])
    }

    pub fn is_open(&self, cell: Cell) -> bool {
        self.tile(cell) == Some(Tile::Open)
    }

    /// All walkable cells in row-major order.
    pub fn open_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.height)
            .flat_map(move |row| (0..self.width).map(move |col| Cell::new(row, col)))
            .filter(|&cell| self.is_open(cell))
    }

    /// Where an agent standing on `from` ends up after attempting `action`.
    ///
    /// Moves off the grid or into a wall leave the agent where it was.
    pub fn step(&self, from: Cell, action: Action) -> Cell {
        match from.neighbour(action) {
            Some(target) if self.is_open(target) => target,
            _ => from,
        }
    }

    /// Render the maze with `path` cells marked as `*`.
    pub fn render_with_path(&self, path: &[Cell]) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for row in 0..self.height {
            for col in 0..self.width {
                let cell = Cell::new(row, col);
                out.push(self.glyph(cell, path.contains(&cell)));
            }
            if row + 1 < self.height {
                out.push('\n');
            }
        }
        out
    }

    fn glyph(&self, cell: Cell, on_path: bool) -> char {
        if cell == self.goal {
            'G'
        } else if cell == self.solver_start {
            'S'
        } else if cell == self.explorer_start {
            'E'
        } else if on_path {
            '*'
        } else {
            self.tile(cell).map_or(' ', Tile::to_char)
        }
    }
}

fn set_once(slot: &mut Option<Cell>, cell: Cell, what: &str) -> Result<()> {
    if let Some(existing) = slot {
        return Err(Error::InvalidMaze {
            message: format!("duplicate {what} at {cell} (first at {existing})"),
        });
    }
    *slot = Some(cell);
    Ok(())
}

impl fmt::Display for Maze {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_with_path(&[]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CORRIDOR: &str = "\
#######
#S...G#
#.###.#
#E....#
#######
";

    #[test]
    fn test_parse_corridor() {
        let maze = Maze::parse(CORRIDOR).unwrap();
        assert_eq!(maze.width(), 7);
        assert_eq!(maze.height(), 5);
        assert_eq!(maze.solver_start(), Cell::new(1, 1));
        assert_eq!(maze.explorer_start(), Cell::new(3, 1));
        assert_eq!(maze.goal(), Cell::new(1, 5));
        assert_eq!(maze.open_cells().count(), 12);
    }

    #[test]
    fn test_explorer_defaults_to_solver_start() {
        let maze = Maze::parse("S..G").unwrap();
        assert_eq!(maze.explorer_start(), maze.solver_start());
    }

    #[test]
    fn test_surrounding_blank_lines_ignored() {
        let maze = Maze::parse("\n\nS.G\n\n").unwrap();
        assert_eq!(maze.height(), 1);
    }

    #[test]
    fn test_edge_rows_of_spaces_are_open_floor() {
        let maze = Maze::parse("   \nS.G\n   ").unwrap();
        assert_eq!(maze.height(), 3);
        assert_eq!(maze.solver_start(), Cell::new(1, 0));
        assert_eq!(maze.goal(), Cell::new(1, 2));
        assert_eq!(maze.step(Cell::new(1, 1), Action::Up), Cell::new(0, 1));
    }

    #[test]
    fn test_walls_and_edges_block_movement() {
        let maze = Maze::parse(CORRIDOR).unwrap();
        let start = maze.solver_start();
        assert_eq!(maze.step(start, Action::Up), start);
        assert_eq!(maze.step(start, Action::Left), start);
        assert_eq!(maze.step(start, Action::Right), Cell::new(1, 2));
        assert_eq!(maze.step(start, Action::Down), Cell::new(2, 1));

        let edge = Maze::parse("SG").unwrap();
        assert_eq!(edge.step(Cell::new(0, 0), Action::Up), Cell::new(0, 0));
        assert_eq!(edge.step(Cell::new(0, 1), Action::Right), Cell::new(0, 1));
    }

    #[test]
    fn test_missing_goal_rejected() {
        let err = Maze::parse("S..").unwrap_err();
        assert!(matches!(err, Error::InvalidMaze { .. }));
    }

    #[test]
    fn test_duplicate_start_rejected() {
        let err = Maze::parse("S.S.G").unwrap_err();
        assert!(matches!(err, Error::InvalidMaze { .. }));
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = Maze::parse("S..\n.G").unwrap_err();
        assert!(matches!(err, Error::InvalidMaze { .. }));
    }

    #[test]
    fn test_unknown_glyph_rejected() {
        let err = Maze::parse("S.?G").unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidMazeCharacter {
                character: '?',
                row: 0,
                col: 2
            }
        ));
    }

    #[test]
    fn test_render_marks_path() {
        let maze = Maze::parse("S..G").unwrap();
        let path = [Cell::new(0, 0), Cell::new(0, 1), Cell::new(0, 2), Cell::new(0, 3)];
        assert_eq!(maze.render_with_path(&path), "S**G");
        assert_eq!(maze.to_string(), "S..G");
    }
}
