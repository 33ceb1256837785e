//! Agents that walk the maze

use std::sync::Arc;

use super::grid::Maze;
use crate::{
    ports::MazeAgent,
    q_learning::QTable,
    types::{Action, Cell},
};

/// Agent that moves on a [`Maze`] according to its walls and edges.
#[derive(Debug, Clone)]
pub struct GridAgent {
    maze: Arc<Maze>,
    start: Cell,
    goal: Cell,
    current: Cell,
    previous: Cell,
}

impl GridAgent {
    /// Create an agent standing on `start` and heading for `goal`.
    pub fn new(maze: Arc<Maze>, start: Cell, goal: Cell) -> Self {
        Self {
            maze,
            start,
            goal,
            current: start,
            previous: start,
        }
    }

    /// Agent placed on the maze's solver start.
    pub fn solver(maze: Arc<Maze>) -> Self {
        let (start, goal) = (maze.solver_start(), maze.goal());
        Self::new(maze, start, goal)
    }

    /// Agent placed on the maze's explorer start.
    pub fn explorer(maze: Arc<Maze>) -> Self {
        let (start, goal) = (maze.explorer_start(), maze.goal());
        Self::new(maze, start, goal)
    }
}

impl MazeAgent for GridAgent {
    fn reset(&mut self) {
        self.current = self.start;
        self.previous = self.start;
    }

    fn choose_action(&mut self, action: Action) {
        self.previous = self.current;
        self.current = self.maze.step(self.current, action);
    }

    fn current_state(&self) -> Cell {
        self.current
    }

    fn previous_state(&self) -> Cell {
        self.previous
    }

    fn goal_state(&self) -> Cell {
        self.goal
    }
}

/// The learning agent: a maze walker plus the Q-table it owns.
///
/// There is exactly one Q-table per training run and it lives here. The
/// explorer's experience is written into this same table by the training
/// pipeline.
#[derive(Debug, Clone)]
pub struct Solver<A = GridAgent> {
    agent: A,
    q_table: QTable,
}

impl<A: MazeAgent> Solver<A> {
    pub fn new(agent: A, q_table: QTable) -> Self {
        Self { agent, q_table }
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    pub fn q_table_mut(&mut self) -> &mut QTable {
        &mut self.q_table
    }

    /// Borrow the walker and the Q-table at the same time.
    pub fn parts_mut(&mut self) -> (&mut A, &mut QTable) {
        (&mut self.agent, &mut self.q_table)
    }
}

impl Solver<GridAgent> {
    /// Solver with an empty Q-table placed on the maze's solver start.
    pub fn for_maze(maze: Arc<Maze>) -> Self {
        Self::new(GridAgent::solver(maze), QTable::default())
    }
}

impl<A: MazeAgent> MazeAgent for Solver<A> {
    fn reset(&mut self) {
        self.agent.reset();
    }

    fn choose_action(&mut self, action: Action) {
        self.agent.choose_action(action);
    }

    fn current_state(&self) -> Cell {
        self.agent.current_state()
    }

    fn previous_state(&self) -> Cell {
        self.agent.previous_state()
    }

    fn goal_state(&self) -> Cell {
        self.agent.goal_state()
    }
}
