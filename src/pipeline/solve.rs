//! Greedy rollout of a trained solver

use serde::{Deserialize, Serialize};

use crate::{maze::Solver, ports::MazeAgent, types::Cell};

/// Cells visited by a greedy rollout, starting cell included
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolvePath {
    pub cells: Vec<Cell>,
    pub reached_goal: bool,
    pub steps: usize,
}

/// Walk the solver from its start following the greedy action in every
/// cell, until it reaches the goal or `max_steps` actions have been taken.
///
/// The Q-table is only read. Ties go to the lowest action index, so the same
/// table always produces the same path.
pub fn solve<A: MazeAgent>(solver: &mut Solver<A>, max_steps: usize) -> SolvePath {
    solver.reset();
    let mut cells = vec![solver.current_state()];
    let mut steps = 0;

    while !solver.at_goal() && steps < max_steps {
        let action = solver.q_table().greedy_action(solver.current_state());
        solver.choose_action(action);
        cells.push(solver.current_state());
        steps += 1;
    }

    SolvePath {
        cells,
        reached_goal: solver.at_goal(),
        steps,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{maze::Maze, types::Action};

    fn solver(text: &str) -> Solver {
        Solver::for_maze(Arc::new(Maze::parse(text).unwrap()))
    }

    #[test]
    fn test_follows_greedy_actions_to_goal() {
        let mut solver = solver("S.G");
        solver.q_table_mut().set(Cell::new(0, 0), Action::Right, 1.0);
        solver.q_table_mut().set(Cell::new(0, 1), Action::Right, 1.0);

        let path = solve(&mut solver, 10);
        assert!(path.reached_goal);
        assert_eq!(path.steps, 2);
        assert_eq!(
            path.cells,
            vec![Cell::new(0, 0), Cell::new(0, 1), Cell::new(0, 2)]
        );
    }

    #[test]
    fn test_untrained_table_stalls_within_budget() {
        // An all-zero table picks Up everywhere, which is blocked on a one-row maze
        let mut solver = solver("S.G");
        let path = solve(&mut solver, 4);
        assert!(!path.reached_goal);
        assert_eq!(path.steps, 4);
        assert!(path.cells.iter().all(|&cell| cell == Cell::new(0, 0)));
    }

    #[test]
    fn test_solve_leaves_table_untouched() {
        let mut solver = solver("S.G");
        solver.q_table_mut().set(Cell::new(0, 0), Action::Right, 1.0);
        let before = solver.q_table().clone();
        solve(&mut solver, 10);
        assert_eq!(solver.q_table(), &before);
    }
}
