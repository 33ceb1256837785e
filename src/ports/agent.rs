//! Agent port - the capability set the training core needs from a maze walker
//!
//! The core never moves agents itself. It asks an agent to attempt an action
//! and then reads back where the agent ended up, where it came from, and where
//! it is trying to go.

use crate::types::{Action, Cell};

/// An agent that walks a maze one discrete action at a time.
///
/// After [`choose_action`](MazeAgent::choose_action), `previous_state` holds
/// the cell the agent stood on before the attempt and `current_state` the cell
/// it stands on now. The two are equal when the move was illegal (off the grid
/// or into a wall); that equality is how the reward policy detects an
/// off-grid move.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use maze_explorer::{
///     maze::{GridAgent, Maze},
///     ports::MazeAgent,
///     types::Action,
/// };
///
/// let maze = Arc::new(Maze::parse("S.G")?);
/// let mut agent = GridAgent::solver(maze);
/// agent.choose_action(Action::Right);
/// assert_ne!(agent.current_state(), agent.previous_state());
/// agent.choose_action(Action::Up);
/// assert_eq!(agent.current_state(), agent.previous_state());
/// # Ok::<(), maze_explorer::Error>(())
/// ```
pub trait MazeAgent {
    /// Return to the start cell. Both current and previous state become the
    /// start cell.
    fn reset(&mut self);

    /// Attempt a move, updating previous and current state.
    fn choose_action(&mut self, action: Action);

    /// Cell the agent currently occupies
    fn current_state(&self) -> Cell;

    /// Cell the agent occupied before its last action
    fn previous_state(&self) -> Cell;

    /// Cell the agent is trying to reach
    fn goal_state(&self) -> Cell;

    /// Whether the agent currently stands on its goal.
    fn at_goal(&self) -> bool {
        self.current_state() == self.goal_state()
    }
}

impl<A: MazeAgent + ?Sized> MazeAgent for &mut A {
    fn reset(&mut self) {
        (**self).reset();
    }

    fn choose_action(&mut self, action: Action) {
        (**self).choose_action(action);
    }

    fn current_state(&self) -> Cell {
        (**self).current_state()
    }

    fn previous_state(&self) -> Cell {
        (**self).previous_state()
    }

    fn goal_state(&self) -> Cell {
        (**self).goal_state()
    }
}
