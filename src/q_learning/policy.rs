//! Action selection for the explorer and the solver

use rand::Rng;

use super::q_table::QTable;
use crate::types::{ACTION_COUNT, Action, AgentRole, Cell};

/// Uniformly random action
pub fn random_action<R: Rng + ?Sized>(rng: &mut R) -> Action {
    Action::ALL[rng.random_range(0..ACTION_COUNT)]
}

/// ε-greedy action selection.
///
/// Draws a uniform float in [0, 1); if it exceeds `epsilon` the greedy action
/// for `state` is taken, otherwise a random one. With `epsilon = 0` the
/// policy is purely greedy, with `epsilon = 1` purely random.
pub fn epsilon_greedy<R: Rng + ?Sized>(
    q_table: &QTable,
    state: Cell,
    epsilon: f64,
    rng: &mut R,
) -> Action {
    if rng.random::<f64>() > epsilon {
        q_table.greedy_action(state)
    } else {
        random_action(rng)
    }
}

/// Pick the next action for an agent in `role`.
///
/// The explorer always walks randomly; the solver follows ε-greedy over the
/// shared Q-table.
pub fn select_action<R: Rng + ?Sized>(
    role: AgentRole,
    q_table: &QTable,
    state: Cell,
    epsilon: f64,
    rng: &mut R,
) -> Action {
    match role {
        AgentRole::Explorer => random_action(rng),
        AgentRole::Solver => epsilon_greedy(q_table, state, epsilon, rng),
    }
}
