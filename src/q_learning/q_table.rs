//! Q-table implementation for tabular Q-learning

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{ACTION_COUNT, Action, Cell};

/// One row of action-values, indexed by [`Action::index`].
pub type QRow = [f64; ACTION_COUNT];

/// Q-table mapping maze cells to their four action-values.
///
/// Rows are fixed-size arrays, so every stored state always has exactly one
/// value per action. Unvisited cells read as a row filled with `q_init`;
/// writing any entry stores the whole row. Rows are never removed except by
/// [`QTable::reset`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "QTableRepr", into = "QTableRepr")]
pub struct QTable {
    /// Action-values per visited cell
    q_values: HashMap<Cell, QRow>,
    /// Initial value for unseen state-action pairs
    q_init: f64,
}

impl QTable {
    /// Create an empty Q-table whose unseen entries read as `q_init`
    pub fn new(q_init: f64) -> Self {
        Self {
            q_values: HashMap::new(),
            q_init,
        }
    }

    pub fn q_init(&self) -> f64 {
        self.q_init
    }

    /// All four action-values for `state`
    pub fn row(&self, state: Cell) -> QRow {
        self.q_values
            .get(&state)
            .copied()
            .unwrap_or([self.q_init; ACTION_COUNT])
    }

    /// Q-value for a state-action pair
    pub fn get(&self, state: Cell, action: Action) -> f64 {
        self.row(state)[action.index()]
    }

    /// Set Q-value for a state-action pair
    pub fn set(&mut self, state: Cell, action: Action, value: f64) {
        let q_init = self.q_init;
        self.q_values
            .entry(state)
            .or_insert([q_init; ACTION_COUNT])[action.index()] = value;
    }

    /// Largest action-value in `state`
    pub fn max_q(&self, state: Cell) -> f64 {
        self.row(state)
            .into_iter()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Greedy action for `state`.
    ///
    /// Ties go to the lowest action index, so the choice is deterministic for
    /// a given table.
    pub fn greedy_action(&self, state: Cell) -> Action {
        let row = self.row(state);
        let mut best = 0;
        for (index, &value) in row.iter().enumerate().skip(1) {
            if value > row[best] {
                best = index;
            }
        }
        Action::ALL[best]
    }

    pub fn contains(&self, state: Cell) -> bool {
        self.q_values.contains_key(&state)
    }

    /// Visited states and their rows, in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (Cell, &QRow)> {
        self.q_values.iter().map(|(cell, row)| (*cell, row))
    }

    /// Visited states sorted row-major, for stable output
    pub fn sorted_states(&self) -> Vec<Cell> {
        let mut states: Vec<Cell> = self.q_values.keys().copied().collect();
        states.sort();
        states
    }

    /// Number of states with a stored row
    pub fn size(&self) -> usize {
        self.q_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.q_values.is_empty()
    }
}

impl Default for QTable {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// Wire form of [`QTable`]: struct keys are not valid JSON object keys, so the
/// map is stored as a list of entries.
#[derive(Serialize, Deserialize)]
struct QTableRepr {
    q_init: f64,
    entries: Vec<(Cell, QRow)>,
}

impl From<QTable> for QTableRepr {
    fn from(table: QTable) -> Self {
        let mut entries: Vec<(Cell, QRow)> = table.q_values.into_iter().collect();
        entries.sort_by_key(|(cell, _)| *cell);
        Self {
            q_init: table.q_init,
            entries,
        }
    }
}

impl From<QTableRepr> for QTable {
    fn from(repr: QTableRepr) -> Self {
        Self {
            q_values: repr.entries.into_iter().collect(),
            q_init: repr.q_init,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATE: Cell = Cell::new(1, 1);

    #[test]
    fn test_qtable_initialization() {
        let qtable = QTable::new(0.0);
        assert_eq!(qtable.get(STATE, Action::Up), 0.0);
        assert_eq!(qtable.row(STATE), [0.0; 4]);
        assert!(qtable.is_empty());
    }

    #[test]
    fn test_qtable_custom_init() {
        let qtable = QTable::new(0.25);
        assert_eq!(qtable.row(STATE), [0.25; 4]);
    }

    #[test]
    fn test_qtable_set_get() {
        let mut qtable = QTable::default();
        qtable.set(STATE, Action::Left, 1.5);
        assert_eq!(qtable.get(STATE, Action::Left), 1.5);
        assert_eq!(qtable.row(STATE), [0.0, 0.0, 1.5, 0.0]);
        assert_eq!(qtable.size(), 1);
    }

    #[test]
    fn test_max_q() {
        let mut qtable = QTable::default();
        qtable.set(STATE, Action::Up, -0.5);
        qtable.set(STATE, Action::Down, 1.5);
        qtable.set(STATE, Action::Left, 0.8);
        assert_eq!(qtable.max_q(STATE), 1.5);
    }

    #[test]
    fn test_greedy_action() {
        let mut qtable = QTable::default();
        qtable.set(STATE, Action::Up, 0.5);
        qtable.set(STATE, Action::Down, 1.5);
        qtable.set(STATE, Action::Left, 0.8);
        assert_eq!(qtable.greedy_action(STATE), Action::Down);
    }

    #[test]
    fn test_greedy_action_prefers_first_on_ties() {
        let mut qtable = QTable::default();
        assert_eq!(qtable.greedy_action(STATE), Action::Up);

        qtable.set(STATE, Action::Up, -1.0);
        qtable.set(STATE, Action::Left, 2.0);
        qtable.set(STATE, Action::Right, 2.0);
        assert_eq!(qtable.greedy_action(STATE), Action::Left);
    }

    #[test]
    fn test_json_roundtrip_keeps_rows() {
        let mut qtable = QTable::new(0.1);
        qtable.set(STATE, Action::Right, 3.0);
        qtable.set(Cell::new(0, 2), Action::Up, -1.0);

        let json = serde_json::to_string(&qtable).unwrap();
        let restored: QTable = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, qtable);
    }
}
