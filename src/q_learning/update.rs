//! Q-learning update rule
//!
//! Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)]
//!
//! except that a move reaching the goal writes the goal reward directly
//! instead of blending it.

use serde::{Deserialize, Serialize};

use super::{q_table::QTable, reward::StepOutcome};
use crate::{
    Error, Result,
    types::{Action, Cell},
};

/// A single observed move, ready to be learned from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    /// Cell the agent moved from
    pub previous: Cell,
    /// Action attempted
    pub action: Action,
    /// Cell the agent ended on
    pub current: Cell,
    /// Reward assigned to the move
    pub reward: f64,
    /// Classification of the move
    pub outcome: StepOutcome,
}

/// Learning-rate and discount parameters of the Bellman update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UpdateRule {
    /// Learning rate α in (0, 1]
    pub learning_rate: f64,
    /// Discount factor γ in [0, 1]
    pub discount: f64,
}

impl UpdateRule {
    pub fn new(learning_rate: f64, discount: f64) -> Self {
        Self {
            learning_rate,
            discount,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(Error::config(format!(
                "learning rate must be in (0, 1], got {}",
                self.learning_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.discount) {
            return Err(Error::config(format!(
                "discount must be in [0, 1], got {}",
                self.discount
            )));
        }
        Ok(())
    }

    /// Value the update would write for `transition`, without writing it.
    pub fn target(&self, q_table: &QTable, transition: &Transition) -> f64 {
        if transition.outcome.is_goal() {
            return transition.reward;
        }

        let max_future_q = q_table.max_q(transition.current);
        let current_q = q_table.get(transition.previous, transition.action);
        current_q
            + self.learning_rate * (transition.reward + self.discount * max_future_q - current_q)
    }

    /// Apply the update to `Q[previous][action]` and return the new value.
    pub fn apply(&self, q_table: &mut QTable, transition: &Transition) -> f64 {
        let new_q = self.target(q_table, transition);
        q_table.set(transition.previous, transition.action, new_q);
        new_q
    }
}

impl Default for UpdateRule {
    fn default() -> Self {
        Self::new(0.1, 0.9)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    const FROM: Cell = Cell::new(1, 1);
    const TO: Cell = Cell::new(1, 2);

    fn transition(reward: f64, outcome: StepOutcome) -> Transition {
        Transition {
            previous: FROM,
            action: Action::Right,
            current: TO,
            reward,
            outcome,
        }
    }

    #[test]
    fn test_greedy_rule_copies_immediate_reward() {
        let rule = UpdateRule::new(1.0, 0.0);
        let mut qtable = QTable::default();

        let moved = rule.apply(&mut qtable, &transition(-1.0, StepOutcome::Moved));
        assert_eq!(moved, -1.0);

        let mut qtable = QTable::default();
        let bumped = rule.apply(
            &mut qtable,
            &Transition {
                current: FROM,
                ..transition(-5.0, StepOutcome::OffGrid)
            },
        );
        assert_eq!(bumped, -5.0);
        assert_eq!(qtable.get(FROM, Action::Right), -5.0);
    }

    #[test]
    fn test_goal_update_ignores_prior_value() {
        let rule = UpdateRule::new(0.3, 0.95);
        let mut qtable = QTable::default();
        qtable.set(FROM, Action::Right, -42.0);
        qtable.set(TO, Action::Up, 100.0);

        rule.apply(&mut qtable, &transition(10.0, StepOutcome::Goal));
        assert_eq!(qtable.get(FROM, Action::Right), 10.0);
    }

    #[test]
    fn test_bootstraps_from_best_next_action() {
        let rule = UpdateRule::new(0.5, 0.99);
        let mut qtable = QTable::default();
        qtable.set(TO, Action::Up, 1.0);
        qtable.set(TO, Action::Down, 2.0);

        // 0 + 0.5 * (0 + 0.99 * 2 - 0) = 0.99
        let new_q = rule.apply(&mut qtable, &transition(0.0, StepOutcome::Moved));
        assert!((new_q - 0.99).abs() < 1e-12);
    }

    #[test]
    fn test_update_materializes_full_row() {
        let rule = UpdateRule::default();
        let mut qtable = QTable::default();
        rule.apply(&mut qtable, &transition(-1.0, StepOutcome::Moved));
        assert!(qtable.contains(FROM));
        assert_eq!(qtable.row(FROM).len(), 4);
    }

    #[test]
    fn test_validate_bounds() {
        assert!(UpdateRule::new(1.0, 0.0).validate().is_ok());
        assert!(UpdateRule::new(0.0, 0.5).validate().is_err());
        assert!(UpdateRule::new(1.5, 0.5).validate().is_err());
        assert!(UpdateRule::new(0.5, 1.1).validate().is_err());
        assert!(UpdateRule::new(f64::NAN, 0.5).validate().is_err());
    }

    proptest! {
        #[test]
        fn prop_non_terminal_update_is_convex_blend(
            learning_rate in 0.0f64..=1.0,
            discount in 0.0f64..=1.0,
            current_q in -100.0f64..100.0,
            next_best in -100.0f64..100.0,
            reward in -10.0f64..0.0,
        ) {
            let rule = UpdateRule::new(learning_rate, discount);
            let mut qtable = QTable::default();
            qtable.set(FROM, Action::Right, current_q);
            qtable.set(TO, Action::Left, next_best);
            for action in [Action::Up, Action::Down, Action::Right] {
                qtable.set(TO, action, next_best - 1.0);
            }

            let td_target = reward + discount * next_best;
            let new_q = rule.apply(&mut qtable, &transition(reward, StepOutcome::Moved));

            let (lo, hi) = if current_q <= td_target {
                (current_q, td_target)
            } else {
                (td_target, current_q)
            };
            prop_assert!(new_q >= lo - 1e-9 && new_q <= hi + 1e-9);
        }

        #[test]
        fn prop_goal_update_writes_goal_reward(
            learning_rate in 0.01f64..=1.0,
            discount in 0.0f64..=1.0,
            prior in -100.0f64..100.0,
            goal_reward in 0.0f64..100.0,
        ) {
            let rule = UpdateRule::new(learning_rate, discount);
            let mut qtable = QTable::default();
            qtable.set(FROM, Action::Right, prior);

            rule.apply(&mut qtable, &transition(goal_reward, StepOutcome::Goal));
            prop_assert_eq!(qtable.get(FROM, Action::Right), goal_reward);
        }
    }
}
