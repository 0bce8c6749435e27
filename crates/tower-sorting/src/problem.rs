//! The tower sorting puzzle as a search [`Problem`].
//!
//! A disk may move from the top of one tower onto another tower when the
//! target is empty or exposes a disk of the same color, and the target has
//! room left. The puzzle is solved when every tower is monochrome.

use crate::search::Problem;
use crate::state::{Move, TowerState};

#[derive(Debug, Clone)]
pub struct TowerSorting {
    initial: TowerState,
}

impl TowerSorting {
    pub fn new(initial: TowerState) -> Self {
        Self { initial }
    }

    pub fn tower_count(&self) -> usize {
        self.initial.tower_count()
    }

    pub fn capacity(&self) -> usize {
        self.initial.capacity()
    }
}

impl Problem for TowerSorting {
    type State = TowerState;
    type Action = Move;

    fn initial(&self) -> &TowerState {
        &self.initial
    }

    fn actions(&self, state: &TowerState) -> Vec<Move> {
        state.legal_moves()
    }

    /// # Panics
    ///
    /// Panics if the source tower of `action` is empty or out of range;
    /// actions produced by [`actions`](Problem::actions) never are.
    fn result(&self, state: &TowerState, action: &Move) -> TowerState {
        match state.transfer(*action) {
            Ok(next) => next,
            Err(err) => panic!("{action} applied to an invalid state: {err}"),
        }
    }

    fn goal_test(&self, state: &TowerState) -> bool {
        state.is_sorted()
    }

    fn path_cost(&self, cost: u64, _from: &TowerState, _action: &Move, _to: &TowerState) -> u64 {
        cost + 1
    }
}
