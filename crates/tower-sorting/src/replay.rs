//! Replay of a move sequence against the puzzle rules.
//!
//! Used to double-check a path produced by the search, or one read from
//! elsewhere, before reporting it.

use crate::error::ReplayError;
use crate::state::{Move, TowerState};

/// Final position of a replayed move sequence.
#[derive(Debug, Clone)]
pub struct ReplayReport {
    pub final_state: TowerState,
    pub moves_applied: usize,
    pub solved: bool,
}

/// Apply `moves` to `initial`, rejecting the first move the rules forbid.
pub fn replay(initial: &TowerState, moves: &[Move]) -> Result<ReplayReport, ReplayError> {
    let mut state = initial.clone();
    for (step, &mv) in moves.iter().enumerate() {
        let next = state
            .check_move(mv)
            .and_then(|()| state.transfer(mv))
            .map_err(|source| ReplayError { step, source })?;
        state = next;
    }

    Ok(ReplayReport {
        solved: state.is_sorted(),
        final_state: state,
        moves_applied: moves.len(),
    })
}

/// Does `moves` legally take `initial` to a sorted state?
pub fn verify_solution(initial: &TowerState, moves: &[Move]) -> bool {
    replay(initial, moves).map_or(false, |report| report.solved)
}
