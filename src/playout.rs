//! Random play: a uniformly random opponent and random house layouts.
//!
//! Used by the self-play demo and by tests that need long legal move
//! sequences. All randomness comes from a caller-owned `fastrand::Rng` so
//! runs are reproducible from a seed.

use crate::board::{Cell, Move};
use crate::constants::{FIELD_HEIGHT, FIELD_WIDTH, HOUSE_COUNT};
use crate::game::{is_starting_cell, GameState};
use crate::movegen::all_moves;
use crate::rules::classify;

/// A uniformly random candidate for the side to move.
pub fn random_move(state: &GameState, rng: &mut fastrand::Rng) -> Move {
    let moves = all_moves(state);
    moves
        .get(rng.usize(..moves.len()))
        .copied()
        .unwrap_or(Move::PASS)
}

/// Play random moves for both sides until the game is over.
/// Returns the number of moves played.
pub fn playout(state: &mut GameState, rng: &mut fastrand::Rng) -> u32 {
    let start = state.done_steps;
    while !state.is_over() {
        let mv = random_move(state, rng);
        let kind = classify(&state.board, mv);
        state.play(mv, kind);
    }
    state.done_steps - start
}

/// `HOUSE_COUNT` distinct house cells away from the starting pieces.
pub fn random_houses(rng: &mut fastrand::Rng) -> Vec<Cell> {
    let mut free: Vec<Cell> = (0..FIELD_HEIGHT as i32)
        .flat_map(|row| (0..FIELD_WIDTH as i32).map(move |col| Cell::new(row, col)))
        .filter(|&c| !is_starting_cell(c))
        .collect();
    rng.shuffle(&mut free);
    free.truncate(HOUSE_COUNT);
    free
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_houses_are_distinct_and_free() {
        let mut rng = fastrand::Rng::with_seed(7);
        let houses = random_houses(&mut rng);
        assert_eq!(houses.len(), HOUSE_COUNT);
        let mut sorted = houses.clone();
        sorted.sort_by_key(|c| (c.row, c.col));
        sorted.dedup();
        assert_eq!(sorted.len(), HOUSE_COUNT);
        assert!(houses.iter().all(|&c| c.is_valid() && !is_starting_cell(c)));
    }

    #[test]
    fn test_playout_reaches_the_end() {
        let mut rng = fastrand::Rng::with_seed(42);
        let houses = random_houses(&mut rng);
        let mut state = GameState::setup(&houses, 0).unwrap().with_max_steps(60);
        let played = playout(&mut state, &mut rng);
        assert!(state.is_over());
        assert!(played <= 60);
        assert!(state.board.is_consistent());
    }
}
