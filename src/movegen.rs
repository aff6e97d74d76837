//! Candidate move generation for the side to move.
//!
//! The scan is partial: every piece tries its 8 neighbours and only the
//! Magician is checked for swaps. The Acrobat's own re-scan uses the same
//! offsets looking for DoubleMove, so jumps two cells out are never listed
//! even though [`classify`] accepts them. The list always starts with the
//! pass move and may contain duplicates.

use crate::board::{Entity, EntityType, Move};
use crate::constants::DELTA;
use crate::game::GameState;
use crate::rules::{classify, MoveKind};

pub fn all_moves(state: &GameState) -> Vec<Move> {
    let board = &state.board;
    let player = state.current_player;
    let mut moves = vec![Move::PASS];

    for (entity, cell) in board.active_entities() {
        if entity.owner != player {
            continue;
        }
        for (dr, dc) in DELTA {
            let mv = Move::new(cell, cell.offset(dr, dc));
            if matches!(
                classify(board, mv),
                MoveKind::BaseMove | MoveKind::DoubleMove | MoveKind::Push | MoveKind::Pass
            ) {
                moves.push(mv);
            }
        }
    }

    if let Some(cell) = board.active_position(Entity::new(player, EntityType::Acrobat)) {
        for (dr, dc) in DELTA {
            let mv = Move::new(cell, cell.offset(dr, dc));
            if classify(board, mv) == MoveKind::DoubleMove {
                moves.push(mv);
            }
        }
    }

    if let Some(cell) = board.active_position(Entity::new(player, EntityType::Magician)) {
        for (_, target) in board.active_entities() {
            let mv = Move::new(cell, target);
            if classify(board, mv) == MoveKind::Swap {
                moves.push(mv);
            }
        }
    }

    moves
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, Cell};

    fn state_with(houses: &[Cell], pieces: &[(Cell, Entity)], player: u8) -> GameState {
        let mut board = Board::new(houses).unwrap();
        for &(cell, entity) in pieces {
            board.place(cell, entity).unwrap();
        }
        let mut state = GameState::new(player, board);
        state.current_player = player;
        state
    }

    #[test]
    fn test_pass_always_first() {
        let state = state_with(&[], &[], 0);
        assert_eq!(all_moves(&state), vec![Move::PASS]);
    }

    #[test]
    fn test_lone_clown_has_eight_steps() {
        let state = state_with(&[], &[(Cell::new(4, 4), Entity::new(0, EntityType::Clown))], 0);
        let moves = all_moves(&state);
        assert_eq!(moves.len(), 9);
        assert!(moves.contains(&Move::new(Cell::new(4, 4), Cell::new(3, 3))));
    }

    #[test]
    fn test_only_side_to_move_is_enumerated() {
        let state = state_with(
            &[],
            &[
                (Cell::new(0, 0), Entity::new(0, EntityType::Clown)),
                (Cell::new(8, 11), Entity::new(1, EntityType::Clown)),
            ],
            1,
        );
        let moves = all_moves(&state);
        assert!(moves.iter().skip(1).all(|m| m.from == Cell::new(8, 11)));
        assert_eq!(moves.len(), 4);
    }

    #[test]
    fn test_acrobat_rescan_adds_no_jumps() {
        let from = Cell::new(4, 4);
        let state = state_with(&[], &[(from, Entity::new(0, EntityType::Acrobat))], 0);
        let moves = all_moves(&state);
        // pass + 8 steps
        assert_eq!(moves.len(), 9);
        let jump = Move::new(from, Cell::new(4, 6));
        assert_eq!(classify(&state.board, jump), MoveKind::DoubleMove);
        assert!(!moves.contains(&jump));
        assert!(!moves.contains(&Move::new(from, Cell::new(2, 2))));
    }

    #[test]
    fn test_magician_swaps_listed() {
        let magician = Cell::new(0, 0);
        let state = state_with(
            &[],
            &[
                (magician, Entity::new(0, EntityType::Magician)),
                (Cell::new(6, 6), Entity::new(1, EntityType::Acrobat)),
                (Cell::new(7, 7), Entity::new(1, EntityType::Magician)),
            ],
            0,
        );
        let moves = all_moves(&state);
        assert!(moves.contains(&Move::new(magician, Cell::new(6, 6))));
        assert!(!moves.contains(&Move::new(magician, Cell::new(7, 7))));
    }

    #[test]
    fn test_strongman_push_listed() {
        let state = state_with(
            &[],
            &[
                (Cell::new(4, 4), Entity::new(0, EntityType::Strongman)),
                (Cell::new(4, 5), Entity::new(1, EntityType::Clown)),
            ],
            0,
        );
        let moves = all_moves(&state);
        assert!(moves.contains(&Move::new(Cell::new(4, 4), Cell::new(4, 5))));
    }

    #[test]
    fn test_all_listed_moves_are_legal() {
        let houses: Vec<Cell> = (0..12).map(|c| Cell::new(4, c)).chain([Cell::new(0, 11)]).collect();
        let state = GameState::setup(&houses, 0).unwrap();
        for mv in all_moves(&state) {
            assert_ne!(classify(&state.board, mv), MoveKind::Illegal, "{mv}");
        }
    }
}
