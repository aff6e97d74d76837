//! Move legality: classification and application of moves.
//!
//! [`classify`] is a pure function of the board. [`apply`] trusts the
//! classification it is handed and is the only way moves change the board.

use thiserror::Error;

use crate::board::{Board, Cell, EntityType, Move};

/// How a move affects the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MoveKind {
    Illegal,
    /// The sentinel move; nothing changes.
    Pass,
    /// One step to an adjacent empty cell (orthogonal only into a house).
    BaseMove,
    /// Acrobat jump over one cell.
    DoubleMove,
    /// Magician trades places with another entity.
    Swap,
    /// Strongman steps into an occupied cell and shoves its occupant one
    /// cell further.
    Push,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("illegal move {0}")]
pub struct IllegalMove(pub Move);

/// Classify `mv` against the current board.
///
/// Rules are checked in order; the first match wins. In particular an
/// adjacent step onto an empty cell is a `BaseMove` for every type, so the
/// per-type branches only see moves that fail base adjacency.
pub fn classify(board: &Board, mv: Move) -> MoveKind {
    if mv.is_pass() {
        return MoveKind::Pass;
    }
    let Move { from, to } = mv;
    if from == to || !from.is_valid() || !to.is_valid() {
        return MoveKind::Illegal;
    }
    // Housed pieces never leave and a claimed house never takes another.
    if board.is_house(from) {
        return MoveKind::Illegal;
    }
    let target = board.entity_at(to);
    if target.is_some() && board.is_house(to) {
        return MoveKind::Illegal;
    }
    let Some(mover) = board.entity_at(from) else {
        return MoveKind::Illegal;
    };
    let player = mover.owner;
    if board.blocked_for(player, from) || board.blocked_for(player, to) {
        return MoveKind::Illegal;
    }

    let (dr, dc) = (to.row - from.row, to.col - from.col);
    let orthogonal = dr == 0 || dc == 0;
    let adjacent = from.chebyshev(to) == 1;

    if target.is_none() && adjacent && (orthogonal || !board.is_house(to)) {
        return MoveKind::BaseMove;
    }

    match (mover.kind, target) {
        (EntityType::Acrobat, None) => {
            let straight_jump = orthogonal && from.manhattan(to) == 2;
            let diagonal_jump = dr.abs() == 2 && dc.abs() == 2 && !board.is_house(to);
            if straight_jump || diagonal_jump {
                MoveKind::DoubleMove
            } else {
                MoveKind::Illegal
            }
        }
        (EntityType::Strongman, Some(_)) if adjacent => {
            let next = to.offset(dr, dc);
            let landing_ok = next.is_valid()
                && board.entity_at(next).is_none()
                && (orthogonal || !board.is_house(next))
                && !board.blocked_for(player, next);
            if landing_ok {
                MoveKind::Push
            } else {
                MoveKind::Illegal
            }
        }
        (EntityType::Magician, Some(other)) => {
            let protected = matches!(other.kind, EntityType::Trainer | EntityType::Magician);
            if other.owner == player || !protected {
                MoveKind::Swap
            } else {
                MoveKind::Illegal
            }
        }
        _ => MoveKind::Illegal,
    }
}

/// Apply a move that was classified as `kind`.
///
/// # Panics
/// If `kind` is [`MoveKind::Illegal`]. Callers must classify first.
pub fn apply(board: &mut Board, mv: Move, kind: MoveKind) {
    let Move { from, to } = mv;
    match kind {
        MoveKind::Illegal => panic!("attempted to apply illegal move {mv}"),
        MoveKind::Pass => {}
        MoveKind::BaseMove | MoveKind::DoubleMove => board.relocate(from, to),
        MoveKind::Swap => board.exchange(from, to),
        MoveKind::Push => {
            let next = push_target(mv);
            board.relocate(to, next);
            board.relocate(from, to);
        }
    }
}

/// Classify and apply in one step, refusing illegal moves.
pub fn try_apply(board: &mut Board, mv: Move) -> Result<MoveKind, IllegalMove> {
    match classify(board, mv) {
        MoveKind::Illegal => Err(IllegalMove(mv)),
        kind => {
            apply(board, mv, kind);
            Ok(kind)
        }
    }
}

/// Cell a pushed entity lands on: one step beyond `to` along the move.
#[inline]
pub fn push_target(mv: Move) -> Cell {
    mv.to.offset(mv.to.row - mv.from.row, mv.to.col - mv.from.col)
}
