//! Static evaluation of a position from `my_player`'s point of view.
//!
//! Housed pieces dominate the score. Un-housed pieces add a per-type presence
//! term, a penalty when standing in the enemy trainer's zone, a progress term
//! along the columns and a distance term to the nearest free house. Every
//! term is added for my pieces and subtracted for the opponent's.

use crate::board::{valid_ids, Entity};
use crate::constants::{BLOCKED, HOUSE_DISTANCE_WEIGHT, HOUSE_SCORE, PRESENCE, PROGRESS_WEIGHT};
use crate::game::GameState;

/// Tunable heuristic weights. Per-type tables are indexed by
/// [`EntityType::index`](crate::board::EntityType::index).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Weights {
    pub house: i32,
    pub presence: [i32; 5],
    pub blocked: [i32; 5],
    pub progress: i32,
    pub house_distance: i32,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            house: HOUSE_SCORE,
            presence: PRESENCE,
            blocked: BLOCKED,
            progress: PROGRESS_WEIGHT,
            house_distance: HOUSE_DISTANCE_WEIGHT,
        }
    }
}

/// Evaluate with the default weights.
pub fn evaluate(state: &GameState) -> i32 {
    evaluate_with(state, &Weights::default())
}

pub fn evaluate_with(state: &GameState, weights: &Weights) -> i32 {
    let board = &state.board;
    let mut score = 0;

    for id in valid_ids() {
        let (Some(entity), Some(cell)) = (Entity::from_id(id), board.position(id)) else {
            continue;
        };
        let sign = if entity.owner == state.my_player { 1 } else { -1 };

        if board.is_house(cell) {
            score += sign * weights.house;
            continue;
        }

        let t = entity.kind.index();
        let mut value = -weights.presence[t];
        if board.blocked_for(entity.owner, cell) {
            value -= weights.blocked[t];
        }
        // Both sides start on column 0 and advance towards column 11.
        value += weights.progress * cell.col;
        if let Some(dist) = board.nearest_free_house(cell) {
            value -= weights.house_distance * dist;
        }
        score += sign * value;
    }

    score
}
