//! Move selection: swap shortcuts followed by a beam-pruned minimax search.
//!
//! Scores always come from `my_player`'s fixed perspective, so levels where
//! the agent moves take the maximum and opponent levels take the minimum; no
//! negation happens between plies. Every candidate is explored on its own
//! clone of the state.

use crate::board::{EntityType, Move};
use crate::constants::{BEAM_MARGIN, MAX_DEPTH, NODE_BUDGET, SHORTCUT_RADIUS};
use crate::eval::{evaluate_with, Weights};
use crate::game::GameState;
use crate::logging::Logger;
use crate::movegen::all_moves;
use crate::rules::{classify, MoveKind};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    /// Target node count; fixes the depth for a given root branching factor.
    pub node_budget: u32,
    /// Cap on the derived depth.
    pub max_depth: u32,
    /// Candidates further than this from the best (worst) provisional score
    /// are pruned before recursing.
    pub beam_margin: i32,
    /// Manhattan radius used by the swap shortcuts.
    pub shortcut_radius: i32,
    pub weights: Weights,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            node_budget: NODE_BUDGET,
            max_depth: MAX_DEPTH,
            beam_margin: BEAM_MARGIN,
            shortcut_radius: SHORTCUT_RADIUS,
            weights: Weights::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchResult {
    pub best_move: Move,
    pub score: i32,
    pub depth: u32,
    pub branching: usize,
    /// Positions evaluated.
    pub nodes: u64,
}

/// `floor(ln(budget) / ln(branching))`. A single candidate is not searched.
pub fn search_depth(branching: usize, node_budget: u32) -> u32 {
    if branching <= 1 || node_budget <= 1 {
        return 0;
    }
    (f64::from(node_budget).ln() / (branching as f64).ln()).floor() as u32
}

/// Cheap tactical swaps tried before searching.
///
/// 1. Acrobat near a free house while the Magician is not: swap them.
/// 2. Magician near a free house while a Clown is not: swap them.
///
/// "Near" means within `radius` Manhattan steps of a free house. A shortcut
/// is only returned if the swap classifies as legal.
pub fn shortcut_move(state: &GameState, radius: i32) -> Option<Move> {
    let board = &state.board;
    let near = |cell| board.nearest_free_house(cell).is_some_and(|d| d <= radius);
    let swap = |mv: Move| (classify(board, mv) == MoveKind::Swap).then_some(mv);

    let magician = state.own_piece(EntityType::Magician, false)?;
    let magician_near = near(magician);

    if let Some(acrobat) = state.own_piece(EntityType::Acrobat, false) {
        if near(acrobat) && !magician_near {
            if let Some(mv) = swap(Move::new(magician, acrobat)) {
                return Some(mv);
            }
        }
    }

    if magician_near {
        for duplicate in [false, true] {
            let Some(clown) = state.own_piece(EntityType::Clown, duplicate) else {
                continue;
            };
            if !near(clown) {
                if let Some(mv) = swap(Move::new(magician, clown)) {
                    return Some(mv);
                }
            }
        }
    }

    None
}

/// Run the depth-limited search from `state`.
pub fn search(state: &GameState, config: &SearchConfig) -> SearchResult {
    let branching = all_moves(state).len();
    let depth = search_depth(branching, config.node_budget).min(config.max_depth);
    let mut searcher = Searcher { config, nodes: 0 };
    let (best_move, score) = searcher
        .expand(state, depth)
        .unwrap_or((Move::PASS, evaluate_with(state, &config.weights)));
    SearchResult {
        best_move,
        score,
        depth,
        branching,
        nodes: searcher.nodes,
    }
}

/// Pick the agent's move for the current ply.
pub fn choose_move(state: &GameState, config: &SearchConfig, logger: &dyn Logger) -> Move {
    if let Some(mv) = shortcut_move(state, config.shortcut_radius) {
        logger.debug(format_args!("shortcut swap {mv}"));
        return mv;
    }
    let result = search(state, config);
    logger.debug(format_args!(
        "searched depth {} over {} candidates ({} nodes): {} scores {}",
        result.depth, result.branching, result.nodes, result.best_move, result.score
    ));
    result.best_move
}

struct Searcher<'a> {
    config: &'a SearchConfig,
    nodes: u64,
}

struct Candidate {
    mv: Move,
    score: i32,
    state: GameState,
}

impl Searcher<'_> {
    /// Best (move, score) for the side to move in `state`, looking `depth`
    /// further plies below the candidates.
    fn expand(&mut self, state: &GameState, depth: u32) -> Option<(Move, i32)> {
        let mut candidates: Vec<Candidate> = all_moves(state)
            .into_iter()
            .filter_map(|mv| {
                let kind = classify(&state.board, mv);
                if kind == MoveKind::Illegal {
                    return None;
                }
                let mut child = state.clone();
                child.play(mv, kind);
                self.nodes += 1;
                let score = evaluate_with(&child, &self.config.weights);
                Some(Candidate {
                    mv,
                    score,
                    state: child,
                })
            })
            .collect();

        let maximizing = state.is_my_turn();
        candidates.sort_by_key(|c| c.score);
        let (lo, hi) = match (candidates.first(), candidates.last()) {
            (Some(first), Some(last)) => (first.score, last.score),
            _ => return None,
        };
        let margin = self.config.beam_margin;
        if maximizing {
            candidates.retain(|c| c.score >= hi - margin);
        } else {
            candidates.retain(|c| c.score <= lo + margin);
        }

        if depth > 0 {
            for c in &mut candidates {
                if c.state.is_over() {
                    continue;
                }
                if let Some((_, score)) = self.expand(&c.state, depth - 1) {
                    c.score = score;
                }
            }
        }

        let best = if maximizing {
            candidates.iter().max_by_key(|c| c.score)
        } else {
            candidates.iter().min_by_key(|c| c.score)
        };
        best.map(|c| (c.mv, c.score))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, Cell, Entity};
    use crate::logging::NullLogger;

    #[test]
    fn test_search_depth() {
        assert_eq!(search_depth(4, 200), 3);
        assert_eq!(search_depth(200, 200), 1);
        assert_eq!(search_depth(201, 200), 0);
        assert_eq!(search_depth(14, 200), 2);
        assert_eq!(search_depth(1, 200), 0);
    }

    #[test]
    fn test_takes_adjacent_house() {
        let house = Cell::new(4, 5);
        let mut board = Board::new(&[house, Cell::new(0, 11)]).unwrap();
        board.place(Cell::new(4, 4), Entity::new(0, EntityType::Clown)).unwrap();
        board.place(Cell::new(8, 0), Entity::new(1, EntityType::Clown)).unwrap();
        let state = GameState::new(0, board);

        let result = search(&state, &SearchConfig::default());
        assert_eq!(result.best_move, Move::new(Cell::new(4, 4), house));
        assert!(result.nodes > 0);
    }

    #[test]
    fn test_only_pass_available() {
        let board = Board::new(&[Cell::new(4, 4)]).unwrap();
        let state = GameState::new(0, board);
        let result = search(&state, &SearchConfig::default());
        assert_eq!(result.best_move, Move::PASS);
        assert_eq!(result.depth, 0);
    }

    #[test]
    fn test_depth_is_capped() {
        let mut board = Board::new(&[Cell::new(8, 11)]).unwrap();
        board.place(Cell::new(0, 0), Entity::new(0, EntityType::Clown)).unwrap();
        board.place(Cell::new(8, 0), Entity::new(1, EntityType::Clown)).unwrap();
        let state = GameState::new(0, board);
        // pass + 3 steps out of the corner
        assert_eq!(search_depth(4, NODE_BUDGET), 3);
        let result = search(&state, &SearchConfig { max_depth: 1, ..SearchConfig::default() });
        assert_eq!(result.branching, 4);
        assert_eq!(result.depth, 1);
    }

    #[test]
    fn test_acrobat_shortcut() {
        let house = Cell::new(2, 8);
        let magician = Cell::new(8, 0);
        let acrobat = Cell::new(2, 6);
        let mut board = Board::new(&[house]).unwrap();
        board.place(magician, Entity::new(0, EntityType::Magician)).unwrap();
        board.place(acrobat, Entity::new(0, EntityType::Acrobat)).unwrap();
        let state = GameState::new(0, board);

        assert_eq!(shortcut_move(&state, 2), Some(Move::new(magician, acrobat)));
        assert_eq!(
            choose_move(&state, &SearchConfig::default(), &NullLogger),
            Move::new(magician, acrobat)
        );
    }

    #[test]
    fn test_clown_shortcut() {
        let house = Cell::new(2, 8);
        let magician = Cell::new(2, 7);
        let clown = Cell::new(8, 0);
        let mut board = Board::new(&[house]).unwrap();
        board.place(magician, Entity::new(0, EntityType::Magician)).unwrap();
        board.place(Cell::new(2, 6), Entity::new(0, EntityType::Acrobat)).unwrap();
        board.place(clown, Entity::second(0, EntityType::Clown)).unwrap();
        let state = GameState::new(0, board);

        assert_eq!(shortcut_move(&state, 2), Some(Move::new(magician, clown)));
    }

    #[test]
    fn test_no_shortcut_without_magician() {
        let mut board = Board::new(&[Cell::new(2, 8)]).unwrap();
        board.place(Cell::new(2, 7), Entity::new(0, EntityType::Acrobat)).unwrap();
        let state = GameState::new(0, board);
        assert_eq!(shortcut_move(&state, 2), None);
    }

    #[test]
    fn test_search_does_not_mutate_root() {
        let houses: Vec<Cell> = (0..12).map(|c| Cell::new(4, c)).chain([Cell::new(0, 11)]).collect();
        let state = GameState::setup(&houses, 0).unwrap();
        let before = state.clone();
        let mv = choose_move(&state, &SearchConfig::default(), &NullLogger);
        assert_eq!(state, before);
        assert_ne!(classify(&state.board, mv), MoveKind::Illegal);
    }
}
