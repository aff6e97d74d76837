//! Game state: the board plus whose turn it is and how many steps were played.

use crate::board::{opponent, Board, BoardError, Cell, Entity, EntityType, Move};
use crate::constants::{FIELD_HEIGHT, MAX_STEPS};
use crate::rules::{apply, MoveKind};

/// Starting (row, col, type, duplicate) of player 0's pieces. Player 1 uses
/// the same columns with mirrored rows.
const LAYOUT: [(i32, i32, EntityType, bool); 7] = [
    (0, 0, EntityType::Acrobat, false),
    (1, 0, EntityType::Clown, false),
    (0, 1, EntityType::Clown, true),
    (1, 1, EntityType::Magician, false),
    (2, 0, EntityType::Strongman, false),
    (0, 2, EntityType::Strongman, true),
    (3, 0, EntityType::Trainer, false),
];

#[inline]
fn row_for_player(row: i32, player: u8) -> i32 {
    if player == 0 {
        row
    } else {
        FIELD_HEIGHT as i32 - 1 - row
    }
}

/// Starting cells of one player's seven pieces.
pub fn initial_layout(player: u8) -> impl Iterator<Item = (Cell, Entity)> {
    LAYOUT.into_iter().map(move |(row, col, kind, duplicate)| {
        let entity = Entity {
            owner: player,
            kind,
            duplicate,
        };
        (Cell::new(row_for_player(row, player), col), entity)
    })
}

/// Whether `cell` is occupied by some piece at the start of a match.
pub fn is_starting_cell(cell: Cell) -> bool {
    (0..=1).any(|p| initial_layout(p).any(|(c, _)| c == cell))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    /// The player this agent controls.
    pub my_player: u8,
    pub board: Board,
    pub done_steps: u32,
    /// Player to move. Alternates after every move, passes included.
    pub current_player: u8,
    pub max_steps: u32,
}

impl GameState {
    pub fn new(my_player: u8, board: Board) -> Self {
        Self {
            my_player,
            board,
            done_steps: 0,
            current_player: 0,
            max_steps: MAX_STEPS,
        }
    }

    /// Build the starting position: houses plus both players' layouts.
    pub fn setup(houses: &[Cell], my_player: u8) -> Result<Self, BoardError> {
        let mut board = Board::new(houses)?;
        for player in 0..=1 {
            for (cell, entity) in initial_layout(player) {
                board.place(cell, entity)?;
            }
        }
        Ok(Self::new(my_player, board))
    }

    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps;
        self
    }

    #[inline]
    pub fn opponent(&self) -> u8 {
        opponent(self.my_player)
    }

    #[inline]
    pub fn is_my_turn(&self) -> bool {
        self.current_player == self.my_player
    }

    /// Step budget exhausted or every house claimed.
    pub fn is_over(&self) -> bool {
        self.done_steps >= self.max_steps || self.board.free_house_count() == 0
    }

    /// Apply a classified move and hand the turn over.
    ///
    /// # Panics
    /// If `kind` is [`MoveKind::Illegal`].
    pub fn play(&mut self, mv: Move, kind: MoveKind) {
        apply(&mut self.board, mv, kind);
        self.advance();
    }

    /// Count a step without touching the board.
    pub fn advance(&mut self) {
        self.done_steps += 1;
        self.current_player = opponent(self.current_player);
    }

    /// Position of one of the side-to-move's pieces, if still in play.
    pub fn own_piece(&self, kind: EntityType, duplicate: bool) -> Option<Cell> {
        let entity = Entity {
            owner: self.current_player,
            kind,
            duplicate,
        };
        self.board.active_position(entity)
    }
}
