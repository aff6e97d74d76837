//! Board model: cells, entities, moves and the field grid.
//!
//! The grid and the id → cell position index describe the same placement
//! twice. Only [`Board::place`] (setup) and the crate-internal
//! `relocate`/`exchange` pair (used by the rules engine) write to either of
//! them, and every write updates both.

use std::fmt;

use thiserror::Error;

use crate::constants::{
    CELL_COUNT, ENTITY_SLOTS, FIELD_HEIGHT, FIELD_WIDTH, NONE_COL, NONE_ROW,
};

/// Errors raised while building a board.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    #[error("cell {0} is outside the field")]
    OutOfBounds(Cell),
    #[error("cell {0} is already a house")]
    DuplicateHouse(Cell),
    #[error("cell {0} is a house, entities cannot start there")]
    HouseCell(Cell),
    #[error("cell {0} is already occupied")]
    Occupied(Cell),
    #[error("entity {0} is already on the board")]
    AlreadyPlaced(u8),
    #[error("{0:?} does not name a real entity")]
    InvalidEntity(Entity),
}

/// A (row, col) pair. Valid iff `0 <= row < 9` and `0 <= col < 12`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    pub row: i32,
    pub col: i32,
}

impl Default for Cell {
    fn default() -> Self {
        Self::NONE
    }
}

impl Cell {
    /// The out-of-range sentinel marking "no cell".
    pub const NONE: Cell = Cell {
        row: NONE_ROW,
        col: NONE_COL,
    };

    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        (0..FIELD_HEIGHT as i32).contains(&self.row) && (0..FIELD_WIDTH as i32).contains(&self.col)
    }

    #[inline]
    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    #[inline]
    pub fn offset(self, dr: i32, dc: i32) -> Cell {
        Cell::new(self.row + dr, self.col + dc)
    }

    /// King-move distance.
    #[inline]
    pub fn chebyshev(self, other: Cell) -> i32 {
        (self.row - other.row).abs().max((self.col - other.col).abs())
    }

    #[inline]
    pub fn manhattan(self, other: Cell) -> i32 {
        (self.row - other.row).abs() + (self.col - other.col).abs()
    }

    /// Index into the row-major grid. Only meaningful for valid cells.
    #[inline]
    fn index(self) -> usize {
        self.row as usize * FIELD_WIDTH + self.col as usize
    }

    #[inline]
    fn from_index(idx: usize) -> Cell {
        Cell::new((idx / FIELD_WIDTH) as i32, (idx % FIELD_WIDTH) as i32)
    }
}

/// Row letter `'A' + row`, column digit `'1' + col`. The sentinel prints as `Z0`.
impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let row = char::from_u32((i32::from(b'A') + self.row) as u32).unwrap_or('?');
        let col = char::from_u32((i32::from(b'1') + self.col) as u32).unwrap_or('?');
        write!(f, "{row}{col}")
    }
}

/// Piece types. The discriminant is the type code used in entity ids.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EntityType {
    Clown = 0,
    Strongman = 2,
    Acrobat = 4,
    Magician = 5,
    Trainer = 6,
}

impl EntityType {
    pub const ALL: [EntityType; 5] = [
        EntityType::Clown,
        EntityType::Strongman,
        EntityType::Acrobat,
        EntityType::Magician,
        EntityType::Trainer,
    ];

    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Dense index for per-type tables.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            EntityType::Clown => 0,
            EntityType::Strongman => 1,
            EntityType::Acrobat => 2,
            EntityType::Magician => 3,
            EntityType::Trainer => 4,
        }
    }

    /// Whether a player owns two copies of this type.
    #[inline]
    pub const fn has_duplicate(self) -> bool {
        matches!(self, EntityType::Clown | EntityType::Strongman)
    }

    fn symbol(self) -> char {
        match self {
            EntityType::Clown => 'c',
            EntityType::Strongman => 's',
            EntityType::Acrobat => 'a',
            EntityType::Magician => 'm',
            EntityType::Trainer => 't',
        }
    }
}

/// One game piece.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Entity {
    pub owner: u8,
    pub kind: EntityType,
    pub duplicate: bool,
}

impl Entity {
    pub const fn new(owner: u8, kind: EntityType) -> Self {
        Self {
            owner,
            kind,
            duplicate: false,
        }
    }

    /// The second copy of a Clown or Strongman.
    pub const fn second(owner: u8, kind: EntityType) -> Self {
        debug_assert!(kind.has_duplicate());
        Self {
            owner,
            kind,
            duplicate: true,
        }
    }

    /// `(owner << 3) | type code | duplicate bit`.
    #[inline]
    pub const fn id(self) -> u8 {
        (self.owner << 3) | self.kind.code() | self.duplicate as u8
    }

    /// Inverse of [`Entity::id`]. Returns `None` for unused ids (7, 15, 16+).
    pub fn from_id(id: u8) -> Option<Entity> {
        let owner = id >> 3;
        if owner > 1 {
            return None;
        }
        let (kind, duplicate) = match id & 0b111 {
            0 => (EntityType::Clown, false),
            1 => (EntityType::Clown, true),
            2 => (EntityType::Strongman, false),
            3 => (EntityType::Strongman, true),
            4 => (EntityType::Acrobat, false),
            5 => (EntityType::Magician, false),
            6 => (EntityType::Trainer, false),
            _ => return None,
        };
        Some(Entity {
            owner,
            kind,
            duplicate,
        })
    }
}

/// All ids that name a real entity: 0–6 and 8–14.
pub fn valid_ids() -> impl Iterator<Item = u8> {
    (0..ENTITY_SLOTS as u8).filter(|&id| Entity::from_id(id).is_some())
}

/// The other player.
#[inline]
pub const fn opponent(player: u8) -> u8 {
    1 - player
}

/// An ordered (from, to) pair. `Move::PASS` has both ends on the sentinel.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Cell,
    pub to: Cell,
}

impl Move {
    pub const PASS: Move = Move {
        from: Cell::NONE,
        to: Cell::NONE,
    };

    pub const fn new(from: Cell, to: Cell) -> Self {
        Self { from, to }
    }

    #[inline]
    pub fn is_pass(self) -> bool {
        self == Self::PASS
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.from, self.to)
    }
}

/// Contents of one grid cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Square {
    pub house: bool,
    pub entity: Option<Entity>,
}

/// The playing field.
///
/// Free houses and active entities are bitsets (over grid index and entity
/// id respectively), which keeps the board cheap to clone for search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    squares: [Square; CELL_COUNT],
    positions: [Cell; ENTITY_SLOTS],
    houses: u128,
    free_houses: u128,
    active: u16,
}

impl Board {
    /// Create an empty board with the given house cells, all free.
    pub fn new(houses: &[Cell]) -> Result<Self, BoardError> {
        let mut board = Board {
            squares: [Square::default(); CELL_COUNT],
            positions: [Cell::NONE; ENTITY_SLOTS],
            houses: 0,
            free_houses: 0,
            active: 0,
        };
        for &cell in houses {
            if !cell.is_valid() {
                return Err(BoardError::OutOfBounds(cell));
            }
            let bit = 1u128 << cell.index();
            if board.houses & bit != 0 {
                return Err(BoardError::DuplicateHouse(cell));
            }
            board.houses |= bit;
            board.free_houses |= bit;
            board.squares[cell.index()].house = true;
        }
        Ok(board)
    }

    /// Put an entity on the board at setup time. The entity becomes active.
    pub fn place(&mut self, cell: Cell, entity: Entity) -> Result<(), BoardError> {
        if !cell.is_valid() {
            return Err(BoardError::OutOfBounds(cell));
        }
        let id = entity.id();
        if Entity::from_id(id) != Some(entity) {
            return Err(BoardError::InvalidEntity(entity));
        }
        if !self.positions[id as usize].is_none() {
            return Err(BoardError::AlreadyPlaced(id));
        }
        let square = &mut self.squares[cell.index()];
        if square.house {
            return Err(BoardError::HouseCell(cell));
        }
        if square.entity.is_some() {
            return Err(BoardError::Occupied(cell));
        }
        square.entity = Some(entity);
        self.positions[id as usize] = cell;
        self.active |= 1 << id;
        Ok(())
    }

    /// The square at `cell`, or `None` outside the grid.
    #[inline]
    pub fn square(&self, cell: Cell) -> Option<&Square> {
        cell.is_valid().then(|| &self.squares[cell.index()])
    }

    #[inline]
    pub fn entity_at(&self, cell: Cell) -> Option<Entity> {
        self.square(cell).and_then(|s| s.entity)
    }

    #[inline]
    pub fn is_house(&self, cell: Cell) -> bool {
        self.square(cell).is_some_and(|s| s.house)
    }

    #[inline]
    pub fn is_free_house(&self, cell: Cell) -> bool {
        cell.is_valid() && self.free_houses & (1u128 << cell.index()) != 0
    }

    /// Current cell of an entity, or `None` if it was never placed.
    #[inline]
    pub fn position(&self, id: u8) -> Option<Cell> {
        self.positions
            .get(id as usize)
            .copied()
            .filter(|c| !c.is_none())
    }

    #[inline]
    pub fn is_active(&self, id: u8) -> bool {
        (id as usize) < ENTITY_SLOTS && self.active & (1 << id) != 0
    }

    /// Position of an entity that is still in play.
    #[inline]
    pub fn active_position(&self, entity: Entity) -> Option<Cell> {
        let id = entity.id();
        if self.is_active(id) {
            self.position(id)
        } else {
            None
        }
    }

    pub fn houses(&self) -> impl Iterator<Item = Cell> + '_ {
        bits(self.houses).map(Cell::from_index)
    }

    pub fn free_houses(&self) -> impl Iterator<Item = Cell> + '_ {
        bits(self.free_houses).map(Cell::from_index)
    }

    #[inline]
    pub fn free_house_count(&self) -> usize {
        self.free_houses.count_ones() as usize
    }

    pub fn active_ids(&self) -> impl Iterator<Item = u8> + '_ {
        bits(u128::from(self.active)).map(|id| id as u8)
    }

    /// Active entities with their cells, in id order.
    pub fn active_entities(&self) -> impl Iterator<Item = (Entity, Cell)> + '_ {
        self.active_ids().filter_map(|id| {
            let cell = self.position(id)?;
            Some((Entity::from_id(id)?, cell))
        })
    }

    /// Number of houses claimed by `player`'s entities.
    pub fn claimed_by(&self, player: u8) -> usize {
        self.houses()
            .filter(|&h| self.entity_at(h).is_some_and(|e| e.owner == player))
            .count()
    }

    /// Manhattan distance from `cell` to the nearest free house.
    pub fn nearest_free_house(&self, cell: Cell) -> Option<i32> {
        self.free_houses().map(|h| h.manhattan(cell)).min()
    }

    /// Whether `cell` lies in the no-move zone of the Trainer opposing
    /// `player`. House cells are never blocked.
    pub fn blocked_for(&self, player: u8, cell: Cell) -> bool {
        let trainer = Entity::new(opponent(player), EntityType::Trainer);
        match self.active_position(trainer) {
            Some(t) => !self.is_house(cell) && t.chebyshev(cell) <= 1,
            None => false,
        }
    }

    /// Move the entity at `from` onto the empty cell `to`. Entering a house
    /// retires the entity and consumes the house.
    pub(crate) fn relocate(&mut self, from: Cell, to: Cell) {
        let Some(entity) = self.squares[from.index()].entity.take() else {
            return;
        };
        debug_assert!(self.squares[to.index()].entity.is_none());
        let id = entity.id();
        self.squares[to.index()].entity = Some(entity);
        self.positions[id as usize] = to;
        if self.squares[to.index()].house {
            self.active &= !(1 << id);
            self.free_houses &= !(1u128 << to.index());
        }
    }

    /// Swap the occupants of two non-house cells.
    pub(crate) fn exchange(&mut self, a: Cell, b: Cell) {
        let (ia, ib) = (a.index(), b.index());
        let ea = self.squares[ia].entity;
        let eb = self.squares[ib].entity;
        self.squares[ia].entity = eb;
        self.squares[ib].entity = ea;
        if let Some(e) = ea {
            self.positions[e.id() as usize] = b;
        }
        if let Some(e) = eb {
            self.positions[e.id() as usize] = a;
        }
    }

    /// Check that the grid and the position index agree, that no house holds
    /// an active entity and that claimed houses are not free.
    pub fn is_consistent(&self) -> bool {
        for id in 0..ENTITY_SLOTS as u8 {
            if let Some(cell) = self.position(id) {
                if self.entity_at(cell).map(Entity::id) != Some(id) {
                    return false;
                }
                let housed = self.is_house(cell);
                if housed == self.is_active(id) || (housed && self.is_free_house(cell)) {
                    return false;
                }
            } else if self.is_active(id) {
                return false;
            }
        }
        self.squares.iter().enumerate().all(|(idx, sq)| match sq.entity {
            Some(e) => self.position(e.id()) == Some(Cell::from_index(idx)),
            None => self.free_houses & (1u128 << idx) == self.houses & (1u128 << idx),
        })
    }
}

/// Iterate over the set bits of a mask, lowest first.
fn bits(mut mask: u128) -> impl Iterator<Item = usize> {
    std::iter::from_fn(move || {
        if mask == 0 {
            return None;
        }
        let idx = mask.trailing_zeros() as usize;
        mask &= mask - 1;
        Some(idx)
    })
}

/// Player 0 pieces in upper case, player 1 in lower case, `#` for a free house.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  ")?;
        for col in 0..FIELD_WIDTH {
            write!(f, "{}", char::from(b'1' + col as u8))?;
        }
        writeln!(f)?;
        for row in 0..FIELD_HEIGHT {
            write!(f, "{} ", char::from(b'A' + row as u8))?;
            for col in 0..FIELD_WIDTH {
                let square = &self.squares[row * FIELD_WIDTH + col];
                let ch = match square.entity {
                    Some(e) if e.owner == 0 => e.kind.symbol().to_ascii_uppercase(),
                    Some(e) => e.kind.symbol(),
                    None if square.house => '#',
                    None => '.',
                };
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_ids() {
        assert_eq!(Entity::new(0, EntityType::Clown).id(), 0);
        assert_eq!(Entity::second(0, EntityType::Clown).id(), 1);
        assert_eq!(Entity::second(1, EntityType::Strongman).id(), 11);
        assert_eq!(Entity::new(1, EntityType::Trainer).id(), 14);

        let ids: Vec<u8> = valid_ids().collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4, 5, 6, 8, 9, 10, 11, 12, 13, 14]);
        for id in ids {
            assert_eq!(Entity::from_id(id).map(Entity::id), Some(id));
        }
        assert!(Entity::from_id(7).is_none());
        assert!(Entity::from_id(15).is_none());
    }

    #[test]
    fn test_cell_distances() {
        let a = Cell::new(2, 3);
        assert_eq!(a.chebyshev(Cell::new(4, 4)), 2);
        assert_eq!(a.manhattan(Cell::new(4, 4)), 3);
        assert!(!Cell::NONE.is_valid());
        assert!(!Cell::new(9, 0).is_valid());
        assert!(!Cell::new(0, 12).is_valid());
        assert!(Cell::new(8, 11).is_valid());
    }

    #[test]
    fn test_cell_display() {
        assert_eq!(Cell::new(0, 0).to_string(), "A1");
        assert_eq!(Cell::new(8, 11).to_string(), "I<");
        assert_eq!(Cell::NONE.to_string(), "Z0");
        assert_eq!(Move::PASS.to_string(), "Z0-Z0");
    }

    #[test]
    fn test_new_board_rejects_bad_houses() {
        assert_eq!(
            Board::new(&[Cell::new(9, 0)]),
            Err(BoardError::OutOfBounds(Cell::new(9, 0)))
        );
        assert_eq!(
            Board::new(&[Cell::new(1, 1), Cell::new(1, 1)]),
            Err(BoardError::DuplicateHouse(Cell::new(1, 1)))
        );
    }

    #[test]
    fn test_place_and_index() {
        let mut board = Board::new(&[Cell::new(4, 4)]).unwrap();
        let acrobat = Entity::new(0, EntityType::Acrobat);
        board.place(Cell::new(0, 0), acrobat).unwrap();

        assert_eq!(board.position(acrobat.id()), Some(Cell::new(0, 0)));
        assert!(board.is_active(acrobat.id()));
        assert_eq!(
            board.place(Cell::new(1, 1), acrobat),
            Err(BoardError::AlreadyPlaced(acrobat.id()))
        );
        assert_eq!(
            board.place(Cell::new(4, 4), Entity::new(0, EntityType::Clown)),
            Err(BoardError::HouseCell(Cell::new(4, 4)))
        );
        assert!(board.is_consistent());
    }

    #[test]
    fn test_place_rejects_unknown_entities() {
        let mut board = Board::new(&[]).unwrap();
        let stranger = Entity::new(2, EntityType::Trainer);
        assert_eq!(
            board.place(Cell::new(0, 0), stranger),
            Err(BoardError::InvalidEntity(stranger))
        );
        // A second Acrobat would alias the Magician's id.
        let twin = Entity {
            owner: 0,
            kind: EntityType::Acrobat,
            duplicate: true,
        };
        assert_eq!(
            board.place(Cell::new(0, 0), twin),
            Err(BoardError::InvalidEntity(twin))
        );
        assert_eq!(board.entity_at(Cell::new(0, 0)), None);
        assert_eq!(board.active_ids().count(), 0);
    }

    #[test]
    fn test_relocate_into_house_retires_entity() {
        let house = Cell::new(0, 1);
        let mut board = Board::new(&[house]).unwrap();
        let clown = Entity::new(1, EntityType::Clown);
        board.place(Cell::new(0, 0), clown).unwrap();

        board.relocate(Cell::new(0, 0), house);

        assert!(!board.is_active(clown.id()));
        assert_eq!(board.free_house_count(), 0);
        assert_eq!(board.claimed_by(1), 1);
        assert!(board.is_consistent());
    }

    #[test]
    fn test_blocked_for() {
        let house = Cell::new(3, 3);
        let mut board = Board::new(&[house]).unwrap();
        board
            .place(Cell::new(4, 4), Entity::new(1, EntityType::Trainer))
            .unwrap();

        assert!(board.blocked_for(0, Cell::new(5, 5)));
        assert!(board.blocked_for(0, Cell::new(4, 3)));
        assert!(!board.blocked_for(0, house));
        assert!(!board.blocked_for(0, Cell::new(6, 4)));
        assert!(!board.blocked_for(1, Cell::new(5, 5)));
    }
}
