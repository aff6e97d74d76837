//! Constants for board geometry, game limits, search parameters and
//! heuristic weights.
//!
//! The weight tables are indexed by [`EntityType::index`](crate::board::EntityType::index):
//! Clown, Strongman, Acrobat, Magician, Trainer.

// =============================================================================
// Board Geometry
// =============================================================================

/// Number of columns.
pub const FIELD_WIDTH: usize = 12;

/// Number of rows.
pub const FIELD_HEIGHT: usize = 9;

/// Total number of cells on the grid.
pub const CELL_COUNT: usize = FIELD_WIDTH * FIELD_HEIGHT;

/// Number of house cells announced at setup.
pub const HOUSE_COUNT: usize = 13;

/// Row of the sentinel "none" cell. Prints as `'Z'`.
pub const NONE_ROW: i32 = 25;

/// Column of the sentinel "none" cell. Prints as `'0'`.
pub const NONE_COL: i32 = -1;

/// Number of distinct entity ids (`owner << 3 | type | duplicate`).
pub const ENTITY_SLOTS: usize = 16;

// =============================================================================
// Game Limits
// =============================================================================

/// Step budget for a whole match (both players' moves, passes included).
pub const MAX_STEPS: u32 = 300;

// =============================================================================
// Search Parameters
// =============================================================================

/// Target number of explored nodes; the search depth is derived from it.
pub const NODE_BUDGET: u32 = 200;

/// Upper bound on the derived depth; only bites when the root has fewer
/// than four candidates.
pub const MAX_DEPTH: u32 = 3;

/// Beam width: candidates further than this from the best (or worst) score
/// are dropped before recursing.
pub const BEAM_MARGIN: i32 = 50;

/// Manhattan radius around a free house used by the swap shortcuts.
pub const SHORTCUT_RADIUS: i32 = 2;

// =============================================================================
// Heuristic Weights
// =============================================================================

/// Score for every entity parked in a house (positive for mine).
pub const HOUSE_SCORE: i32 = 1000;

/// Presence cost of an un-housed entity, per type.
pub const PRESENCE: [i32; 5] = [10, 15, 20, 25, 5];

/// Cost of an entity standing in the enemy trainer's zone, per type.
pub const BLOCKED: [i32; 5] = [5, 10, 20, 40, 15];

/// Bonus per column of horizontal progress.
pub const PROGRESS_WEIGHT: i32 = 2;

/// Cost per step of Manhattan distance to the nearest free house.
pub const HOUSE_DISTANCE_WEIGHT: i32 = 5;

// =============================================================================
// Neighbor Offsets
// =============================================================================

/// (row, col) offsets to the 8 neighbouring cells.
/// Order: North, East, South, West, NE, SE, SW, NW
pub const DELTA: [(i32, i32); 8] = [
    (-1, 0),
    (0, 1),
    (1, 0),
    (0, -1),
    (-1, 1),
    (1, 1),
    (1, -1),
    (-1, -1),
];
