//! Circus-Agent: a search-based agent for the twelve-by-nine "circus" house
//! race.
//!
//! Each side has seven pieces (two Clowns, two Strongmen, an Acrobat, a
//! Magician and a Trainer) and races to park them on 13 house cells. The
//! agent picks its move with a short beam-pruned minimax search over a
//! hand-tuned evaluation.
//!
//! ## Modules
//!
//! - [`constants`] - Geometry, limits, search parameters and weights
//! - [`board`] - Cells, entities, moves and the field grid
//! - [`rules`] - Move classification and application
//! - [`game`] - Turn and step bookkeeping, initial layout
//! - [`movegen`] - Candidate moves for the side to move
//! - [`eval`] - Static position evaluation
//! - [`search`] - Move selection
//! - [`protocol`] - Text protocol and the turn loop
//! - [`playout`] - Random opponent for self-play
//! - [`logging`] - Injected logger
//!
//! ## Example
//!
//! ```
//! use circus_agent::board::Cell;
//! use circus_agent::game::GameState;
//! use circus_agent::logging::NullLogger;
//! use circus_agent::rules::{classify, MoveKind};
//! use circus_agent::search::{choose_move, SearchConfig};
//!
//! // Houses along the middle row plus one corner.
//! let houses: Vec<Cell> = (0..12).map(|c| Cell::new(4, c)).chain([Cell::new(0, 11)]).collect();
//! let state = GameState::setup(&houses, 0).unwrap();
//!
//! let mv = choose_move(&state, &SearchConfig::default(), &NullLogger);
//! assert_ne!(classify(&state.board, mv), MoveKind::Illegal);
//! println!("Best move: {mv}");
//! ```

pub mod board;
pub mod constants;
pub mod eval;
pub mod game;
pub mod logging;
pub mod movegen;
pub mod playout;
pub mod protocol;
pub mod rules;
pub mod search;
