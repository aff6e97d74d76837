//! Line-oriented text protocol.
//!
//! Setup is 13 house cells followed by the player id this process plays.
//! After that, each opponent turn delivers one `<from>-<to>` move token and
//! each agent turn writes one. Cells are `<row letter><column digit>` with
//! `A1` the top-left cell; the pass move is `Z0-Z0`.
//!
//! Tokens are whitespace separated and may be spread across lines in any way.
//! Malformed tokens are logged and skipped or replaced (pass move, player 0)
//! rather than aborting the match.
//!
//! ## Example
//!
//! ```
//! use std::io::Cursor;
//! use circus_agent::logging::NullLogger;
//! use circus_agent::protocol::Session;
//! use circus_agent::search::SearchConfig;
//!
//! let input = "E1 E2 E3 E4 E5 E6 E7 E8 E9 E: E; E< A<\n1\nZ0-Z0\n";
//! let mut out = Vec::new();
//! let mut session = Session::new(Cursor::new(input), &mut out, &NullLogger, SearchConfig::default());
//! let state = session.run().unwrap();
//! assert_eq!(state.my_player, 1);
//! assert_eq!(String::from_utf8(out).unwrap().lines().count(), 1);
//! ```

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use thiserror::Error;

use crate::board::{BoardError, Cell, Move};
use crate::constants::{HOUSE_COUNT, MAX_STEPS};
use crate::game::{is_starting_cell, GameState};
use crate::logging::Logger;
use crate::rules::{classify, MoveKind};
use crate::search::{choose_move, SearchConfig};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("token '{0}' is too short")]
    TooShort(String),
    #[error("unexpected separator in move '{0}'")]
    Separator(String),
    #[error("invalid player id '{0}'")]
    Player(String),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("bad setup: {0}")]
    Board(#[from] BoardError),
    #[error("input ended while reading {0}")]
    UnexpectedEof(&'static str),
}

#[inline]
fn cell_from_bytes(row: u8, col: u8) -> Cell {
    Cell::new(i32::from(row) - i32::from(b'A'), i32::from(col) - i32::from(b'1'))
}

/// Parse a `<row letter><column digit>` token. Extra characters are ignored.
pub fn parse_cell(token: &str) -> Result<Cell, ProtocolError> {
    match token.as_bytes() {
        [row, col, ..] => Ok(cell_from_bytes(*row, *col)),
        _ => Err(ProtocolError::TooShort(token.to_string())),
    }
}

/// Parse a move token leniently: a wrong separator is reported but the two
/// cells are still read. Tokens shorter than five bytes become a pass.
pub fn parse_move_lossy(token: &str) -> (Move, Option<ProtocolError>) {
    match token.as_bytes() {
        [r0, c0, sep, r1, c1, ..] => {
            let mv = Move::new(cell_from_bytes(*r0, *c0), cell_from_bytes(*r1, *c1));
            let err = (*sep != b'-').then(|| ProtocolError::Separator(token.to_string()));
            (mv, err)
        }
        _ => (Move::PASS, Some(ProtocolError::TooShort(token.to_string()))),
    }
}

/// Strict variant of [`parse_move_lossy`].
pub fn parse_move(token: &str) -> Result<Move, ProtocolError> {
    match parse_move_lossy(token) {
        (mv, None) => Ok(mv),
        (_, Some(err)) => Err(err),
    }
}

pub fn parse_player(token: &str) -> Result<u8, ProtocolError> {
    match token.parse::<u8>() {
        Ok(p) if p <= 1 => Ok(p),
        _ => Err(ProtocolError::Player(token.to_string())),
    }
}

/// Whitespace-separated tokens from a reader.
pub struct Tokens<R> {
    reader: R,
    pending: VecDeque<String>,
}

impl<R: BufRead> Tokens<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pending: VecDeque::new(),
        }
    }

    /// The next token, or `None` at end of input.
    pub fn next_token(&mut self) -> io::Result<Option<String>> {
        while self.pending.is_empty() {
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            self.pending
                .extend(line.split_whitespace().map(str::to_string));
        }
        Ok(self.pending.pop_front())
    }
}

/// One match over a reader/writer pair.
pub struct Session<'a, R, W> {
    tokens: Tokens<R>,
    out: W,
    logger: &'a dyn Logger,
    config: SearchConfig,
    max_steps: u32,
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W> {
    pub fn new(reader: R, out: W, logger: &'a dyn Logger, config: SearchConfig) -> Self {
        Self {
            tokens: Tokens::new(reader),
            out,
            logger,
            config,
            max_steps: MAX_STEPS,
        }
    }

    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Read the setup and play until the game is over or input ends.
    pub fn run(&mut self) -> Result<GameState, SessionError> {
        let mut state = self.read_setup()?;
        self.logger.info(format_args!(
            "playing as {} with {} houses",
            state.my_player,
            state.board.free_house_count()
        ));

        while !state.is_over() {
            if !self.turn(&mut state)? {
                self.logger.info(format_args!("input closed at step {}", state.done_steps));
                break;
            }
        }

        self.logger.info(format_args!(
            "finished after {} steps, houses claimed {}:{}",
            state.done_steps,
            state.board.claimed_by(0),
            state.board.claimed_by(1)
        ));
        Ok(state)
    }

    /// Parse the house list and player id and build the starting position.
    pub fn read_setup(&mut self) -> Result<GameState, SessionError> {
        let mut houses = Vec::with_capacity(HOUSE_COUNT);
        for _ in 0..HOUSE_COUNT {
            let token = self
                .tokens
                .next_token()?
                .ok_or(SessionError::UnexpectedEof("house cells"))?;
            self.logger.trace(format_args!("house token '{token}'"));
            match parse_cell(&token) {
                Ok(cell) if !cell.is_valid() => {
                    self.logger.warn(format_args!("house {cell} is outside the field, ignored"));
                }
                Ok(cell) if houses.contains(&cell) => {
                    self.logger.warn(format_args!("house {cell} listed twice"));
                }
                Ok(cell) if is_starting_cell(cell) => {
                    self.logger.warn(format_args!("house {cell} is a starting cell, ignored"));
                }
                Ok(cell) => houses.push(cell),
                Err(err) => self.logger.error(format_args!("{err}")),
            }
        }

        let token = self
            .tokens
            .next_token()?
            .ok_or(SessionError::UnexpectedEof("player id"))?;
        let my_player = parse_player(&token).unwrap_or_else(|err| {
            self.logger.error(format_args!("{err}, playing as 0"));
            0
        });

        let state = GameState::setup(&houses, my_player)?.with_max_steps(self.max_steps);
        self.logger.debug(format_args!("initial board\n{}", state.board));
        Ok(state)
    }

    /// Play one step. Returns `false` if the opponent's move could not be
    /// read because input ended.
    pub fn turn(&mut self, state: &mut GameState) -> Result<bool, SessionError> {
        if state.is_my_turn() {
            let mv = choose_move(state, &self.config, self.logger);
            let kind = classify(&state.board, mv);
            state.play(mv, kind);
            writeln!(self.out, "{mv}")?;
            self.out.flush()?;
            self.logger.debug(format_args!("step {}: played {mv} ({kind:?})", state.done_steps));
            return Ok(true);
        }

        let Some(token) = self.tokens.next_token()? else {
            return Ok(false);
        };
        let (mv, err) = parse_move_lossy(&token);
        if let Some(err) = err {
            self.logger.error(format_args!("{err}"));
        }
        match classify(&state.board, mv) {
            MoveKind::Illegal => {
                self.logger.warn(format_args!("opponent move {mv} is illegal, board left unchanged"));
                state.advance();
            }
            kind => {
                state.play(mv, kind);
                self.logger.debug(format_args!("step {}: opponent {mv} ({kind:?})", state.done_steps));
            }
        }
        Ok(true)
    }
}
