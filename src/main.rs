//! Circus-Agent command line.
//!
//! ## Usage
//!
//! - `circus-agent` - Play one match over stdin/stdout
//! - `circus-agent play` - Same as above, with tuning flags
//! - `circus-agent demo` - Self-play against a random opponent

use std::io;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::LevelFilter;

use circus_agent::board::opponent;
use circus_agent::constants::{BEAM_MARGIN, MAX_DEPTH, MAX_STEPS, NODE_BUDGET};
use circus_agent::game::GameState;
use circus_agent::logging::{FacadeLogger, Logger, NullLogger};
use circus_agent::playout::{random_houses, random_move};
use circus_agent::protocol::Session;
use circus_agent::rules::classify;
use circus_agent::search::{choose_move, SearchConfig};

/// Circus-Agent: a search-based agent for the circus house race
#[derive(Parser)]
#[command(name = "circus-agent")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Drop all log output
    #[arg(long, global = true)]
    quiet: bool,

    /// Log level written to stderr (RUST_LOG overrides it)
    #[arg(long, global = true, default_value = "info")]
    log_level: LevelFilter,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one match using the text protocol on stdin/stdout
    Play(Tuning),
    /// Play the agent against a random opponent on random houses
    Demo {
        /// Seed for house placement and the opponent's moves
        #[arg(long, default_value_t = 1)]
        seed: u64,

        #[command(flatten)]
        tuning: Tuning,
    },
}

#[derive(Args, Clone)]
struct Tuning {
    /// Target node count per search
    #[arg(long, default_value_t = NODE_BUDGET)]
    node_budget: u32,

    /// Cap on the derived search depth
    #[arg(long, default_value_t = MAX_DEPTH)]
    max_depth: u32,

    /// Beam width around the best provisional score
    #[arg(long, default_value_t = BEAM_MARGIN)]
    beam_margin: i32,

    /// Step budget for the match
    #[arg(long, default_value_t = MAX_STEPS)]
    max_steps: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            node_budget: NODE_BUDGET,
            max_depth: MAX_DEPTH,
            beam_margin: BEAM_MARGIN,
            max_steps: MAX_STEPS,
        }
    }
}

impl Tuning {
    fn search_config(&self) -> SearchConfig {
        SearchConfig {
            node_budget: self.node_budget,
            max_depth: self.max_depth,
            beam_margin: self.beam_margin,
            ..SearchConfig::default()
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // stderr only; stdout carries the protocol.
    env_logger::Builder::new()
        .filter_level(cli.log_level)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .init();

    let logger: &dyn Logger = if cli.quiet { &NullLogger } else { &FacadeLogger };

    match cli.command {
        Some(Commands::Demo { seed, tuning }) => run_demo(seed, &tuning, logger),
        Some(Commands::Play(tuning)) => run_match(&tuning, logger),
        None => run_match(&Tuning::default(), logger),
    }
}

fn run_match(tuning: &Tuning, logger: &dyn Logger) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut session = Session::new(stdin.lock(), stdout.lock(), logger, tuning.search_config())
        .with_max_steps(tuning.max_steps);
    session.run().context("match aborted")?;
    Ok(())
}

fn run_demo(seed: u64, tuning: &Tuning, logger: &dyn Logger) -> Result<()> {
    println!("Circus-Agent self-play demo (seed {seed})\n");

    let mut rng = fastrand::Rng::with_seed(seed);
    let houses = random_houses(&mut rng);
    let mut state = GameState::setup(&houses, 0)
        .context("random houses collide with the starting layout")?
        .with_max_steps(tuning.max_steps);
    let config = tuning.search_config();

    println!("{}", state.board);
    while !state.is_over() {
        let mv = if state.is_my_turn() {
            choose_move(&state, &config, logger)
        } else {
            random_move(&state, &mut rng)
        };
        let kind = classify(&state.board, mv);
        logger.debug(format_args!(
            "step {} player {}: {mv} ({kind:?})",
            state.done_steps, state.current_player
        ));
        state.play(mv, kind);
    }

    println!("{}", state.board);
    println!(
        "Finished after {} steps. Agent houses: {}, random houses: {}",
        state.done_steps,
        state.board.claimed_by(state.my_player),
        state.board.claimed_by(opponent(state.my_player))
    );
    Ok(())
}
