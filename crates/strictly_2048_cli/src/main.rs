//! Strictly 2048 - terminal front end
//!
//! Interactive play and autoplay over the strictly_2048 session core.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use std::cell::RefCell;
use std::io::{self, BufRead, Write};
use std::rc::Rc;
use strictly_2048::{Phase, Session, SessionConfig};
use strictly_2048_cli::{
    Hud, INPUT_HELP, MemoryStore, PlayerInput, ScoreStore, TextView, TomlFileStore,
    auto_direction,
};
use tracing::{debug, info, instrument, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let config = load_config(&cli)?;

    match cli.scores.clone() {
        Some(path) => run(&cli, config, TomlFileStore::new(path)),
        None => run(&cli, config, MemoryStore::new()),
    }
}

/// Reads the session config and applies command-line overrides.
#[instrument(skip(cli))]
fn load_config(cli: &Cli) -> Result<SessionConfig> {
    let mut config = match &cli.config {
        Some(path) => SessionConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => SessionConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    debug!(?config, "Session config");
    Ok(config)
}

/// Builds the session with its observers and dispatches the subcommand.
fn run<S: ScoreStore + 'static>(cli: &Cli, config: SessionConfig, store: S) -> Result<()> {
    let hud = Rc::new(RefCell::new(
        Hud::new(store).context("Failed to read high score")?,
    ));

    let mut session = Session::from_config(config).context("Invalid session config")?;
    session.subscribe(Box::new(Rc::clone(&hud)));
    if let Some(mode) = cli.events {
        session.subscribe(Box::new(TextView::new(io::stderr(), mode)));
    }

    match cli.command {
        Command::Play => run_play(&mut session, &hud),
        Command::Auto { steps } => run_auto(&mut session, &hud, steps),
    }
}

fn print_state<S: ScoreStore>(session: &Session, hud: &Hud<S>) {
    println!("{}", session.board());
    println!("{}", hud.status_line());
}

/// Interactive loop reading one command per line from stdin.
#[instrument(skip_all)]
fn run_play<S: ScoreStore>(session: &mut Session, hud: &Rc<RefCell<Hud<S>>>) -> Result<()> {
    info!("Starting interactive game");
    println!("{}", INPUT_HELP);
    print_state(session, &hud.borrow());

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("Failed to read input")?;
        if line.trim().is_empty() {
            continue;
        }

        match line.parse::<PlayerInput>() {
            Ok(PlayerInput::Slide(direction)) => match session.apply_move(direction) {
                Ok(report) if !report.changed => println!("Nothing moves {}", direction),
                Ok(_) => {}
                Err(e) => println!("{}", e),
            },
            Ok(PlayerInput::Undo) => {
                if let Err(e) = session.undo() {
                    println!("{}", e);
                }
            }
            Ok(PlayerInput::Reset) => {
                session.reset();
            }
            Ok(PlayerInput::Quit) => break,
            Err(e) => {
                println!("{}. {}", e, INPUT_HELP);
                continue;
            }
        }

        print_state(session, &hud.borrow());
        io::stdout().flush().context("Failed to flush stdout")?;
    }

    info!(score = session.score(), "Leaving game");
    Ok(())
}

/// Plays the cycle policy until game over or `steps` turns.
#[instrument(skip(session, hud))]
fn run_auto<S: ScoreStore>(
    session: &mut Session,
    hud: &Rc<RefCell<Hud<S>>>,
    steps: usize,
) -> Result<()> {
    info!("Starting autoplay");
    let mut turns = 0;
    while turns < steps && session.phase() == Phase::Playing {
        let Some(direction) = auto_direction(turns, &session.legal_directions()) else {
            warn!("No legal direction while playing");
            break;
        };
        session
            .apply_move(direction)
            .with_context(|| format!("Autoplay move {} failed", direction))?;
        turns += 1;
    }

    print_state(session, &hud.borrow());
    println!(
        "Turns: {}  Max tile: {}",
        turns,
        session.board().max_tile()
    );
    info!(turns, score = session.score(), "Autoplay finished");
    Ok(())
}
