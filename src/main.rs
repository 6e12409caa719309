mod game;

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{info, warn};
use tracing_subscriber::filter::EnvFilter;

use wrapsnake::logic::GameLogic;
use wrapsnake::settings::{Overrides, Settings};
use wrapsnake::store::{JsonFileStore, MemoryStore, ScoreStore};

/// Snake on a wrapping board. Biting your own tail cuts it off.
///
/// Numeric options that do not start with a positive integer are ignored
/// and the default is used instead.
#[derive(Debug, Parser)]
#[command(name = "wrapsnake", version, about)]
struct Cli {
    /// Shortest the snake can get (default 3).
    #[arg(long = "min-length", env = "WRAPSNAKE_MIN_LENGTH", value_name = "CELLS")]
    min_length: Option<String>,
    /// Cells gained per food eaten (default 1).
    #[arg(long, env = "WRAPSNAKE_FEED", value_name = "CELLS")]
    feed: Option<String>,
    /// Board side length in cells (default 20).
    #[arg(long, env = "WRAPSNAKE_BOARD", value_name = "CELLS")]
    board: Option<String>,
    /// Ticks per second (default 10).
    #[arg(long, env = "WRAPSNAKE_SPEED", value_name = "TICKS")]
    speed: Option<String>,
    /// High-score file.
    #[arg(long, value_name = "PATH", default_value = "wrapsnake_scores.json")]
    scores: PathBuf,
    /// Keep high scores in memory only.
    #[arg(long)]
    no_save: bool,
    /// Log file; the terminal itself is taken by the game.
    #[arg(long = "log-file", value_name = "PATH", default_value = "wrapsnake.log")]
    log_file: PathBuf,
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn open_store(cli: &Cli) -> Box<dyn ScoreStore> {
    if cli.no_save {
        return Box::new(MemoryStore::default());
    }
    match JsonFileStore::open(&cli.scores) {
        Ok(store) => Box::new(store),
        Err(err) => {
            warn!(error = %err, "high scores will not be saved this session");
            Box::new(MemoryStore::default())
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_file)?;

    let settings = Settings::from_overrides(&Overrides {
        min_snake_length: cli.min_length.clone(),
        feed_grow: cli.feed.clone(),
        board_size: cli.board.clone(),
        game_speed: cli.speed.clone(),
    });
    info!(?settings, "starting wrapsnake");

    let logic = GameLogic::new(settings, open_store(&cli), rand::thread_rng());
    let mut game = game::Game::new(logic)?;
    game.run()?;

    let logic = game.logic();
    info!(score = logic.score(), high_score = logic.high_score(), "game closed");
    println!(
        "\nThanks for playing! Final score: {}, high score: {}",
        logic.score(),
        logic.high_score()
    );
    Ok(())
}
