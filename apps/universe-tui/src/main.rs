//! Terminal front-end for the Universe tile world.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p universe-tui
//! cargo run -p universe-tui -- --seed 1234 --chunk-x -2 --name ada
//! cargo run -p universe-tui -- --memory --debug
//! ```

mod app;
mod ui;

use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;
use universe_game::{create_initial_state, GameWorld, InitialParams};
use universe_world::{EditStore, FileEditStore, MemoryEditStore, WorldConfig};

use app::App;

#[derive(Parser, Debug)]
#[command(name = "universe", version, about = "Explore a procedurally generated 2D tile world")]
struct Args {
    /// World seed; the current time when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Chunk to start in; the outermost chunks have no full window
    #[arg(
        long,
        default_value_t = 0,
        allow_hyphen_values = true,
        value_parser = clap::value_parser!(i32).range(i64::from(i32::MIN) + 1..i64::from(i32::MAX))
    )]
    chunk_x: i32,

    /// Player display name
    #[arg(long, default_value = "Player")]
    name: String,

    /// Verbose logging and extra status output
    #[arg(long)]
    debug: bool,

    /// World configuration file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding persisted edits
    #[arg(long, default_value = "saves")]
    save_dir: PathBuf,

    /// Keep edits in memory only
    #[arg(long)]
    memory: bool,

    /// Log file; the terminal itself belongs to the UI
    #[arg(long, default_value = "universe.log")]
    log_file: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    let config = match &args.config {
        Some(path) => WorldConfig::load(path)
            .with_context(|| format!("failed to load world config {}", path.display()))?,
        None => WorldConfig::default(),
    };

    let params = InitialParams {
        seed: args.seed,
        chunk_x: args.chunk_x,
        player_name: args.name.clone(),
        debug: args.debug,
    };
    let state = create_initial_state(&params, &config);

    let store: Box<dyn EditStore> = if args.memory {
        Box::new(MemoryEditStore::new())
    } else {
        let store = FileEditStore::open(&args.save_dir, state.seed)
            .with_context(|| format!("failed to open edit store in {}", args.save_dir.display()))?;
        info!(path = %store.path().display(), "using edit file");
        Box::new(store)
    };

    let world = GameWorld::new(&config, store);
    let mut app = App::new(world, state)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("session ended");
    result
}

fn init_logging(args: &Args) -> anyhow::Result<()> {
    let file = File::create(&args.log_file)
        .with_context(|| format!("failed to create log file {}", args.log_file.display()))?;
    let default_filter = if args.debug { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
