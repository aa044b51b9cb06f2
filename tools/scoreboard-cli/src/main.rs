//! Scoreboard CLI
//!
//! Interactive terminal scoreboard: players ranked by score, ties broken
//! alphabetically, driven by one command per line at the `SB> ` prompt.

mod command;
mod config;
mod logging;
mod session;
mod shell;

use anyhow::{Context, Result};
use clap::Parser;
use player_registry::{table, PlayerRegistry};
use std::io;
use std::path::PathBuf;
use tracing::{info, warn};

use config::ScoreboardConfig;
use session::Session;

#[derive(Parser)]
#[command(name = "scoreboard")]
#[command(about = "Terminal scoreboard - ranked players with win/loss scoring")]
#[command(version)]
struct Cli {
    /// Number of default-named players created at startup
    #[arg(short = 'p', long = "players")]
    players: Option<usize>,

    /// How many players are shown at once (default: fits the terminal height)
    #[arg(short = 's', long = "show")]
    show: Option<usize>,

    /// Maximum number of players (at most 65535)
    #[arg(short = 'm', long = "max")]
    max: Option<usize>,

    /// File that `save` writes to when no path is given
    #[arg(short = 'f', long = "file")]
    file: Option<PathBuf>,

    /// Player list restored at startup and saved on exit
    #[arg(short = 'H', long = "history")]
    history: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Log filter, e.g. "info" or "player_registry=debug"
    #[arg(long)]
    log_level: Option<String>,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

impl Cli {
    /// Command-line values override the configuration file
    fn apply_to(&self, config: &mut ScoreboardConfig) {
        if let Some(players) = self.players {
            config.initial_players = players;
        }
        if let Some(show) = self.show {
            config.show_max = Some(show);
        }
        if let Some(max) = self.max {
            config.max_players = max;
        }
        if let Some(file) = &self.file {
            config.save_file = Some(file.clone());
        }
        if let Some(history) = &self.history {
            config.history_file = Some(history.clone());
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ScoreboardConfig::load_from_file(path)?,
        None => ScoreboardConfig::default(),
    };
    cli.apply_to(&mut config);
    config.validate()?;

    if cli.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    logging::initialize_logging(&config.logging.level, &config.logging.format)
        .context("Failed to initialize logging")?;

    let (_, height) = shell::terminal_size();
    let show_max = config.show_max.unwrap_or_else(|| table::players_for_height(height));
    let registry = PlayerRegistry::new(config.initial_players, show_max, config.max_players);
    info!("Scoreboard ready: show {show_max}, limit {}", config.max_players);

    let mut session = Session::new(registry, config.save_file, config.history_file);
    if let Err(e) = session.restore_history() {
        warn!("Could not restore history, starting fresh and leaving the file untouched: {e}");
    }

    let stdin = io::stdin();
    shell::run(&mut session, stdin.lock(), io::stdout(), || shell::terminal_size().0)
        .context("Prompt failed")?;

    let saved = session.save_history().context("Failed to save history")?;
    if let (false, Some(path)) = (saved, session.unreadable_history()) {
        warn!("History not saved, {} was not restored at startup", path.display());
    }
    Ok(())
}
