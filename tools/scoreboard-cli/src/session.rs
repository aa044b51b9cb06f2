//! Command dispatch against the registry

use crate::command::{Command, CommandError};
use player_registry::persistence;
use player_registry::{PersistenceError, PlayerRegistry, RegistryError, DEFAULT_TABLE_WIDTH};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Errors reported back to the prompt
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No {0} configured, pass a path")]
    NoPath(&'static str),
}

impl DispatchError {
    /// Whether this should be shown as a warning rather than an error
    pub fn is_warning(&self) -> bool {
        match self {
            DispatchError::Registry(err) => err.is_warning(),
            DispatchError::Persistence(PersistenceError::Registry(err)) => err.is_warning(),
            _ => false,
        }
    }
}

/// What the prompt should show after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing to report (blank line)
    Nothing,
    /// Show the table
    Table,
    /// The registry changed; show the message, then the table
    Changed(String),
    /// Show the message only
    Info(String),
    Help,
    Exit,
}

/// The registry together with the files the prompt reads and writes
pub struct Session {
    registry: PlayerRegistry,
    save_file: Option<PathBuf>,
    history_file: Option<PathBuf>,
    /// Set when the history file exists but could not be restored
    history_unreadable: bool,
}

impl Session {
    pub fn new(
        registry: PlayerRegistry,
        save_file: Option<PathBuf>,
        history_file: Option<PathBuf>,
    ) -> Self {
        Self { registry, save_file, history_file, history_unreadable: false }
    }

    pub fn registry(&self) -> &PlayerRegistry {
        &self.registry
    }

    /// Parse and run one input line
    pub fn handle_line(&mut self, line: &str) -> Result<Outcome, DispatchError> {
        match Command::parse(line)? {
            Some(command) => self.execute(command),
            None => Ok(Outcome::Nothing),
        }
    }

    /// Run one command; on error the registry is unchanged
    pub fn execute(&mut self, command: Command) -> Result<Outcome, DispatchError> {
        debug!("Executing {command:?}");
        let registry = &mut self.registry;

        let outcome = match command {
            Command::Print { file: None } => Outcome::Table,
            Command::Print { file: Some(path) } => {
                std::fs::write(&path, registry.render(DEFAULT_TABLE_WIDTH))?;
                Outcome::Info(format!("Scoreboard written to {}", path.display()))
            }
            Command::ShowPlayer(target) => {
                let rank = registry.rank_of(target.as_player_ref())?;
                let player = registry.get_player(rank)?;
                Outcome::Info(format!("{rank}. {} - score {}", player.name, player.score))
            }
            Command::AddPlayer { name, score } => {
                let name = registry.add_player(name.as_deref().unwrap_or(""), score)?;
                Outcome::Changed(format!("Added {name}"))
            }
            Command::RemovePlayer(target) => {
                let player = registry.remove_player(target.as_player_ref())?;
                Outcome::Changed(format!("Removed {}", player.name))
            }
            Command::RemoveAll => {
                registry.remove_all();
                Outcome::Changed("Removed all players".to_string())
            }
            Command::RenamePlayer { target, new_name } => {
                let old = registry.get_player(target.as_player_ref())?.name.clone();
                let name = registry.rename_player(target.as_player_ref(), &new_name)?;
                Outcome::Changed(format!("Renamed {old} to {name}"))
            }
            Command::AddScore { target, delta } => {
                let score = registry.add_pscore(target.as_player_ref(), delta)?;
                Outcome::Changed(format!("Score is now {score}"))
            }
            Command::Win(target) => {
                let score = registry.win(target.as_player_ref())?;
                Outcome::Changed(format!("Win recorded, score is now {score}"))
            }
            Command::Loss(target) => {
                let score = registry.loss(target.as_player_ref())?;
                Outcome::Changed(format!("Loss recorded, score is now {score}"))
            }
            Command::ResetScore(target) => {
                registry.reset_pscore(target.as_player_ref())?;
                Outcome::Changed("Score reset".to_string())
            }
            Command::ResetAll => {
                registry.reset_all_scores();
                Outcome::Changed("All scores reset".to_string())
            }
            Command::SetShowMax(n) => {
                registry.set_show_max(n)?;
                Outcome::Changed(format!("Showing up to {} players", registry.show_max()))
            }
            Command::SetMaxPlayers(n) => {
                let removed = registry.set_max_players(n)?;
                let mut message = format!("Player limit set to {}", registry.max_players());
                if !removed.is_empty() {
                    let names: Vec<&str> = removed.iter().map(|p| p.name.as_str()).collect();
                    message.push_str(&format!(", removed {}", names.join(", ")));
                }
                Outcome::Changed(message)
            }
            Command::Save(path) => {
                let path = resolve(path, self.save_file.as_deref(), "save file")?;
                persistence::save_to_file(registry, &path)?;
                Outcome::Info(format!("Saved {} players to {}", registry.len(), path.display()))
            }
            Command::LoadPlayers(path) => {
                let names = persistence::load_players_from_file(registry, &path)?;
                let count = names.len();
                Outcome::Changed(format!("Loaded {count} players from {}", path.display()))
            }
            Command::LoadHistory(path) => {
                let path = resolve(path, self.history_file.as_deref(), "history file")?;
                let count = persistence::load_history_from_file(registry, &path)?;
                if self.history_file.as_ref() == Some(&path) {
                    self.history_unreadable = false;
                }
                Outcome::Changed(format!("Restored {count} players from {}", path.display()))
            }
            Command::Help => Outcome::Help,
            Command::Exit => Outcome::Exit,
        };

        Ok(outcome)
    }

    /// Load the history file at startup, if one is configured and present
    ///
    /// On failure the file is marked unreadable and `save_history` leaves it
    /// alone until a later `load history` of the same file succeeds.
    pub fn restore_history(&mut self) -> Result<Option<usize>, PersistenceError> {
        match &self.history_file {
            Some(path) if path.exists() => {
                match persistence::load_history_from_file(&mut self.registry, path) {
                    Ok(count) => {
                        info!("Restored {count} players from {}", path.display());
                        Ok(Some(count))
                    }
                    Err(e) => {
                        self.history_unreadable = true;
                        Err(e)
                    }
                }
            }
            _ => Ok(None),
        }
    }

    /// Save to the history file on exit, if one is configured
    ///
    /// Returns `false` when nothing was written: no history file is
    /// configured, or the existing one could not be restored.
    pub fn save_history(&self) -> Result<bool, PersistenceError> {
        match &self.history_file {
            Some(_) if self.history_unreadable => Ok(false),
            Some(path) => {
                persistence::save_to_file(&self.registry, path)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// The history file that failed to restore, if any
    pub fn unreadable_history(&self) -> Option<&Path> {
        self.history_file.as_deref().filter(|_| self.history_unreadable)
    }
}

fn resolve(
    given: Option<PathBuf>,
    configured: Option<&Path>,
    what: &'static str,
) -> Result<PathBuf, DispatchError> {
    given.or_else(|| configured.map(Path::to_path_buf)).ok_or(DispatchError::NoPath(what))
}
