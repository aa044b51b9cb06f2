//! Player Registry - Ranked scoreboard of named players
//!
//! This crate keeps a name-keyed collection of players that is queryable both
//! by name and by rank, re-sorted after every mutation, and renders it as a
//! fixed-width terminal table.

pub mod error;
pub mod persistence;
pub mod registry;
pub mod table;
pub mod types;


pub use error::{PersistenceError, RegistryError, Result};
pub use registry::PlayerRegistry;
pub use types::{Player, PlayerRef};

/// Lowest score a player can hold
pub const MIN_SCORE: i32 = -9999;

/// Highest score a player can hold
pub const MAX_SCORE: i32 = 9999;

/// Maximum player name length, in characters
pub const MAX_NAME_LEN: usize = 32;

/// Default cap on the number of players
pub const DEFAULT_MAX_PLAYERS: usize = 255;

/// Absolute ceiling for both the player limit and the show limit
pub const PLAYER_LIMIT_CEILING: usize = 65535;

/// Base name used when a player is added without one
pub const DEFAULT_PLAYER_NAME: &str = "Player";

/// Table width used when the terminal width is unknown
pub const DEFAULT_TABLE_WIDTH: usize = 80;
