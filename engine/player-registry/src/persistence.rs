//! Plain-text player lists
//!
//! One player per line as `<name>\t<score>`, split at the last tab. Blank
//! lines and `#` lines without a tab are skipped. Loading validates the whole
//! list before the registry is touched.

use crate::error::{PersistenceError, RegistryError};
use crate::registry::PlayerRegistry;
use crate::types::name_len;
use crate::MAX_NAME_LEN;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Result type alias for persistence operations
pub type Result<T> = std::result::Result<T, PersistenceError>;

/// Write every player, in rank order, to `writer`
pub fn save_players<W: Write>(registry: &PlayerRegistry, mut writer: W) -> Result<()> {
    let saved_at = chrono::Local::now().to_rfc3339();
    writeln!(writer, "# {} player(s), saved {saved_at}", registry.len())?;
    for player in registry.iter() {
        writeln!(writer, "{}\t{}", player.name, player.score)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write every player to the file at `path`, replacing it
pub fn save_to_file<P: AsRef<Path>>(registry: &PlayerRegistry, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    save_players(registry, BufWriter::new(file))?;
    info!("Saved {} players to {:?}", registry.len(), path.as_ref());
    Ok(())
}

/// Parse a player list without applying it
pub fn parse_players<R: BufRead>(reader: R) -> Result<Vec<(String, i32)>> {
    let mut players = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = index + 1;
        let line = line.trim_end_matches('\r');

        if line.trim().is_empty() || (line.starts_with('#') && !line.contains('\t')) {
            continue;
        }

        let (name, score) = line
            .rsplit_once('\t')
            .ok_or_else(|| PersistenceError::parse(line_no, "expected <name><TAB><score>"))?;

        if name.is_empty() {
            return Err(PersistenceError::parse(line_no, "empty player name"));
        }
        if name_len(name) > MAX_NAME_LEN {
            return Err(PersistenceError::parse(
                line_no,
                format!("player name '{name}' is longer than {MAX_NAME_LEN} characters"),
            ));
        }

        let score: i32 = score.trim().parse().map_err(|e| {
            PersistenceError::parse(line_no, format!("invalid score '{}': {e}", score.trim()))
        })?;

        players.push((name.to_string(), score));
    }

    Ok(players)
}

/// Append the players read from `reader` and return their final names
///
/// Fails before adding anyone if they would not all fit under the limit.
pub fn load_players<R: BufRead>(registry: &mut PlayerRegistry, reader: R) -> Result<Vec<String>> {
    let players = parse_players(reader)?;

    let free = registry.max_players().saturating_sub(registry.len());
    if players.len() > free {
        return Err(RegistryError::CapacityExceeded { limit: registry.max_players() }.into());
    }

    let names = replay(registry, players)?;
    info!("Loaded {} players", names.len());
    Ok(names)
}

/// Append the players stored in the file at `path`
pub fn load_players_from_file<P: AsRef<Path>>(
    registry: &mut PlayerRegistry,
    path: P,
) -> Result<Vec<String>> {
    let file = File::open(path.as_ref())?;
    load_players(registry, BufReader::new(file))
}

/// Replace the registry contents with the players read from `reader`
///
/// Returns the number of players restored. Fails before removing anyone if
/// the list is longer than the player limit.
pub fn load_history<R: BufRead>(registry: &mut PlayerRegistry, reader: R) -> Result<usize> {
    let players = parse_players(reader)?;

    if players.len() > registry.max_players() {
        return Err(RegistryError::CapacityExceeded { limit: registry.max_players() }.into());
    }

    registry.remove_all();
    let count = replay(registry, players)?.len();
    info!("Restored {count} players from history");
    Ok(count)
}

/// Replace the registry contents with the players stored in the file at `path`
pub fn load_history_from_file<P: AsRef<Path>>(
    registry: &mut PlayerRegistry,
    path: P,
) -> Result<usize> {
    let file = File::open(path.as_ref())?;
    load_history(registry, BufReader::new(file))
}

fn replay(registry: &mut PlayerRegistry, players: Vec<(String, i32)>) -> Result<Vec<String>> {
    players
        .into_iter()
        .map(|(name, score)| registry.add_player(&name, score).map_err(PersistenceError::from))
        .collect()
}
