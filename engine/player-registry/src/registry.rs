use crate::error::{RegistryError, Result};
use crate::table;
use crate::types::{clamp_score, name_len, truncate_chars, Player, PlayerRef};
use crate::{DEFAULT_MAX_PLAYERS, DEFAULT_PLAYER_NAME, MAX_NAME_LEN, PLAYER_LIMIT_CEILING};
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Player Registry - Named players kept in rank order
///
/// Players are stored once in a name-keyed map, which enforces uniqueness and
/// gives name lookups. The ranking is a sorted copy derived from that map and
/// rebuilt by every operation that can change a score, a name or membership.
pub struct PlayerRegistry {
    /// Map from player name to score
    players: HashMap<String, i32>,

    /// Players sorted by score descending, then name ascending
    ranking: Vec<Player>,

    /// How many top-ranked players the table shows
    show_max: usize,

    /// Hard cap on the number of players
    max_players: usize,
}

/// Rank order: higher score first, ties broken by ascending name
pub fn rank_order(a: &Player, b: &Player) -> Ordering {
    b.score.cmp(&a.score).then_with(|| a.name.cmp(&b.name))
}

impl PlayerRegistry {
    /// Create a registry populated with `initial_count` default-named players
    ///
    /// `initial_count` is clamped to `max_players`, and both limits are clamped
    /// to the absolute ceiling. Clamping is reported as a warning.
    pub fn new(initial_count: usize, show_max: usize, max_players: usize) -> Self {
        if max_players > PLAYER_LIMIT_CEILING || show_max > PLAYER_LIMIT_CEILING {
            warn!("Player limits are capped at {PLAYER_LIMIT_CEILING}");
        }
        let max_players = max_players.min(PLAYER_LIMIT_CEILING);
        let show_max = show_max.min(PLAYER_LIMIT_CEILING);

        let initial_count = if initial_count > max_players {
            warn!(
                "Only {max_players} players will be created, change this limit later with `set max N`"
            );
            max_players
        } else {
            initial_count
        };

        let mut registry = Self {
            players: HashMap::with_capacity(initial_count),
            ranking: Vec::with_capacity(initial_count),
            show_max,
            max_players,
        };

        // Names match what repeated add_player("") calls produce
        for i in 0..initial_count {
            let name = match i {
                0 => DEFAULT_PLAYER_NAME.to_string(),
                _ => format!("{DEFAULT_PLAYER_NAME}({i})"),
            };
            registry.players.insert(name, 0);
        }
        registry.rebuild_ranking();

        debug!("Created registry with {initial_count} players (limit {max_players})");
        registry
    }

    /// Set how many top-ranked players the table shows
    pub fn set_show_max(&mut self, n: i64) -> Result<()> {
        self.show_max = validate_limit(n, "show limit")?;
        debug!("Show limit set to {}", self.show_max);
        Ok(())
    }

    /// Set the player limit, dropping the lowest-ranked surplus players
    ///
    /// Returns the removed players, lowest rank last.
    pub fn set_max_players(&mut self, n: i64) -> Result<Vec<Player>> {
        let limit = validate_limit(n, "player limit")?;

        let removed =
            if self.ranking.len() > limit { self.ranking.split_off(limit) } else { Vec::new() };
        for player in &removed {
            self.players.remove(&player.name);
        }
        if !removed.is_empty() {
            warn!("Removed {} player(s) above the new limit of {limit}", removed.len());
        }

        self.max_players = limit;
        Ok(removed)
    }

    /// Add a player and return its final, disambiguated name
    ///
    /// An empty `name` gets the default base name. A name that is already
    /// taken gets the first free `(N)` suffix.
    pub fn add_player(&mut self, name: &str, score: i32) -> Result<String> {
        if self.players.len() >= self.max_players {
            return Err(RegistryError::CapacityExceeded { limit: self.max_players });
        }
        if name_len(name) > MAX_NAME_LEN {
            return Err(RegistryError::NameTooLong { name: name.to_string(), max: MAX_NAME_LEN });
        }

        let base = if name.is_empty() { DEFAULT_PLAYER_NAME } else { name };
        let final_name = self.unique_name(base, None);
        let score = clamp_score(score);

        self.players.insert(final_name.clone(), score);
        self.rebuild_ranking();

        debug!("Added player {final_name} with score {score}");
        Ok(final_name)
    }

    /// Get a player by rank or name
    pub fn get_player<'a>(&self, target: impl Into<PlayerRef<'a>>) -> Result<&Player> {
        let index = self.locate(target.into())?;
        Ok(&self.ranking[index])
    }

    /// Current 1-based rank of a player
    pub fn rank_of<'a>(&self, target: impl Into<PlayerRef<'a>>) -> Result<usize> {
        self.locate(target.into()).map(|index| index + 1)
    }

    /// Remove a player by rank or name and return it
    pub fn remove_player<'a>(&mut self, target: impl Into<PlayerRef<'a>>) -> Result<Player> {
        let index = self.locate(target.into())?;

        // Removing one element keeps the rest in rank order
        let player = self.ranking.remove(index);
        self.players.remove(&player.name);

        debug!("Removed player {player}");
        Ok(player)
    }

    /// Remove every player
    pub fn remove_all(&mut self) {
        self.players.clear();
        self.ranking.clear();
        debug!("Removed all players");
    }

    /// Rename a player, keeping its score, and return the final name
    ///
    /// The player being renamed never collides with itself, so renaming to
    /// the current name is a no-op.
    pub fn rename_player<'a>(
        &mut self,
        target: impl Into<PlayerRef<'a>>,
        new_name: &str,
    ) -> Result<String> {
        if new_name.is_empty() {
            return Err(RegistryError::invalid_argument("new player name cannot be empty"));
        }
        if name_len(new_name) > MAX_NAME_LEN {
            return Err(RegistryError::invalid_argument(format!(
                "new player name '{new_name}' is longer than {MAX_NAME_LEN} characters"
            )));
        }

        let index = self.locate(target.into())?;
        let Player { name: old_name, score } = self.ranking[index].clone();

        let final_name = self.unique_name(new_name, Some(&old_name));
        if final_name == old_name {
            return Ok(final_name);
        }

        self.players.remove(&old_name);
        self.players.insert(final_name.clone(), score);
        self.rebuild_ranking();

        debug!("Renamed player {old_name} to {final_name}");
        Ok(final_name)
    }

    /// Add `delta` to a player's score, saturating at the score bounds
    ///
    /// Returns the new score.
    pub fn add_pscore<'a>(&mut self, target: impl Into<PlayerRef<'a>>, delta: i32) -> Result<i32> {
        let index = self.locate(target.into())?;
        let current = self.ranking[index].score;
        let score = clamp_score(current.saturating_add(delta));

        if score != current.saturating_add(delta) {
            warn!("Score of {} clamped to {score}", self.ranking[index].name);
        }

        self.set_score_at(index, score);
        Ok(score)
    }

    /// Add one point to a player's score
    pub fn win<'a>(&mut self, target: impl Into<PlayerRef<'a>>) -> Result<i32> {
        self.add_pscore(target, 1)
    }

    /// Take one point from a player's score
    pub fn loss<'a>(&mut self, target: impl Into<PlayerRef<'a>>) -> Result<i32> {
        self.add_pscore(target, -1)
    }

    /// Reset a player's score to zero
    pub fn reset_pscore<'a>(&mut self, target: impl Into<PlayerRef<'a>>) -> Result<()> {
        let index = self.locate(target.into())?;
        self.set_score_at(index, 0);
        Ok(())
    }

    /// Reset every player's score to zero
    pub fn reset_all_scores(&mut self) {
        for score in self.players.values_mut() {
            *score = 0;
        }
        self.rebuild_ranking();
        debug!("Reset all scores");
    }

    /// Render the top `show_max` players as a table `width` columns wide
    pub fn render(&self, width: usize) -> String {
        table::render(self.ranking.iter().take(self.show_max), width)
    }

    /// Players in rank order
    pub fn ranking(&self) -> &[Player] {
        &self.ranking
    }

    /// Iterate over players in rank order
    pub fn iter(&self) -> std::slice::Iter<'_, Player> {
        self.ranking.iter()
    }

    /// Check whether a player with exactly this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.players.contains_key(name)
    }

    /// Number of players
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// How many players the table shows
    pub fn show_max(&self) -> usize {
        self.show_max
    }

    /// Player limit
    pub fn max_players(&self) -> usize {
        self.max_players
    }

    /// Resolve a rank or name to an index into the ranking
    fn locate(&self, target: PlayerRef<'_>) -> Result<usize> {
        match target {
            PlayerRef::Rank(rank) => {
                if rank < 1 || rank > self.ranking.len() {
                    return Err(RegistryError::InvalidRank { rank, count: self.ranking.len() });
                }
                Ok(rank - 1)
            }
            PlayerRef::Name(name) => {
                let not_found = || RegistryError::PlayerNotFound(name.to_string());
                let score = *self.players.get(name).ok_or_else(not_found)?;

                // The ranking is sorted by (score desc, name asc), so the
                // player's own key finds it directly
                self.ranking
                    .binary_search_by(|p| {
                        score.cmp(&p.score).then_with(|| p.name.as_str().cmp(name))
                    })
                    .map_err(|_| not_found())
            }
        }
    }

    fn set_score_at(&mut self, index: usize, score: i32) {
        let name = &self.ranking[index].name;
        if let Some(entry) = self.players.get_mut(name) {
            *entry = score;
        }
        debug!("Score of {name} set to {score}");
        self.rebuild_ranking();
    }

    /// First free name built from `base`, ignoring `exclude`
    ///
    /// Tries `base`, then `base(1)`, `base(2)`, ... The base is shortened when
    /// needed so that the suffixed name stays within the length limit.
    fn unique_name(&self, base: &str, exclude: Option<&str>) -> String {
        let is_free = |candidate: &str| {
            exclude == Some(candidate) || !self.players.contains_key(candidate)
        };

        if is_free(base) {
            return base.to_string();
        }

        let mut n: usize = 1;
        loop {
            let suffix = format!("({n})");
            let room = MAX_NAME_LEN.saturating_sub(suffix.len());
            let candidate = format!("{}{suffix}", truncate_chars(base, room));
            if is_free(candidate.as_str()) {
                return candidate;
            }
            n += 1;
        }
    }

    fn rebuild_ranking(&mut self) {
        let mut ranking: Vec<Player> = self
            .players
            .iter()
            .map(|(name, &score)| Player { name: name.clone(), score })
            .collect();
        ranking.sort_unstable_by(rank_order);
        self.ranking = ranking;
    }
}

impl Default for PlayerRegistry {
    fn default() -> Self {
        Self::new(0, DEFAULT_MAX_PLAYERS, DEFAULT_MAX_PLAYERS)
    }
}

fn validate_limit(n: i64, what: &str) -> Result<usize> {
    usize::try_from(n).ok().filter(|&limit| limit <= PLAYER_LIMIT_CEILING).ok_or_else(|| {
        RegistryError::invalid_argument(format!(
            "{what} must be between 0 and {PLAYER_LIMIT_CEILING}, got {n}"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MAX_SCORE, MIN_SCORE};

    fn names(registry: &PlayerRegistry) -> Vec<&str> {
        registry.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_registry_creation() {
        let registry = PlayerRegistry::new(3, 10, 255);

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.show_max(), 10);
        assert_eq!(registry.max_players(), 255);
        assert_eq!(names(&registry), vec!["Player", "Player(1)", "Player(2)"]);
    }

    #[test]
    fn test_initial_count_clamped_to_limit() {
        let registry = PlayerRegistry::new(10, 5, 4);
        assert_eq!(registry.len(), 4);

        let registry = PlayerRegistry::new(1, 70_000, 70_000);
        assert_eq!(registry.max_players(), PLAYER_LIMIT_CEILING);
        assert_eq!(registry.show_max(), PLAYER_LIMIT_CEILING);
    }

    #[test]
    fn test_default_names_in_order() {
        let mut registry = PlayerRegistry::default();
        for _ in 0..4 {
            registry.add_player("", 0).unwrap();
        }
        assert!(registry.contains("Player"));
        assert!(registry.contains("Player(1)"));
        assert!(registry.contains("Player(2)"));
        assert!(registry.contains("Player(3)"));
    }

    #[test]
    fn test_add_player_capacity() {
        let mut registry = PlayerRegistry::new(0, 10, 2);
        registry.add_player("Alice", 0).unwrap();
        registry.add_player("Bob", 0).unwrap();

        let err = registry.add_player("Carol", 0).unwrap_err();
        assert_eq!(err, RegistryError::CapacityExceeded { limit: 2 });
        assert_eq!(registry.len(), 2);
        assert!(!registry.contains("Carol"));
    }

    #[test]
    fn test_add_player_name_too_long() {
        let mut registry = PlayerRegistry::default();
        let long = "x".repeat(MAX_NAME_LEN + 1);

        let err = registry.add_player(&long, 0).unwrap_err();
        assert!(matches!(err, RegistryError::NameTooLong { max: MAX_NAME_LEN, .. }));
        assert!(registry.is_empty());

        // Exactly at the limit is fine
        let exact = "y".repeat(MAX_NAME_LEN);
        assert_eq!(registry.add_player(&exact, 0).unwrap(), exact);
    }

    #[test]
    fn test_suffix_fits_full_length_name() {
        let mut registry = PlayerRegistry::default();
        let exact = "y".repeat(MAX_NAME_LEN);
        registry.add_player(&exact, 0).unwrap();

        let second = registry.add_player(&exact, 0).unwrap();
        assert_eq!(second, format!("{}(1)", "y".repeat(MAX_NAME_LEN - 3)));
        assert_eq!(second.chars().count(), MAX_NAME_LEN);
    }

    #[test]
    fn test_add_player_clamps_score() {
        let mut registry = PlayerRegistry::default();
        registry.add_player("High", 50_000).unwrap();
        registry.add_player("Low", -50_000).unwrap();

        assert_eq!(registry.get_player("High").unwrap().score, MAX_SCORE);
        assert_eq!(registry.get_player("Low").unwrap().score, MIN_SCORE);
    }

    #[test]
    fn test_get_player_by_rank_and_name() {
        let mut registry = PlayerRegistry::default();
        registry.add_player("Alice", 3).unwrap();
        registry.add_player("Bob", 7).unwrap();

        assert_eq!(registry.get_player(1usize).unwrap().name, "Bob");
        assert_eq!(registry.get_player(2usize).unwrap().name, "Alice");
        assert_eq!(registry.get_player("Alice").unwrap().score, 3);
        assert_eq!(registry.rank_of("Alice").unwrap(), 2);

        assert_eq!(
            registry.get_player(0usize).unwrap_err(),
            RegistryError::InvalidRank { rank: 0, count: 2 }
        );
        assert_eq!(
            registry.get_player(3usize).unwrap_err(),
            RegistryError::InvalidRank { rank: 3, count: 2 }
        );
        assert!(registry.get_player("Zed").unwrap_err().is_warning());
        assert!(registry.get_player("").unwrap_err().is_warning());
    }

    #[test]
    fn test_remove_player() {
        let mut registry = PlayerRegistry::default();
        registry.add_player("Alice", 3).unwrap();
        registry.add_player("Bob", 7).unwrap();
        registry.add_player("Carol", 5).unwrap();

        let removed = registry.remove_player(2usize).unwrap();
        assert_eq!(removed, Player::new("Carol", 5));
        assert_eq!(names(&registry), vec!["Bob", "Alice"]);

        registry.remove_player("Bob").unwrap();
        assert_eq!(names(&registry), vec!["Alice"]);
        assert!(!registry.contains("Bob"));

        assert!(matches!(
            registry.remove_player("Bob").unwrap_err(),
            RegistryError::PlayerNotFound(_)
        ));
    }

    #[test]
    fn test_remove_from_empty_registry() {
        let mut registry = PlayerRegistry::default();
        assert_eq!(
            registry.remove_player(1usize).unwrap_err(),
            RegistryError::InvalidRank { rank: 1, count: 0 }
        );
        assert!(registry.is_empty());

        registry.remove_all();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_rename_player() {
        let mut registry = PlayerRegistry::default();
        registry.add_player("Alice", 5).unwrap();
        registry.add_player("Bob", 1).unwrap();

        let name = registry.rename_player("Bob", "Alice").unwrap();
        assert_eq!(name, "Alice(1)");
        assert_eq!(registry.get_player("Alice(1)").unwrap().score, 1);
        assert!(!registry.contains("Bob"));

        let name = registry.rename_player(1usize, "Zoe").unwrap();
        assert_eq!(name, "Zoe");
        assert_eq!(registry.get_player(1usize).unwrap(), &Player::new("Zoe", 5));
    }

    #[test]
    fn test_rename_to_self_keeps_name() {
        let mut registry = PlayerRegistry::default();
        registry.add_player("Alice", 5).unwrap();
        registry.add_player("Alice", 2).unwrap();

        assert_eq!(registry.rename_player("Alice", "Alice").unwrap(), "Alice");

        // "Alice" is taken by someone else and "Alice(1)" is the player itself
        assert_eq!(registry.rename_player("Alice(1)", "Alice").unwrap(), "Alice(1)");
        assert_eq!(names(&registry), vec!["Alice", "Alice(1)"]);
    }

    #[test]
    fn test_rename_rejects_bad_names() {
        let mut registry = PlayerRegistry::default();
        registry.add_player("Alice", 5).unwrap();

        assert!(matches!(
            registry.rename_player("Alice", "").unwrap_err(),
            RegistryError::InvalidArgument(_)
        ));
        assert!(matches!(
            registry.rename_player("Alice", &"n".repeat(33)).unwrap_err(),
            RegistryError::InvalidArgument(_)
        ));
        assert!(matches!(
            registry.rename_player("Nobody", "Bob").unwrap_err(),
            RegistryError::PlayerNotFound(_)
        ));
        assert!(matches!(
            registry.rename_player(4usize, "Bob").unwrap_err(),
            RegistryError::InvalidRank { rank: 4, count: 1 }
        ));
        assert_eq!(names(&registry), vec!["Alice"]);
    }

    #[test]
    fn test_score_clamping() {
        let mut registry = PlayerRegistry::default();
        registry.add_player("Alice", 9990).unwrap();

        assert_eq!(registry.add_pscore("Alice", 100).unwrap(), MAX_SCORE);
        assert_eq!(registry.add_pscore("Alice", i32::MIN).unwrap(), MIN_SCORE);
        assert_eq!(registry.add_pscore("Alice", i32::MAX).unwrap(), MAX_SCORE);
        assert_eq!(registry.loss(1usize).unwrap(), MAX_SCORE - 1);
        assert_eq!(registry.win(1usize).unwrap(), MAX_SCORE);
    }

    #[test]
    fn test_reset_scores() {
        let mut registry = PlayerRegistry::default();
        registry.add_player("Alice", 4).unwrap();
        registry.add_player("Bob", 9).unwrap();

        registry.reset_pscore(1usize).unwrap();
        assert_eq!(registry.get_player("Bob").unwrap().score, 0);
        assert_eq!(names(&registry), vec!["Alice", "Bob"]);

        registry.reset_all_scores();
        assert!(registry.iter().all(|p| p.score == 0));

        assert!(registry.reset_pscore("Nobody").unwrap_err().is_warning());
    }

    #[test]
    fn test_set_show_max() {
        let mut registry = PlayerRegistry::new(3, 10, 255);

        registry.set_show_max(1).unwrap();
        assert_eq!(registry.show_max(), 1);
        assert!(registry.set_show_max(-1).is_err());
        assert!(registry.set_show_max(65_536).is_err());
        assert_eq!(registry.show_max(), 1);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_set_max_players_drops_lowest() {
        let mut registry = PlayerRegistry::default();
        for (name, score) in [("A", 1), ("B", 5), ("C", 3), ("D", 9), ("E", 3)] {
            registry.add_player(name, score).unwrap();
        }

        let removed = registry.set_max_players(3).unwrap();
        assert_eq!(removed, vec![Player::new("E", 3), Player::new("A", 1)]);
        assert_eq!(names(&registry), vec!["D", "B", "C"]);
        assert_eq!(registry.max_players(), 3);

        assert!(registry.set_max_players(-5).is_err());
        assert!(registry.set_max_players(70_000).is_err());
        assert_eq!(registry.max_players(), 3);

        assert!(registry.set_max_players(10).unwrap().is_empty());
        assert_eq!(registry.len(), 3);
    }
}
