use std::fmt;

use crate::{MAX_SCORE, MIN_SCORE};

/// A player as seen through the ranking
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Player {
    /// Unique, case-sensitive player name (1-32 characters)
    pub name: String,

    /// Current score, always within [MIN_SCORE, MAX_SCORE]
    pub score: i32,
}

impl Player {
    /// Create a new player, clamping the score into range
    pub fn new(name: impl Into<String>, score: i32) -> Self {
        Self { name: name.into(), score: clamp_score(score) }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.score)
    }
}

/// Addresses a player either by 1-based rank or by exact name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerRef<'a> {
    Rank(usize),
    Name(&'a str),
}

impl From<usize> for PlayerRef<'_> {
    fn from(rank: usize) -> Self {
        PlayerRef::Rank(rank)
    }
}

impl<'a> From<&'a str> for PlayerRef<'a> {
    fn from(name: &'a str) -> Self {
        PlayerRef::Name(name)
    }
}

impl<'a> From<&'a String> for PlayerRef<'a> {
    fn from(name: &'a String) -> Self {
        PlayerRef::Name(name.as_str())
    }
}

impl fmt::Display for PlayerRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerRef::Rank(rank) => write!(f, "rank {rank}"),
            PlayerRef::Name(name) => write!(f, "'{name}'"),
        }
    }
}

/// Saturate a score at the score bounds
pub fn clamp_score(score: i32) -> i32 {
    score.clamp(MIN_SCORE, MAX_SCORE)
}

/// Length of a name in characters
pub(crate) fn name_len(name: &str) -> usize {
    name.chars().count()
}

/// Longest prefix of `s` that is at most `max_chars` characters
pub(crate) fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
