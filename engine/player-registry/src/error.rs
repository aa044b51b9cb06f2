//! Error types for the player registry

use thiserror::Error;

/// Result type alias for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Errors that can occur while querying or mutating the registry
///
/// None of these leave the registry partially mutated: an operation that
/// returns an error has not touched any player.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Out-of-range limit, empty or oversized name passed to rename
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Rank outside [1, count]
    #[error("Invalid rank {rank}: registry holds {count} player(s)")]
    InvalidRank { rank: usize, count: usize },

    /// Name lookup miss
    #[error("Player '{0}' not found")]
    PlayerNotFound(String),

    /// Registry is already at its player limit
    #[error("Cannot add another player, limit of {limit} reached")]
    CapacityExceeded { limit: usize },

    /// Name longer than the allowed maximum
    #[error("Player name '{name}' is longer than {max} characters")]
    NameTooLong { name: String, max: usize },
}

impl RegistryError {
    /// Create a new invalid argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Whether this outcome is a warning rather than a failure
    ///
    /// A name lookup miss is expected during normal use and should be shown
    /// to the user as a warning.
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::PlayerNotFound(_))
    }
}

/// Errors that can occur while saving or loading player lists
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// I/O errors (file open, read, write)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed line in a player list
    #[error("Parse error on line {line}: {reason}")]
    Parse { line: usize, reason: String },

    /// Registry rejected the loaded players
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl PersistenceError {
    /// Create a new parse error
    pub fn parse(line: usize, reason: impl Into<String>) -> Self {
        Self::Parse { line, reason: reason.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_not_found_is_a_warning() {
        assert!(RegistryError::PlayerNotFound("Bob".into()).is_warning());
        assert!(!RegistryError::InvalidRank { rank: 4, count: 2 }.is_warning());
        assert!(!RegistryError::CapacityExceeded { limit: 1 }.is_warning());
        assert!(!RegistryError::invalid_argument("bad").is_warning());
    }

    #[test]
    fn test_error_messages() {
        let err = RegistryError::InvalidRank { rank: 0, count: 3 };
        assert_eq!(err.to_string(), "Invalid rank 0: registry holds 3 player(s)");

        let err = PersistenceError::parse(7, "missing tab");
        assert_eq!(err.to_string(), "Parse error on line 7: missing tab");

        let err = PersistenceError::from(RegistryError::CapacityExceeded { limit: 2 });
        assert_eq!(err.to_string(), "Cannot add another player, limit of 2 reached");
    }
}
