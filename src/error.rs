// File: src/error.rs
use thiserror::Error;

/// Result type for trainer operations
pub type GameResult<T> = std::result::Result<T, GameError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("unknown user")]
    UnknownUser,
    #[error("invalid PIN")]
    BadPin,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegisterError {
    #[error("that user already exists")]
    DuplicateName,
    #[error("enter both a user name and a PIN")]
    MissingField,
}

#[derive(Debug, Error)]
pub enum VocabError {
    #[error("vocabulary unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("encoding error: {0}")]
    Encode(String),
}

impl From<bincode::Error> for StorageError {
    fn from(e: bincode::Error) -> Self {
        StorageError::Encode(e.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Encode(e.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Everything a front-end may have to show the player.
#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Register(#[from] RegisterError),

    #[error("no vocabulary is available")]
    VocabUnavailable,

    #[error("every word is already mastered")]
    NoEligibleWords,

    #[error("log in first")]
    NotLoggedIn,

    #[error("no round in progress")]
    NoActiveRound,

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<VocabError> for GameError {
    fn from(_: VocabError) -> Self {
        GameError::VocabUnavailable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_errors_lift_into_game_error() {
        let err: GameError = AuthError::BadPin.into();
        assert!(matches!(err, GameError::Auth(AuthError::BadPin)));
        assert_eq!(err.to_string(), "invalid PIN");
    }

    #[test]
    fn vocab_error_collapses_to_unavailable() {
        let err: GameError = VocabError::Unavailable("empty".into()).into();
        assert!(matches!(err, GameError::VocabUnavailable));
    }
}
