use crate::types::PlayerId;

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors raised by the engine side (registry and sessions).
///
/// Handler operations never fail; malformed player input is dropped there.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("Unknown game type: {0}")]
    UnknownGameType(String),

    #[error("Game type already registered: {0}")]
    DuplicateGameType(String),

    #[error("Not enough players: {actual} joined, {min} required")]
    NotEnoughPlayers { min: usize, actual: usize },

    #[error("Too many players: {actual} joined, at most {max} allowed")]
    TooManyPlayers { max: usize, actual: usize },

    #[error("Unknown player: {0}")]
    UnknownPlayer(PlayerId),

    #[error("Game is over")]
    GameOver,

    #[error("Round {0} is still in progress")]
    RoundInProgress(u32),

    #[error("No active round")]
    NoActiveRound,
}
