//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from the store, the record codec and the rules so the
//! dispatcher can classify every error by [`ErrorSeverity`] alone.

use game_core::{
    ErrorSeverity, ExecuteError, GameError, GameId, InteractionError, InvariantViolation,
    RuleError,
};
use thiserror::Error;

pub use crate::records::RecordError;
pub use crate::store::StoreError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Rule(#[from] RuleError),

    #[error(transparent)]
    Interaction(#[from] InteractionError),

    #[error(transparent)]
    Invariant(#[from] InvariantViolation),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Record(#[from] RecordError),

    #[error("there is no game in this channel")]
    NoGameInChannel,

    #[error("this channel already has a game")]
    ChannelTaken,

    #[error("game {0} not found")]
    GameNotFound(GameId),

    #[error("unknown command {0:?}")]
    UnknownCommand(String),

    #[error("missing argument: {0}")]
    MissingArgument(&'static str),

    #[error("invalid {name}: {value:?}")]
    InvalidArgument { name: &'static str, value: String },

    #[error("gave up on game {game_id} after {attempts} conflicting commits")]
    CommitRetriesExhausted { game_id: GameId, attempts: u32 },

    #[error("content could not be loaded: {0}")]
    Content(String),
}

impl From<ExecuteError> for RuntimeError {
    fn from(err: ExecuteError) -> Self {
        match err {
            ExecuteError::Rule(e) => RuntimeError::Rule(e),
            ExecuteError::Invariant(e) => RuntimeError::Invariant(e),
        }
    }
}

impl GameError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Rule(e) => e.severity(),
            Self::Interaction(e) => e.severity(),
            Self::Invariant(e) => e.severity(),
            Self::Store(e) if e.is_conflict() => ErrorSeverity::Conflict,
            Self::Store(_) | Self::Record(_) | Self::Content(_) => ErrorSeverity::Fatal,
            Self::CommitRetriesExhausted { .. } => ErrorSeverity::Fatal,
            // an interaction whose game is gone behaves like a missing one
            Self::GameNotFound(_) => ErrorSeverity::Permission,
            Self::NoGameInChannel
            | Self::ChannelTaken
            | Self::UnknownCommand(_)
            | Self::MissingArgument(_)
            | Self::InvalidArgument { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Rule(e) => e.error_code(),
            Self::Interaction(e) => e.error_code(),
            Self::Invariant(e) => e.error_code(),
            Self::Store(_) => "store",
            Self::Record(_) => "record",
            Self::NoGameInChannel => "no_game_in_channel",
            Self::ChannelTaken => "channel_taken",
            Self::GameNotFound(_) => "game_not_found",
            Self::UnknownCommand(_) => "unknown_command",
            Self::MissingArgument(_) => "missing_argument",
            Self::InvalidArgument { .. } => "invalid_argument",
            Self::CommitRetriesExhausted { .. } => "commit_retries_exhausted",
            Self::Content(_) => "content",
        }
    }
}
