//! Common error infrastructure for game-core.
//!
//! Every failure a rule can produce falls into one of four classes, and the
//! outer layers decide what to do purely from that class:
//!
//! - **Validation**: the player asked for something the rules forbid. Reported
//!   to the invoking player; nothing is committed.
//! - **Permission**: the responder may not use this interaction. Treated as if
//!   the interaction did not exist.
//! - **Conflict**: a concurrent write won the race. Only the runtime produces
//!   these and it retries them itself.
//! - **Fatal**: an invariant of the aggregate is broken (missing planet,
//!   malformed payload, unknown effect). The enclosing transaction is aborted.

use crate::state::{Coordinate, EventId, Phase, PlayerId, TechId};

/// Severity class of an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    Validation,
    Permission,
    Conflict,
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Permission => "permission",
            Self::Conflict => "conflict",
            Self::Fatal => "fatal",
        }
    }

    /// Whether the message may be shown to the invoking player verbatim.
    pub const fn is_player_facing(&self) -> bool {
        matches!(self, Self::Validation)
    }

    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal)
    }
}

/// Common trait for all game errors.
///
/// # Implementation Guidelines
///
/// - All error enums implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify by how the caller must react, not by how bad it feels
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Stable identifier for logs and tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// A request the rules refuse. Always player-facing.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum RuleError {
    #[error("this cannot be done while the game is in the {actual} phase")]
    WrongPhase { actual: Phase },

    #[error("it is not your turn")]
    NotYourTurn,

    #[error("you are not playing in this game")]
    NotAPlayer,

    #[error("you already joined this game")]
    AlreadyJoined,

    #[error("the game is full ({max} players)")]
    GameFull { max: usize },

    #[error("at least {min} players are needed to start")]
    NotEnoughPlayers { min: usize },

    #[error("you already took an action this turn")]
    ActionAlreadyTaken,

    #[error("another decision must be resolved first")]
    DecisionPending,

    #[error("there is no planet at {0}")]
    UnknownPlanet(Coordinate),

    #[error("you do not control the planet at {0}")]
    NotControlled(Coordinate),

    #[error("the planet at {0} is exhausted")]
    PlanetExhausted(Coordinate),

    #[error("no planet you control can reach {0}")]
    NoValidSources(Coordinate),

    #[error("{from} is not a valid source for a move to {destination}")]
    InvalidSource {
        from: Coordinate,
        destination: Coordinate,
    },

    #[error("only {available} forces are present at {from}, cannot move {requested}")]
    InsufficientForces {
        from: Coordinate,
        requested: u32,
        available: u32,
    },

    #[error("you have no move in progress")]
    NoPlannedMove,

    #[error("unknown technology {0}")]
    UnknownTechnology(TechId),

    #[error("{0} is not for sale")]
    TechNotOffered(TechId),

    #[error("you already own {0}")]
    TechAlreadyOwned(TechId),

    #[error("{tech} costs {cost} science, you have {available}")]
    NotEnoughScience {
        tech: TechId,
        cost: u32,
        available: u32,
    },

    #[error("that choice is no longer available")]
    StaleInteraction,

    #[error("that choice was already made")]
    InteractionConsumed,

    #[error("nothing is waiting for {0}")]
    NotAwaiting(EventId),
}

impl GameError for RuleError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        self.into()
    }
}

/// Broken aggregate invariant. Never shown to players in detail.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum InvariantViolation {
    #[error("planet {0} referenced but missing from the board")]
    MissingPlanet(Coordinate),

    #[error("player {0} referenced but missing from the game")]
    MissingPlayer(PlayerId),

    #[error("effect {0:?} is not registered")]
    MissingEffect(String),

    #[error("turn index {index} out of range for {players} players")]
    TurnIndexOutOfRange { index: usize, players: usize },

    #[error("game has no players outside setup")]
    NoPlayers,

    #[error("planet {coordinate} holds {forces} forces over capacity {capacity}")]
    CapacityExceeded {
        coordinate: Coordinate,
        forces: u32,
        capacity: u32,
    },

    #[error("interaction payload does not match the pending decision: {0}")]
    MalformedInteraction(String),

    #[error("event {0} resolved in an impossible stage")]
    ImpossibleStage(EventId),

    #[error("effect {effect} failed: {reason}")]
    EffectFailed { effect: String, reason: String },
}

impl GameError for InvariantViolation {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        self.into()
    }
}

/// Any failure of a rule operation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ExecuteError {
    #[error(transparent)]
    Rule(#[from] RuleError),

    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
}

impl GameError for ExecuteError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Rule(e) => e.severity(),
            Self::Invariant(e) => e.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Rule(e) => e.error_code(),
            Self::Invariant(e) => e.error_code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_follows_the_wrapped_error() {
        let rule: ExecuteError = RuleError::NotYourTurn.into();
        assert_eq!(rule.severity(), ErrorSeverity::Validation);
        assert!(rule.severity().is_player_facing());
        assert_eq!(rule.error_code(), "not_your_turn");

        let broken: ExecuteError = InvariantViolation::MissingPlayer(PlayerId(7)).into();
        assert_eq!(broken.severity(), ErrorSeverity::Fatal);
        assert_eq!(broken.error_code(), "missing_player");
    }
}
