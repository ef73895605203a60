//! Deterministic rules of the chat strategy game.
//!
//! `game-core` defines the canonical state ([`Game`]), the event and trigger
//! engine, the movement/combat resolver and the interaction records that
//! carry suspended decisions. It performs no I/O: the runtime loads a game,
//! calls into these APIs inside a transaction and persists the result.
pub mod config;
pub mod effects;
pub mod engine;
pub mod env;
pub mod error;
pub mod event;
pub mod interaction;
pub mod log;
pub mod movement;
pub mod production;
pub mod state;
pub mod technology;
pub mod turns;

#[cfg(test)]
pub(crate) mod testing;

pub use config::GameConfig;
pub use effects::{EffectRegistry, TriggerContext, TriggerEffect};
pub use engine::{Resolution, TriggerEngine};
pub use env::{GameEnv, TechDefinition, TechOracle};
pub use error::{ErrorSeverity, ExecuteError, GameError, InvariantViolation, RuleError};
pub use event::{
    ActionComplete, BeginProduce, CapturePlanet, EventKind, GameEvent, LossCause, PendingEvent,
    PlayerGainTech, PlayerLoseTech, PostForcesDestroyed, PostProduce, PreMove, PurchaseChoice,
    ResolutionStage, TechPurchaseDecision, TriggerMode, TriggeredEffect, TurnBegin,
};
pub use interaction::{
    Consumption, InteractionData, InteractionError, InteractionId, InteractionKind,
    InteractionPayload, InteractionSink, Prompt, PromptOption, RecordingSink,
};
pub use log::ActionLog;
pub use movement::{CombatModifiers, MoveOutcome, MoveStep};
pub use state::{
    Board, ChannelId, Coordinate, EventId, Game, GameId, MoveSource, OwnedTech, Phase, Planet,
    PlannedMove, Player, PlayerId, TechId, TechMarket, TurnState,
};
