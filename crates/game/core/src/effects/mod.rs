//! Technology effect contract.
//!
//! Each technology contributes one or more [`TriggerEffect`]s. An effect is
//! attached to exactly one [`EventKind`]; any number of effects may observe
//! the same kind. The [`EffectRegistry`] finds the candidates for a raised
//! event and the engine applies or offers them.
//!
//! # Execution Order
//!
//! Players are visited in turn order starting at the event's owner. Within a
//! player, effects run by priority (lower values first):
//! - Negative priorities: effects that must see the raw event (discounts)
//! - Zero: default
//! - Positive priorities: effects that react to what others changed
mod context;
mod registry;

pub use context::TriggerContext;
pub use registry::EffectRegistry;

use crate::error::InvariantViolation;
use crate::event::{EventKind, GameEvent, TriggerMode};
use crate::state::{Game, PlayerId};

/// Handler contributed by a technology.
pub trait TriggerEffect: Send + Sync {
    /// Unique registry name (used inside persisted interactions).
    fn name(&self) -> &'static str;

    /// Technology that must be owned, and ready, for this effect to trigger.
    fn tech(&self) -> &'static str;

    fn event(&self) -> EventKind;

    fn mode(&self) -> TriggerMode;

    /// Button label when offered.
    fn label(&self) -> &'static str {
        self.name()
    }

    fn priority(&self) -> i32 {
        0
    }

    /// Whether using the effect exhausts its technology until refreshed.
    fn exhausts_tech(&self) -> bool {
        false
    }

    /// Per-player applicability beyond tech ownership.
    fn applies_to(&self, event: &GameEvent, game: &Game, player: PlayerId) -> bool;

    /// Applies the effect. May mutate the event payload and the game.
    fn apply(&self, ctx: &mut TriggerContext<'_>) -> Result<(), InvariantViolation>;
}
