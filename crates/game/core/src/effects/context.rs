use crate::error::InvariantViolation;
use crate::event::GameEvent;
use crate::log::ActionLog;
use crate::state::{Game, Player, PlayerId, TechId};

/// Mutable view handed to an effect while it applies.
pub struct TriggerContext<'a> {
    pub game: &'a mut Game,
    pub event: &'a mut GameEvent,
    /// Owner of the technology the effect belongs to.
    pub player: PlayerId,
    pub tech: &'a TechId,
    pub log: &'a mut ActionLog,
}

impl TriggerContext<'_> {
    pub fn player_mut(&mut self) -> Result<&mut Player, InvariantViolation> {
        let id = self.player;
        self.game
            .player_mut(id)
            .ok_or(InvariantViolation::MissingPlayer(id))
    }

    pub fn player_name(&self) -> String {
        self.game.player_name(self.player)
    }

    pub fn say(&mut self, line: impl Into<String>) {
        self.log.push(line);
    }

    /// Error for an effect that was handed an event it does not handle.
    pub fn unexpected_event(&self, effect: &str) -> InvariantViolation {
        InvariantViolation::EffectFailed {
            effect: effect.to_string(),
            reason: format!("unexpected event {}", self.event.kind()),
        }
    }
}
