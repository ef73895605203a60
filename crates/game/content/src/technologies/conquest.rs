use game_core::{
    EventKind, Game, GameEvent, InvariantViolation, LossCause, PlayerId, TriggerContext,
    TriggerEffect, TriggerMode,
};

use super::ids;

/// Exhaust after losing forces in combat: one science per two forces lost,
/// rounded up.
#[derive(Debug, Clone, Copy)]
pub struct SalvageOperations;

impl TriggerEffect for SalvageOperations {
    fn name(&self) -> &'static str {
        "salvage-operations"
    }

    fn tech(&self) -> &'static str {
        ids::SALVAGE_OPERATIONS
    }

    fn event(&self) -> EventKind {
        EventKind::PostForcesDestroyed
    }

    fn mode(&self) -> TriggerMode {
        TriggerMode::Optional
    }

    fn label(&self) -> &'static str {
        "Salvage Operations"
    }

    fn exhausts_tech(&self) -> bool {
        true
    }

    fn applies_to(&self, event: &GameEvent, _game: &Game, player: PlayerId) -> bool {
        matches!(
            event,
            GameEvent::PostForcesDestroyed(e)
                if e.owner == player && e.cause == LossCause::Combat && e.amount > 0
        )
    }

    fn apply(&self, ctx: &mut TriggerContext<'_>) -> Result<(), InvariantViolation> {
        let GameEvent::PostForcesDestroyed(e) = &*ctx.event else {
            return Err(ctx.unexpected_event(self.name()));
        };
        let salvage = e.amount.div_ceil(2);
        ctx.player_mut()?.science += salvage;
        let name = ctx.player_name();
        ctx.say(format!("{name} salvaged {salvage} science."));
        Ok(())
    }
}

/// Exhaust when capturing a planet to gain a victory point.
#[derive(Debug, Clone, Copy)]
pub struct Expansionism;

impl TriggerEffect for Expansionism {
    fn name(&self) -> &'static str {
        "expansionism"
    }

    fn tech(&self) -> &'static str {
        ids::EXPANSIONISM
    }

    fn event(&self) -> EventKind {
        EventKind::CapturePlanet
    }

    fn mode(&self) -> TriggerMode {
        TriggerMode::Optional
    }

    fn label(&self) -> &'static str {
        "Expansionism (+1 VP)"
    }

    fn exhausts_tech(&self) -> bool {
        true
    }

    fn applies_to(&self, event: &GameEvent, _game: &Game, player: PlayerId) -> bool {
        matches!(event, GameEvent::CapturePlanet(e) if e.player == player)
    }

    fn apply(&self, ctx: &mut TriggerContext<'_>) -> Result<(), InvariantViolation> {
        ctx.player_mut()?.victory_points += 1;
        Ok(())
    }
}

/// When the owner loses a technology, gain two science.
#[derive(Debug, Clone, Copy)]
pub struct ScorchedEarth;

impl TriggerEffect for ScorchedEarth {
    fn name(&self) -> &'static str {
        "scorched-earth"
    }

    fn tech(&self) -> &'static str {
        ids::SCORCHED_EARTH
    }

    fn event(&self) -> EventKind {
        EventKind::PlayerLoseTech
    }

    fn mode(&self) -> TriggerMode {
        TriggerMode::Optional
    }

    fn label(&self) -> &'static str {
        "Scorched Earth (+2 science)"
    }

    fn applies_to(&self, event: &GameEvent, _game: &Game, player: PlayerId) -> bool {
        matches!(event, GameEvent::PlayerLoseTech(e) if e.player == player)
    }

    fn apply(&self, ctx: &mut TriggerContext<'_>) -> Result<(), InvariantViolation> {
        ctx.player_mut()?.science += 2;
        Ok(())
    }
}
