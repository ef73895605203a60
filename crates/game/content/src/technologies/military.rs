use game_core::{
    EventKind, Game, GameEvent, InvariantViolation, PlayerId, TriggerContext, TriggerEffect,
    TriggerMode,
};

use super::ids;

/// Defenders count two extra forces. Always on.
#[derive(Debug, Clone, Copy)]
pub struct FortifiedWorlds;

impl TriggerEffect for FortifiedWorlds {
    fn name(&self) -> &'static str {
        "fortified-worlds"
    }

    fn tech(&self) -> &'static str {
        ids::FORTIFIED_WORLDS
    }

    fn event(&self) -> EventKind {
        EventKind::PreMove
    }

    fn mode(&self) -> TriggerMode {
        TriggerMode::Mandatory
    }

    fn label(&self) -> &'static str {
        "Fortified Worlds (+2 defense)"
    }

    fn applies_to(&self, event: &GameEvent, _game: &Game, player: PlayerId) -> bool {
        matches!(event, GameEvent::PreMove(e) if e.is_attack() && e.defender == Some(player))
    }

    fn apply(&self, ctx: &mut TriggerContext<'_>) -> Result<(), InvariantViolation> {
        let GameEvent::PreMove(e) = &mut *ctx.event else {
            return Err(ctx.unexpected_event(self.name()));
        };
        e.modifiers.defender_bonus += 2;
        Ok(())
    }
}

/// Exhaust to make an attack count two extra forces.
#[derive(Debug, Clone, Copy)]
pub struct AssaultDoctrine;

impl TriggerEffect for AssaultDoctrine {
    fn name(&self) -> &'static str {
        "assault-doctrine"
    }

    fn tech(&self) -> &'static str {
        ids::ASSAULT_DOCTRINE
    }

    fn event(&self) -> EventKind {
        EventKind::PreMove
    }

    fn mode(&self) -> TriggerMode {
        TriggerMode::Optional
    }

    fn label(&self) -> &'static str {
        "Assault Doctrine (+2 attack)"
    }

    fn exhausts_tech(&self) -> bool {
        true
    }

    fn applies_to(&self, event: &GameEvent, _game: &Game, player: PlayerId) -> bool {
        matches!(event, GameEvent::PreMove(e) if e.is_attack() && e.player == player)
    }

    fn apply(&self, ctx: &mut TriggerContext<'_>) -> Result<(), InvariantViolation> {
        let GameEvent::PreMove(e) = &mut *ctx.event else {
            return Err(ctx.unexpected_event(self.name()));
        };
        e.modifiers.attacker_bonus += 2;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use game_core::movement::commit_move;
    use game_core::{
        ActionLog, EffectRegistry, GameEnv, PlannedMove, RecordingSink, TechId, TriggerEngine,
    };

    use super::*;
    use crate::TechCatalogue;
    use crate::technologies::fixtures::{A, B, X, Y, duel, grant};

    fn plan_attack(game: &mut Game, amount: u32) {
        let mut plan = PlannedMove::new(Y);
        plan.set_amount(X, amount);
        game.player_mut(A).unwrap().planned_move = Some(plan);
    }

    #[test]
    fn fortified_defender_holds_against_equal_numbers() {
        let mut game = duel(4, 4);
        grant(&mut game, B, ids::FORTIFIED_WORLDS);
        plan_attack(&mut game, 4);
        let registry = EffectRegistry::new(vec![Arc::new(FortifiedWorlds)]);
        let catalogue = TechCatalogue::standard();
        let mut sink = RecordingSink::new();
        let mut log = ActionLog::new();

        let resolution = commit_move(
            &mut game,
            A,
            GameEnv::new(&catalogue, &registry),
            &mut sink,
            &mut log,
        )
        .unwrap();

        // attacker loses min(4, 4 + 2) = 4, defender loses min(4, 4) = 4
        assert!(resolution.is_resolved());
        assert!(sink.issued.is_empty(), "mandatory effects never prompt");
        assert_eq!(game.board.planet(Y).unwrap().controller(), None);
    }

    #[test]
    fn assault_doctrine_is_offered_to_the_attacker_and_exhausts() {
        let mut game = duel(3, 4);
        grant(&mut game, A, ids::ASSAULT_DOCTRINE);
        plan_attack(&mut game, 3);
        let registry = EffectRegistry::new(vec![Arc::new(AssaultDoctrine)]);
        let catalogue = TechCatalogue::standard();
        let env = GameEnv::new(&catalogue, &registry);
        let mut sink = RecordingSink::new();
        let mut log = ActionLog::new();

        let resolution = commit_move(&mut game, A, env, &mut sink, &mut log).unwrap();
        let option = resolution
            .prompt()
            .and_then(|p| p.option("Assault Doctrine (+2 attack)"))
            .cloned()
            .unwrap();
        let payload = sink.payload(&option).cloned().unwrap();

        let resolution = TriggerEngine::new(&mut game, env, &mut sink, &mut log)
            .resume(&payload, A)
            .unwrap();

        // attacker loses 3, defender loses min(4, 3 + 2) = 4
        assert!(resolution.is_resolved());
        assert_eq!(game.board.planet(Y).unwrap().controller(), None);
        let tech = game.player(A).unwrap().tech(&TechId::new(ids::ASSAULT_DOCTRINE)).unwrap();
        assert!(tech.exhausted);
    }
}
