//! Fixtures shared by unit tests.

use std::sync::Arc;

use crate::effects::{EffectRegistry, TriggerContext, TriggerEffect};
use crate::env::{TechDefinition, TechOracle};
use crate::error::InvariantViolation;
use crate::event::{EventKind, GameEvent, TriggerMode};
use crate::state::{Board, ChannelId, Game, GameId, Planet, PlayerId, TechId};
use crate::GameConfig;

pub struct Techs(pub Vec<TechDefinition>);

impl Techs {
    pub fn with(ids: &[(&str, u32)]) -> Self {
        Self(
            ids.iter()
                .map(|(id, cost)| TechDefinition {
                    id: TechId::new(*id),
                    name: id.to_string(),
                    cost: *cost,
                    description: String::new(),
                })
                .collect(),
        )
    }
}

impl TechOracle for Techs {
    fn definition(&self, id: &TechId) -> Option<&TechDefinition> {
        self.0.iter().find(|t| &t.id == id)
    }

    fn all(&self) -> Vec<&TechDefinition> {
        self.0.iter().collect()
    }
}

/// Adds `amount` to the defender bonus of any attack on the owner.
pub struct Shield {
    pub name: &'static str,
    pub tech: &'static str,
    pub mode: TriggerMode,
    pub amount: u32,
}

impl TriggerEffect for Shield {
    fn name(&self) -> &'static str {
        self.name
    }
    fn tech(&self) -> &'static str {
        self.tech
    }
    fn event(&self) -> EventKind {
        EventKind::PreMove
    }
    fn mode(&self) -> TriggerMode {
        self.mode
    }
    fn exhausts_tech(&self) -> bool {
        self.mode == TriggerMode::Optional
    }
    fn applies_to(&self, event: &GameEvent, _: &Game, player: PlayerId) -> bool {
        matches!(event, GameEvent::PreMove(e) if e.defender == Some(player))
    }
    fn apply(&self, ctx: &mut TriggerContext<'_>) -> Result<(), InvariantViolation> {
        let GameEvent::PreMove(e) = ctx.event else {
            return Err(ctx.unexpected_event(self.name));
        };
        e.modifiers.defender_bonus += self.amount;
        Ok(())
    }
}

pub fn registry(effects: Vec<Arc<dyn TriggerEffect>>) -> EffectRegistry {
    EffectRegistry::new(effects)
}

/// Two players in play on the given planets.
pub fn game_on(planets: Vec<Planet>) -> Game {
    let mut game = Game::new(GameId::new("g-1"), ChannelId::new("c-1"), GameConfig::default());
    game.add_player("ext-a", "Ada").expect("join");
    game.add_player("ext-b", "Bo").expect("join");
    game.start(Board::from_planets(planets), Vec::new())
        .expect("start");
    game
}
