//! Producing forces and science on a controlled planet.

use crate::engine::{Resolution, TriggerEngine};
use crate::env::GameEnv;
use crate::error::{ExecuteError, InvariantViolation, RuleError};
use crate::event::BeginProduce;
use crate::interaction::InteractionSink;
use crate::log::ActionLog;
use crate::state::{Coordinate, Game, PlayerId};
use crate::turns::ensure_can_act;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProductionOutcome {
    pub forces_added: u32,
    pub capacity_loss: u32,
    pub science_gained: u32,
}

/// Starts production at `planet` by raising BeginProduce.
pub fn begin_produce(
    game: &mut Game,
    player: PlayerId,
    planet: Coordinate,
    env: GameEnv<'_>,
    sink: &mut dyn InteractionSink,
    log: &mut ActionLog,
) -> Result<Resolution, ExecuteError> {
    ensure_can_act(game, player)?;
    let target = game
        .board
        .planet(planet)
        .ok_or(RuleError::UnknownPlanet(planet))?;
    if !target.is_controlled_by(player) {
        return Err(RuleError::NotControlled(planet).into());
    }
    if target.exhausted {
        return Err(RuleError::PlanetExhausted(planet).into());
    }

    let event = BeginProduce {
        player,
        planet,
        bonus: 0,
    };
    TriggerEngine::new(game, env, sink, log).raise(event.into())
}

/// Adds the planet's yield plus `bonus`, caps at capacity and exhausts it.
pub fn apply_production(
    game: &mut Game,
    player: PlayerId,
    planet: Coordinate,
    bonus: u32,
) -> Result<ProductionOutcome, ExecuteError> {
    let target = game
        .board
        .planet_mut(planet)
        .ok_or(InvariantViolation::MissingPlanet(planet))?;
    if !target.is_controlled_by(player) {
        return Err(RuleError::NotControlled(planet).into());
    }

    let produced = target.production + bonus;
    let total = target.forces + produced;
    let capacity_loss = total.saturating_sub(target.capacity);
    target.forces = total - capacity_loss;
    target.exhausted = true;
    let science_gained = target.science;

    game.player_mut(player)
        .ok_or(InvariantViolation::MissingPlayer(player))?
        .science += science_gained;

    Ok(ProductionOutcome {
        forces_added: produced - capacity_loss.min(produced),
        capacity_loss,
        science_gained,
    })
}
