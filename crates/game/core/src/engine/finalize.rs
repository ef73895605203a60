//! Side effects of each event once all of its triggers resolved.

use crate::env::GameEnv;
use crate::error::{ExecuteError, InvariantViolation};
use crate::event::{
    ActionComplete, CapturePlanet, GameEvent, LossCause, PendingEvent, PlayerGainTech,
    PostForcesDestroyed, PostProduce, PurchaseChoice,
};
use crate::interaction::InteractionPayload;
use crate::log::ActionLog;
use crate::movement::resolve_move;
use crate::production::apply_production;
use crate::state::{Game, PlannedMove, PlayerId};
use crate::technology;

pub(super) use technology::check_purchase;

pub(super) enum Finalized {
    /// Resolved; these follow-ons resolve next, in order.
    Done(Vec<GameEvent>),
    /// The event needs one more choice from `player`.
    Decide {
        player: PlayerId,
        text: String,
        options: Vec<(String, InteractionPayload)>,
    },
}

pub(super) fn finalize(
    game: &mut Game,
    env: GameEnv<'_>,
    pending: &mut PendingEvent,
    log: &mut ActionLog,
) -> Result<Finalized, ExecuteError> {
    let event_id = pending.id;
    let follow_ups = match &mut pending.event {
        GameEvent::TurnBegin(e) => {
            log.push(format!(
                "Round {}: {} to act.",
                game.turn.number,
                game.player_name(e.player)
            ));
            Vec::new()
        }
        GameEvent::ActionComplete(_) => {
            game.turn.action_taken = true;
            Vec::new()
        }
        GameEvent::BeginProduce(e) => {
            let outcome = apply_production(game, e.player, e.planet, e.bonus)?;
            log.push(format!(
                "{} produced {} forces and {} science at {}.",
                game.player_name(e.player),
                outcome.forces_added,
                outcome.science_gained,
                e.planet
            ));
            let mut next = Vec::with_capacity(3);
            if outcome.capacity_loss > 0 {
                log.push(format!(
                    "{} forces over capacity were lost at {}.",
                    outcome.capacity_loss, e.planet
                ));
                next.push(
                    PostForcesDestroyed {
                        owner: e.player,
                        planet: e.planet,
                        amount: outcome.capacity_loss,
                        cause: LossCause::Capacity,
                    }
                    .into(),
                );
            }
            next.push(
                PostProduce {
                    player: e.player,
                    planet: e.planet,
                    forces_added: outcome.forces_added,
                    science_gained: outcome.science_gained,
                }
                .into(),
            );
            next.push(ActionComplete { player: e.player }.into());
            next
        }
        GameEvent::PreMove(e) => {
            let plan = PlannedMove {
                destination: e.destination,
                sources: e.sources.clone(),
            };
            let outcome = resolve_move(game, e.player, &plan, e.modifiers)?;
            log.extend(outcome.log.iter().cloned());
            if outcome.is_declined() {
                return Ok(Finalized::Done(Vec::new()));
            }

            let mut next: Vec<GameEvent> = Vec::with_capacity(5);
            if outcome.attacker_losses > 0 {
                next.push(
                    PostForcesDestroyed {
                        owner: e.player,
                        planet: e.destination,
                        amount: outcome.attacker_losses,
                        cause: LossCause::Combat,
                    }
                    .into(),
                );
            }
            if let Some(defender) = outcome.defender
                && outcome.defender_losses > 0
            {
                next.push(
                    PostForcesDestroyed {
                        owner: defender,
                        planet: e.destination,
                        amount: outcome.defender_losses,
                        cause: LossCause::Combat,
                    }
                    .into(),
                );
            }
            if outcome.capacity_loss > 0 {
                next.push(
                    PostForcesDestroyed {
                        owner: e.player,
                        planet: e.destination,
                        amount: outcome.capacity_loss,
                        cause: LossCause::Capacity,
                    }
                    .into(),
                );
            }
            if outcome.captured() {
                next.push(
                    CapturePlanet {
                        player: e.player,
                        planet: e.destination,
                        previous_owner: outcome.previous_controller,
                    }
                    .into(),
                );
            }
            next.push(ActionComplete { player: e.player }.into());
            next
        }
        GameEvent::PostProduce(_)
        | GameEvent::PostForcesDestroyed(_)
        | GameEvent::CapturePlanet(_) => Vec::new(),
        GameEvent::PlayerGainTech(e) => {
            let player = game
                .player_mut(e.player)
                .ok_or(InvariantViolation::MissingPlayer(e.player))?;
            if player.gain_tech(e.tech.clone()) {
                log.push(format!("{} acquired {}.", player.name, env.tech_name(&e.tech)));
            }
            Vec::new()
        }
        GameEvent::PlayerLoseTech(e) => {
            let player = game
                .player_mut(e.player)
                .ok_or(InvariantViolation::MissingPlayer(e.player))?;
            if player.lose_tech(&e.tech) {
                log.push(format!("{} lost {}.", player.name, env.tech_name(&e.tech)));
                game.market.discard(e.tech.clone());
            }
            Vec::new()
        }
        GameEvent::TechPurchaseDecision(e) => match e.choice.clone() {
            None => {
                let options = technology::purchase_options(game, env, e.player, e.discount, event_id);
                if options.is_empty() {
                    log.push(format!(
                        "{} cannot afford any technology on offer.",
                        game.player_name(e.player)
                    ));
                    return Ok(Finalized::Done(Vec::new()));
                }
                return Ok(Finalized::Decide {
                    player: e.player,
                    text: format!(
                        "{}: choose a technology ({} science available).",
                        game.player_name(e.player),
                        game.player(e.player).map(|p| p.science).unwrap_or(0)
                    ),
                    options,
                });
            }
            Some(PurchaseChoice::Skip) => {
                log.push(format!(
                    "{} bought nothing.",
                    game.player_name(e.player)
                ));
                Vec::new()
            }
            Some(PurchaseChoice::Buy(tech)) => {
                let paid = technology::pay_for(game, env, e.player, &tech, e.discount)?;
                log.push(format!(
                    "{} paid {} science for {}.",
                    game.player_name(e.player),
                    paid,
                    env.tech_name(&tech)
                ));
                vec![
                    PlayerGainTech {
                        player: e.player,
                        tech,
                    }
                    .into(),
                    ActionComplete { player: e.player }.into(),
                ]
            }
        },
    };
    Ok(Finalized::Done(follow_ups))
}
