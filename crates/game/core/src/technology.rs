//! Buying and scrapping technologies.

use crate::engine::{Resolution, TriggerEngine};
use crate::env::GameEnv;
use crate::error::{ExecuteError, InvariantViolation, RuleError};
use crate::event::{PlayerLoseTech, TechPurchaseDecision};
use crate::interaction::{InteractionPayload, InteractionSink};
use crate::log::ActionLog;
use crate::state::{EventId, Game, PlayerId, Phase, TechId};
use crate::turns::ensure_can_act;

/// Starts a purchase. Effects see the decision first (and may discount it);
/// the buyer then picks from the market.
pub fn buy_tech(
    game: &mut Game,
    player: PlayerId,
    env: GameEnv<'_>,
    sink: &mut dyn InteractionSink,
    log: &mut ActionLog,
) -> Result<Resolution, ExecuteError> {
    ensure_can_act(game, player)?;
    let event = TechPurchaseDecision {
        player,
        discount: 0,
        choice: None,
    };
    TriggerEngine::new(game, env, sink, log).raise(event.into())
}

/// Discards an owned technology back to the deck. Does not use the turn's
/// action.
pub fn scrap_tech(
    game: &mut Game,
    player: PlayerId,
    tech: TechId,
    env: GameEnv<'_>,
    sink: &mut dyn InteractionSink,
    log: &mut ActionLog,
) -> Result<Resolution, ExecuteError> {
    if game.phase() != Phase::Play {
        return Err(RuleError::WrongPhase {
            actual: game.phase(),
        }
        .into());
    }
    if game.current_player() != Some(player) {
        return Err(RuleError::NotYourTurn.into());
    }
    if !game
        .player(player)
        .ok_or(RuleError::NotAPlayer)?
        .has_tech(&tech)
    {
        return Err(RuleError::UnknownTechnology(tech).into());
    }
    TriggerEngine::new(game, env, sink, log).raise(PlayerLoseTech { player, tech }.into())
}

/// Price of `tech` for `player` after `discount`, if they may buy it now.
pub fn check_purchase(
    game: &Game,
    env: GameEnv<'_>,
    player: PlayerId,
    tech: &TechId,
    discount: u32,
) -> Result<u32, RuleError> {
    let definition = env.tech(tech)?;
    if !game.market.is_offered(tech) {
        return Err(RuleError::TechNotOffered(tech.clone()));
    }
    let buyer = game.player(player).ok_or(RuleError::NotAPlayer)?;
    if buyer.has_tech(tech) {
        return Err(RuleError::TechAlreadyOwned(tech.clone()));
    }
    let cost = definition.cost.saturating_sub(discount);
    if buyer.science < cost {
        return Err(RuleError::NotEnoughScience {
            tech: tech.clone(),
            cost,
            available: buyer.science,
        });
    }
    Ok(cost)
}

/// One option per affordable offered technology plus "skip". Empty when
/// nothing is affordable.
pub fn purchase_options(
    game: &Game,
    env: GameEnv<'_>,
    player: PlayerId,
    discount: u32,
    event: EventId,
) -> Vec<(String, InteractionPayload)> {
    let mut options: Vec<(String, InteractionPayload)> = game
        .market
        .offered
        .iter()
        .filter_map(|tech| {
            let cost = check_purchase(game, env, player, tech, discount).ok()?;
            Some((
                format!("{} ({cost})", env.tech_name(tech)),
                InteractionPayload::ChooseTech {
                    event,
                    tech: tech.clone(),
                },
            ))
        })
        .collect();
    if !options.is_empty() {
        options.push((
            "Skip".to_string(),
            InteractionPayload::SkipTechPurchase { event },
        ));
    }
    options
}

/// Charges the buyer and takes the technology off the market.
pub fn pay_for(
    game: &mut Game,
    env: GameEnv<'_>,
    player: PlayerId,
    tech: &TechId,
    discount: u32,
) -> Result<u32, ExecuteError> {
    let cost = check_purchase(game, env, player, tech, discount)?;
    game.player_mut(player)
        .ok_or(InvariantViolation::MissingPlayer(player))?
        .science -= cost;
    game.market.take(tech);
    Ok(cost)
}
