//! Building a [`PlannedMove`] one decision at a time.
//!
//! `begin_move` → (source choice) → amount choice → source menu → commit or
//! cancel. With a single valid source the source choice is skipped, and
//! sending that source's whole stack commits straight away.

use super::CombatModifiers;
use crate::engine::{Resolution, TriggerEngine};
use crate::env::GameEnv;
use crate::error::{ExecuteError, InvariantViolation, RuleError};
use crate::event::PreMove;
use crate::interaction::{InteractionPayload, InteractionSink, Prompt};
use crate::log::ActionLog;
use crate::state::{Coordinate, Game, PlannedMove, PlayerId};
use crate::turns::ensure_can_act;

/// What the planning flow needs next.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MoveStep {
    /// Pick a source to edit, commit, or cancel.
    ChooseSource {
        destination: Coordinate,
        sources: Vec<Coordinate>,
    },
    ChooseAmount {
        destination: Coordinate,
        source: Coordinate,
        max: u32,
    },
    /// The plan is complete and should be committed without asking.
    Ready,
}

/// Planets `player` may move from into `destination`: controlled, ready,
/// adjacent and holding forces.
pub fn valid_sources(game: &Game, player: PlayerId, destination: Coordinate) -> Vec<Coordinate> {
    game.board
        .neighbors(destination)
        .filter(|p| p.is_controlled_by(player) && !p.exhausted)
        .map(|p| p.coordinate)
        .collect()
}

pub fn begin_move(
    game: &mut Game,
    player: PlayerId,
    destination: Coordinate,
) -> Result<MoveStep, RuleError> {
    ensure_can_act(game, player)?;
    if game.board.planet(destination).is_none() {
        return Err(RuleError::UnknownPlanet(destination));
    }
    let sources = valid_sources(game, player, destination);
    if sources.is_empty() {
        return Err(RuleError::NoValidSources(destination));
    }

    let step = step_for_new_plan(game, destination, &sources);
    game.player_mut(player)
        .ok_or(RuleError::NotAPlayer)?
        .planned_move = Some(PlannedMove::new(destination));
    Ok(step)
}

fn step_for_new_plan(game: &Game, destination: Coordinate, sources: &[Coordinate]) -> MoveStep {
    match sources {
        [only] => MoveStep::ChooseAmount {
            destination,
            source: *only,
            max: game.board.planet(*only).map(|p| p.forces).unwrap_or(0),
        },
        _ => MoveStep::ChooseSource {
            destination,
            sources: sources.to_vec(),
        },
    }
}

fn planned(game: &Game, player: PlayerId) -> Result<&PlannedMove, RuleError> {
    game.player(player)
        .ok_or(RuleError::NotAPlayer)?
        .planned_move
        .as_ref()
        .ok_or(RuleError::NoPlannedMove)
}

fn checked_source(
    game: &Game,
    player: PlayerId,
    source: Coordinate,
) -> Result<(PlannedMove, u32), RuleError> {
    ensure_can_act(game, player)?;
    let plan = planned(game, player)?.clone();
    if !valid_sources(game, player, plan.destination).contains(&source) {
        return Err(RuleError::InvalidSource {
            from: source,
            destination: plan.destination,
        });
    }
    let available = game.board.planet(source).map(|p| p.forces).unwrap_or(0);
    Ok((plan, available))
}

/// Picks a source from the source menu.
pub fn choose_source(game: &Game, player: PlayerId, source: Coordinate) -> Result<MoveStep, RuleError> {
    let (plan, available) = checked_source(game, player, source)?;
    Ok(MoveStep::ChooseAmount {
        destination: plan.destination,
        source,
        max: available,
    })
}

/// Sets how many forces leave `source`. Zero removes the source.
pub fn set_source_amount(
    game: &mut Game,
    player: PlayerId,
    source: Coordinate,
    amount: u32,
) -> Result<MoveStep, RuleError> {
    let (mut plan, available) = checked_source(game, player, source)?;
    if amount > available {
        return Err(RuleError::InsufficientForces {
            from: source,
            requested: amount,
            available,
        });
    }
    plan.set_amount(source, amount);

    let sources = valid_sources(game, player, plan.destination);
    let step = if sources.len() == 1 && amount > 0 && amount == available {
        MoveStep::Ready
    } else {
        MoveStep::ChooseSource {
            destination: plan.destination,
            sources,
        }
    };
    game.player_mut(player)
        .ok_or(RuleError::NotAPlayer)?
        .planned_move = Some(plan);
    Ok(step)
}

pub fn cancel_move(game: &mut Game, player: PlayerId) -> Result<(), RuleError> {
    planned(game, player)?;
    if let Some(p) = game.player_mut(player) {
        p.planned_move = None;
    }
    Ok(())
}

/// Commits the plan by raising PreMove. An empty plan is a declined no-op.
pub fn commit_move(
    game: &mut Game,
    player: PlayerId,
    env: GameEnv<'_>,
    sink: &mut dyn InteractionSink,
    log: &mut ActionLog,
) -> Result<Resolution, ExecuteError> {
    ensure_can_act(game, player)?;
    let plan = planned(game, player)?.clone();
    if plan.total() == 0 {
        cancel_move(game, player)?;
        log.push(format!("{} declined to move.", game.player_name(player)));
        return Ok(Resolution::Resolved);
    }

    let defender = game
        .board
        .planet(plan.destination)
        .ok_or(InvariantViolation::MissingPlanet(plan.destination))?
        .controller()
        .filter(|owner| *owner != player);
    let event = PreMove {
        player,
        destination: plan.destination,
        sources: plan.sources,
        defender,
        modifiers: CombatModifiers::default(),
    };
    TriggerEngine::new(game, env, sink, log).raise(event.into())
}

/// Renders a planning step as a prompt for `player`.
pub fn prompt(
    game: &Game,
    player: PlayerId,
    step: &MoveStep,
    sink: &mut dyn InteractionSink,
) -> Option<Prompt> {
    match step {
        MoveStep::Ready => None,
        MoveStep::ChooseAmount {
            destination,
            source,
            max,
        } => {
            let options = (0..=*max)
                .map(|amount| {
                    (
                        amount.to_string(),
                        InteractionPayload::EnterMoveAmount {
                            source: *source,
                            amount,
                        },
                    )
                })
                .collect();
            Some(Prompt::issue(
                sink,
                format!("How many forces move from {source} to {destination}?"),
                vec![player],
                options,
            ))
        }
        MoveStep::ChooseSource {
            destination,
            sources,
        } => {
            let plan = game.player(player).and_then(|p| p.planned_move.as_ref());
            let mut options: Vec<(String, InteractionPayload)> = sources
                .iter()
                .map(|source| {
                    let chosen = plan.map(|p| p.amount_from(*source)).unwrap_or(0);
                    let available = game.board.planet(*source).map(|p| p.forces).unwrap_or(0);
                    (
                        format!("{source} ({chosen}/{available})"),
                        InteractionPayload::ChooseMoveSource { source: *source },
                    )
                })
                .collect();
            let total = plan.map(PlannedMove::total).unwrap_or(0);
            options.push((format!("Commit ({total})"), InteractionPayload::CommitMove));
            options.push(("Cancel".to_string(), InteractionPayload::CancelMove));
            Some(Prompt::issue(
                sink,
                format!("Move into {destination}: choose sources"),
                vec![player],
                options,
            ))
        }
    }
}
