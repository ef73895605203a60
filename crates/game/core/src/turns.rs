//! Turn scheduling: starting play, ending turns, scoring and refresh.

use crate::engine::{Resolution, TriggerEngine};
use crate::env::GameEnv;
use crate::error::{ExecuteError, InvariantViolation, RuleError};
use crate::event::{ActionComplete, TurnBegin};
use crate::interaction::InteractionSink;
use crate::log::ActionLog;
use crate::state::{Board, Game, Phase, PlayerId, TechId};

/// Common precondition of every main action.
pub fn ensure_can_act(game: &Game, player: PlayerId) -> Result<(), RuleError> {
    if game.phase() != Phase::Play {
        return Err(RuleError::WrongPhase {
            actual: game.phase(),
        });
    }
    if game.player(player).is_none() {
        return Err(RuleError::NotAPlayer);
    }
    if game.current_player() != Some(player) {
        return Err(RuleError::NotYourTurn);
    }
    if game.is_resolving() {
        return Err(RuleError::DecisionPending);
    }
    if game.turn.action_taken {
        return Err(RuleError::ActionAlreadyTaken);
    }
    Ok(())
}

/// Starts play and raises the first TurnBegin.
pub fn start_game(
    game: &mut Game,
    board: Board,
    deck: Vec<TechId>,
    env: GameEnv<'_>,
    sink: &mut dyn InteractionSink,
    log: &mut ActionLog,
) -> Result<Resolution, ExecuteError> {
    game.start(board, deck)?;
    let first = game.current_player().ok_or(InvariantViolation::NoPlayers)?;
    log.push(format!(
        "The game begins with {} players.",
        game.players.len()
    ));
    TriggerEngine::new(game, env, sink, log).raise(TurnBegin { player: first }.into())
}

/// Ends the current player's turn.
///
/// The scoring holder ending their turn scores the round first; reaching the
/// victory target finishes the game instead of passing the turn.
pub fn end_turn(
    game: &mut Game,
    player: PlayerId,
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
    if game.is_resolving() {
        return Err(RuleError::DecisionPending.into());
    }

    if let Some(p) = game.player_mut(player) {
        p.planned_move = None;
    }

    if game.turn.current_index == game.turn.scoring_index && score_round(game, log) {
        return Ok(Resolution::Resolved);
    }

    let count = game.players.len();
    if count == 0 {
        return Err(InvariantViolation::NoPlayers.into());
    }
    game.turn.current_index = (game.turn.current_index + 1) % count;
    if game.turn.current_index == 0 {
        game.turn.number += 1;
    }
    game.turn.action_taken = false;

    let next = game.current_player().ok_or(InvariantViolation::NoPlayers)?;
    TriggerEngine::new(game, env, sink, log).raise(TurnBegin { player: next }.into())
}

/// Awards each player victory points equal to the stars they control.
///
/// Returns `true` when somebody reached the target and the game finished.
pub fn score_round(game: &mut Game, log: &mut ActionLog) -> bool {
    let gains: Vec<(PlayerId, u32)> = game
        .players
        .iter()
        .map(|p| {
            let stars = game.board.controlled_by(p.id).map(|planet| planet.stars).sum();
            (p.id, stars)
        })
        .collect();

    for (id, stars) in gains {
        if let Some(player) = game.player_mut(id) {
            player.victory_points += stars;
            log.push(format!(
                "{} scores {} ({} total).",
                player.name, stars, player.victory_points
            ));
        }
    }

    let target = game.config.victory_points;
    let best = game
        .players
        .iter()
        .filter(|p| p.victory_points >= target)
        .max_by_key(|p| p.victory_points);
    match best {
        Some(winner) => {
            log.push(format!(
                "{} wins with {} victory points!",
                winner.name, winner.victory_points
            ));
            game.turn.phase = Phase::Finished;
            true
        }
        None => false,
    }
}

/// Refreshes the current player's planets and technologies.
///
/// With nothing exhausted this is a no-op and the action stays available.
pub fn refresh(
    game: &mut Game,
    player: PlayerId,
    env: GameEnv<'_>,
    sink: &mut dyn InteractionSink,
    log: &mut ActionLog,
) -> Result<Resolution, ExecuteError> {
    ensure_can_act(game, player)?;
    let refreshed = game.refresh_player(player);
    if refreshed == 0 {
        log.push("Nothing to refresh.");
        return Ok(Resolution::Resolved);
    }
    log.push(format!(
        "{} refreshed {refreshed} planets and technologies.",
        game.player_name(player)
    ));
    TriggerEngine::new(game, env, sink, log).raise(ActionComplete { player }.into())
}
