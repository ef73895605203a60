//! Inbound request routing.
//!
//! [`ActionDispatcher`] is the single entry point of the chat adapter. Typed
//! commands and button presses both end up as a rule call inside one game
//! transaction; the reply is built from what the closure returned, so a
//! retried transaction never shows output from an attempt that did not
//! commit.
//!
//! Button presses go through [`GameController::respond`]: the interaction is
//! authorized against the snapshot, consumed, and its payload routed to the
//! matching rule call in the same commit.
//!
//! [`GameController::respond`]: crate::controller::GameController::respond
mod command;
mod render;

use std::sync::Arc;

use game_core::{
    ActionLog, ErrorSeverity, Game, GameError, GameEnv, InteractionId, InteractionPayload,
    MoveStep, PlayerId, Prompt, Resolution, RuleError, TechId, TriggerEngine, movement,
    production, technology, turns,
};

use crate::api::{Inbound, Reply, ResponseBuilder, Result, RuntimeError, Target};
use crate::context::AppContext;
use crate::controller::GameTxn;

pub use command::{Command, coordinate_arg, tech_arg};
pub use render::{action_menu, status_lines, waiting_on};

const INTERNAL_ERROR: &str = "Something went wrong on our side. Please try again.";
const NOT_AVAILABLE: &str = "That option is not available to you.";

/// What a transaction hands back once it committed.
struct Outcome {
    reply: Reply,
    /// Set when the turn passed to someone else.
    next_turn: Option<PlayerId>,
}

impl Outcome {
    fn new(reply: Reply) -> Self {
        Self {
            reply,
            next_turn: None,
        }
    }
}

#[derive(Clone)]
pub struct ActionDispatcher {
    ctx: Arc<AppContext>,
}

impl ActionDispatcher {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &Arc<AppContext> {
        &self.ctx
    }

    /// Handles one request and renders the result into `out`.
    ///
    /// Failures are reported by severity: rule and input errors verbatim,
    /// permission failures without detail, everything else as a generic
    /// message with the cause logged.
    pub async fn dispatch(&self, inbound: &Inbound, out: &mut dyn ResponseBuilder) {
        tracing::debug!(
            target: "runtime::dispatch",
            channel = %inbound.channel_id,
            user = %inbound.user_id,
            request = ?inbound.target,
            "inbound"
        );
        match self.execute(inbound).await {
            Ok(reply) => reply.write_to(out),
            Err(err) => match err.severity() {
                ErrorSeverity::Validation => out.error(&err.to_string()),
                ErrorSeverity::Permission => {
                    tracing::debug!(target: "runtime::dispatch", error = %err, "refused");
                    out.error(NOT_AVAILABLE);
                }
                ErrorSeverity::Conflict | ErrorSeverity::Fatal => {
                    tracing::error!(
                        target: "runtime::dispatch",
                        channel = %inbound.channel_id,
                        user = %inbound.user_id,
                        error = %err,
                        "request failed"
                    );
                    out.error(INTERNAL_ERROR);
                }
            },
        }
    }

    /// Handles one request, returning the reply or the error.
    pub async fn execute(&self, inbound: &Inbound) -> Result<Reply> {
        match &inbound.target {
            Target::Command { name, args } => {
                let command = Command::parse(name)?;
                self.command(command, args, inbound).await
            }
            Target::Interaction { id } => self.interaction(id, inbound).await,
        }
    }

    async fn command(&self, command: Command, args: &[String], inbound: &Inbound) -> Result<Reply> {
        match command {
            Command::Help => Ok(Reply {
                lines: Command::usage(),
                prompt: None,
            }),
            Command::Create => self.create(inbound).await,
            Command::Join => self.join(inbound).await,
            Command::Start => self.start(inbound).await,
            Command::Status => self.status(inbound).await,
            Command::Abandon => self.abandon(inbound).await,
            Command::ScrapTech => {
                let tech = tech_arg(args)?;
                self.scrap(tech, inbound).await
            }
            Command::Move => {
                let destination = coordinate_arg(args)?;
                self.act(inbound, InteractionPayload::BeginMove { destination })
                    .await
            }
            Command::Produce => {
                let planet = coordinate_arg(args)?;
                self.act(inbound, InteractionPayload::Produce { planet }).await
            }
            Command::Refresh => self.act(inbound, InteractionPayload::Refresh).await,
            Command::BuyTech => self.act(inbound, InteractionPayload::BuyTech).await,
            Command::EndTurn => self.act(inbound, InteractionPayload::EndTurn).await,
        }
    }

    async fn channel_game(&self, inbound: &Inbound) -> Result<Game> {
        self.ctx
            .controller
            .find_by_channel(&inbound.channel_id)
            .await?
            .map(|cached| cached.game)
            .ok_or(RuntimeError::NoGameInChannel)
    }

    async fn create(&self, inbound: &Inbound) -> Result<Reply> {
        let game = self
            .ctx
            .controller
            .create_game(inbound.channel_id.clone(), self.ctx.game_config.clone())
            .await?;
        Ok(Reply::new()
            .line(format!(
                "New game created. Up to {} players may `join`, then `start`.",
                game.config.max_players
            )))
    }

    async fn join(&self, inbound: &Inbound) -> Result<Reply> {
        let game = self.channel_game(inbound).await?;
        let name = inbound.display_name().to_string();
        self.ctx
            .controller
            .with_game_lock(&game.id, |txn| {
                txn.game.add_player(inbound.user_id.clone(), name.clone())?;
                Ok(Reply::new().line(format!(
                    "{name} joined ({}/{} seats).",
                    txn.game.players.len(),
                    txn.game.config.max_players
                )))
            })
            .await
    }

    async fn start(&self, inbound: &Inbound) -> Result<Reply> {
        let game = self.channel_game(inbound).await?;
        let ctx = &self.ctx;
        let outcome = ctx
            .controller
            .with_game_lock(&game.id, |txn| {
                seat(&txn.game, &inbound.user_id)?;
                let board = ctx.layout.build(txn.game.players.len(), &txn.game.config)?;
                let deck = ctx.shuffled_deck();
                let mut log = ActionLog::new();
                let resolution = turns::start_game(
                    &mut txn.game,
                    board,
                    deck,
                    ctx.env(),
                    &mut txn.interactions,
                    &mut log,
                )?;
                let mut reply = Reply::new();
                reply.extend(log.into_lines());
                reply.extend(status_lines(&txn.game, ctx.env()));
                Ok(Outcome {
                    reply: finish(txn, reply, resolution),
                    next_turn: txn.game.current_player(),
                })
            })
            .await?;
        self.after_commit(&game, &outcome).await;
        Ok(outcome.reply)
    }

    async fn status(&self, inbound: &Inbound) -> Result<Reply> {
        let game = self.channel_game(inbound).await?;
        let ctx = &self.ctx;
        ctx.controller
            .with_game_lock(&game.id, |txn| {
                let mut reply = Reply::new();
                reply.extend(status_lines(&txn.game, ctx.env()));
                if let Some(pending) = txn.game.pending_events.front() {
                    reply.push(format!(
                        "Resolving {}; waiting on {}.",
                        pending.event.kind(),
                        pending
                            .current_player
                            .map(|p| txn.game.player_name(p))
                            .unwrap_or_else(|| "the engine".to_string())
                    ));
                }
                // menus issued here carry the unchanged revision
                reply.prompt = action_menu(&txn.game, &mut txn.interactions);
                Ok(reply)
            })
            .await
    }

    async fn abandon(&self, inbound: &Inbound) -> Result<Reply> {
        let game = self.channel_game(inbound).await?;
        seat(&game, &inbound.user_id)?;
        self.ctx.controller.delete_game(&game.id).await?;
        Ok(Reply::new().line(format!(
            "{} abandoned the game.",
            inbound.display_name()
        )))
    }

    async fn scrap(&self, tech: TechId, inbound: &Inbound) -> Result<Reply> {
        let game = self.channel_game(inbound).await?;
        let ctx = &self.ctx;
        let outcome = ctx
            .controller
            .with_game_lock(&game.id, |txn| {
                let player = seat(&txn.game, &inbound.user_id)?;
                let mut log = ActionLog::new();
                let resolution = technology::scrap_tech(
                    &mut txn.game,
                    player,
                    tech.clone(),
                    ctx.env(),
                    &mut txn.interactions,
                    &mut log,
                )?;
                Ok(Outcome::new(finish(
                    txn,
                    Reply {
                        lines: log.into_lines(),
                        prompt: None,
                    },
                    resolution,
                )))
            })
            .await?;
        Ok(outcome.reply)
    }

    /// A typed command that maps onto an interaction payload.
    async fn act(&self, inbound: &Inbound, payload: InteractionPayload) -> Result<Reply> {
        let game = self.channel_game(inbound).await?;
        let ctx = &self.ctx;
        let outcome = ctx
            .controller
            .with_game_lock(&game.id, |txn| {
                let player = seat(&txn.game, &inbound.user_id)?;
                perform(txn, ctx.env(), player, &payload)
            })
            .await?;
        self.after_commit(&game, &outcome).await;
        Ok(outcome.reply)
    }

    async fn interaction(&self, id: &InteractionId, inbound: &Inbound) -> Result<Reply> {
        let ctx = &self.ctx;
        let outcome = ctx
            .controller
            .respond(id, |txn| {
                let data = txn
                    .responding_to()
                    .cloned()
                    .ok_or(game_core::InteractionError::NotPermitted)?;
                if txn.game.channel_id != inbound.channel_id {
                    return Err(game_core::InteractionError::NotPermitted.into());
                }
                let responder = txn
                    .game
                    .player_by_external(&inbound.user_id)
                    .map(|p| p.id);
                data.authorize(&txn.game, responder)?;
                txn.consume_interaction(responder)?;
                let player = responder.ok_or(RuleError::NotAPlayer)?;
                perform(txn, ctx.env(), player, &data.payload)
            })
            .await?;

        tracing::info!(
            target: "runtime::dispatch",
            interaction = %id,
            user = %inbound.user_id,
            "interaction answered"
        );
        if let Some(cached) = ctx.controller.cache().by_channel(&inbound.channel_id) {
            self.after_commit(&cached.game, &outcome).await;
        }
        Ok(outcome.reply)
    }

    /// Timers that follow a committed transaction. A finished game has left
    /// the cache, which already cancelled its timer.
    async fn after_commit(&self, game: &Game, outcome: &Outcome) {
        let current = self.ctx.controller.cache().get(&game.id).map(|cached| cached.game);
        let (Some(delay), Some(next), Some(current)) =
            (self.ctx.config.turn_reminder, outcome.next_turn, current)
        else {
            return;
        };
        let Some(player) = current.player(next) else {
            return;
        };

        let notifier = self.ctx.notifier.clone();
        let channel = current.channel_id.clone();
        let message = format!("{}, it is your turn.", player.name);
        self.ctx.controller.schedule(&game.id, delay, async move {
            notifier.notify(&channel, &message).await;
        });
        tracing::debug!(
            target: "runtime::dispatch",
            game_id = %game.id,
            delay_secs = delay.as_secs(),
            "turn reminder scheduled"
        );
    }
}

/// The seated player for a chat user.
fn seat(game: &Game, user_id: &str) -> Result<PlayerId> {
    game.player_by_external(user_id)
        .map(|p| p.id)
        .ok_or_else(|| RuleError::NotAPlayer.into())
}

/// Routes `payload` to the rule call it stands for.
fn perform(
    txn: &mut GameTxn,
    env: GameEnv<'_>,
    player: PlayerId,
    payload: &InteractionPayload,
) -> Result<Outcome> {
    let mut log = ActionLog::new();
    let game = &mut txn.game;
    let sink = &mut txn.interactions;
    let was_current = game.current_player();

    let resolution = match payload {
        InteractionPayload::RespondToTrigger { .. }
        | InteractionPayload::DeclineTriggers { .. }
        | InteractionPayload::ChooseTech { .. }
        | InteractionPayload::SkipTechPurchase { .. } => {
            TriggerEngine::new(game, env, sink, &mut log).resume(payload, player)?
        }
        InteractionPayload::BeginMove { destination } => {
            let next = movement::begin_move(game, player, *destination)?;
            plan_step(game, env, player, next, sink, &mut log)?
        }
        InteractionPayload::ChooseMoveSource { source } => {
            let next = movement::choose_source(game, player, *source)?;
            plan_step(game, env, player, next, sink, &mut log)?
        }
        InteractionPayload::EnterMoveAmount { source, amount } => {
            let next = movement::set_source_amount(game, player, *source, *amount)?;
            plan_step(game, env, player, next, sink, &mut log)?
        }
        InteractionPayload::CommitMove => {
            movement::commit_move(game, player, env, sink, &mut log)?
        }
        InteractionPayload::CancelMove => {
            movement::cancel_move(game, player)?;
            log.push(format!("{} cancelled the move.", game.player_name(player)));
            Resolution::Resolved
        }
        InteractionPayload::Produce { planet } => {
            production::begin_produce(game, player, *planet, env, sink, &mut log)?
        }
        InteractionPayload::Refresh => turns::refresh(game, player, env, sink, &mut log)?,
        InteractionPayload::BuyTech => technology::buy_tech(game, player, env, sink, &mut log)?,
        InteractionPayload::EndTurn => turns::end_turn(game, player, env, sink, &mut log)?,
    };

    let now_current = txn.game.current_player();
    let next_turn = now_current.filter(|p| was_current != Some(*p));
    let reply = Reply {
        lines: log.into_lines(),
        prompt: None,
    };
    Ok(Outcome {
        reply: finish(txn, reply, resolution),
        next_turn,
    })
}

/// Result of a movement planning step: either another prompt or, once the
/// plan is complete, the committed move.
fn plan_step(
    game: &mut Game,
    env: GameEnv<'_>,
    player: PlayerId,
    step: MoveStep,
    sink: &mut crate::interactions::InteractionStore,
    log: &mut ActionLog,
) -> Result<Resolution> {
    if matches!(step, MoveStep::Ready) {
        return Ok(movement::commit_move(game, player, env, sink, log)?);
    }
    Ok(match movement::prompt(game, player, &step, sink) {
        Some(prompt) => Resolution::Suspended(prompt),
        None => Resolution::Resolved,
    })
}

/// Attaches the outstanding prompt, or the next action menu when nothing is
/// outstanding.
fn finish(txn: &mut GameTxn, mut reply: Reply, resolution: Resolution) -> Reply {
    let prompt: Option<Prompt> = match resolution {
        Resolution::Suspended(prompt) => {
            if let Some(line) = waiting_on(&txn.game, &prompt) {
                reply.push(line);
            }
            Some(prompt)
        }
        Resolution::Resolved => action_menu(&txn.game, &mut txn.interactions),
    };
    reply.prompt = prompt;
    reply
}
