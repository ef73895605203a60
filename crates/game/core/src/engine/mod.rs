//! Event and trigger resolution.
//!
//! The [`TriggerEngine`] is the only place that advances [`PendingEvent`]s.
//! Each event moves through:
//!
//! `Created` → `Collecting` → (`AwaitingPlayer(p)` ↔ `Collecting`)* → `Finalizing`
//! → (`AwaitingDecision(p)` → `Finalizing`)? → resolved
//!
//! Suspending leaves the event at the front of [`Game::pending_events`] and
//! returns a [`Prompt`]; the interactions behind the prompt carry the event id
//! so [`TriggerEngine::resume`] can continue exactly there. Follow-on events
//! raised by finalization are resolved before anything older.
mod finalize;

use crate::effects::{EffectRegistry, TriggerContext};
use crate::env::GameEnv;
use crate::error::{ExecuteError, InvariantViolation, RuleError};
use crate::event::{
    GameEvent, PendingEvent, PurchaseChoice, ResolutionStage, TriggerMode, TriggeredEffect,
};
use crate::interaction::{InteractionPayload, InteractionSink, Prompt};
use crate::log::ActionLog;
use crate::state::{Game, PlayerId};

use finalize::Finalized;

/// Outcome of raising or resuming.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Every pending event resolved.
    Resolved,
    /// A decision is outstanding; render the prompt.
    Suspended(Prompt),
}

impl Resolution {
    pub fn prompt(&self) -> Option<&Prompt> {
        match self {
            Self::Resolved => None,
            Self::Suspended(prompt) => Some(prompt),
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved)
    }
}

enum Step {
    Suspend(Prompt),
    Finished(Vec<GameEvent>),
}

pub struct TriggerEngine<'a> {
    game: &'a mut Game,
    env: GameEnv<'a>,
    sink: &'a mut dyn InteractionSink,
    log: &'a mut ActionLog,
}

impl<'a> TriggerEngine<'a> {
    pub fn new(
        game: &'a mut Game,
        env: GameEnv<'a>,
        sink: &'a mut dyn InteractionSink,
        log: &'a mut ActionLog,
    ) -> Self {
        Self {
            game,
            env,
            sink,
            log,
        }
    }

    /// Raises a new event and resolves as far as possible.
    ///
    /// Refused while another event waits for a decision.
    pub fn raise(&mut self, event: GameEvent) -> Result<Resolution, ExecuteError> {
        if self.game.is_resolving() {
            return Err(RuleError::DecisionPending.into());
        }
        let pending = self.open(event);
        self.game.pending_events.push_front(pending);
        self.drive()
    }

    /// Continues the suspended event with a player's response.
    ///
    /// Responses that no longer match the pending state are rejected before
    /// anything changes.
    pub fn resume(
        &mut self,
        payload: &InteractionPayload,
        responder: PlayerId,
    ) -> Result<Resolution, ExecuteError> {
        let event_id = payload.event_id().ok_or_else(|| {
            InvariantViolation::MalformedInteraction(format!(
                "{} does not resume an event",
                payload.kind()
            ))
        })?;
        let mut pending = match self.game.pending_events.front() {
            Some(front) if front.id == event_id => front.clone(),
            _ => return Err(RuleError::StaleInteraction.into()),
        };

        match (payload, pending.stage) {
            (
                InteractionPayload::RespondToTrigger { player, effect, .. },
                ResolutionStage::AwaitingPlayer(asked),
            ) if *player == asked && responder == asked => {
                let trigger = pending
                    .take_candidate(asked, effect)
                    .filter(|t| t.mode == TriggerMode::Optional)
                    .ok_or(RuleError::StaleInteraction)?;
                self.apply_trigger(&mut pending, &trigger)?;
            }
            (
                InteractionPayload::DeclineTriggers { player, .. },
                ResolutionStage::AwaitingPlayer(asked),
            ) if *player == asked && responder == asked => {
                pending.decline_all(asked);
                self.log
                    .push(format!("{} declined.", self.game.player_name(asked)));
            }
            (InteractionPayload::ChooseTech { tech, .. }, ResolutionStage::AwaitingDecision(asked))
                if responder == asked =>
            {
                let GameEvent::TechPurchaseDecision(decision) = &mut pending.event else {
                    return Err(InvariantViolation::ImpossibleStage(pending.id).into());
                };
                finalize::check_purchase(self.game, self.env, asked, tech, decision.discount)?;
                decision.choice = Some(PurchaseChoice::Buy(tech.clone()));
                pending.stage = ResolutionStage::Finalizing;
            }
            (InteractionPayload::SkipTechPurchase { .. }, ResolutionStage::AwaitingDecision(asked))
                if responder == asked =>
            {
                let GameEvent::TechPurchaseDecision(decision) = &mut pending.event else {
                    return Err(InvariantViolation::ImpossibleStage(pending.id).into());
                };
                decision.choice = Some(PurchaseChoice::Skip);
                pending.stage = ResolutionStage::Finalizing;
            }
            _ => return Err(RuleError::StaleInteraction.into()),
        }

        if let ResolutionStage::AwaitingPlayer(_) = pending.stage {
            pending.clear_offers();
            pending.stage = ResolutionStage::Collecting;
        }
        self.game.pending_events.pop_front();
        self.game.pending_events.push_front(pending);
        self.drive()
    }

    fn open(&mut self, event: GameEvent) -> PendingEvent {
        let id = self.game.allocate_event_id();
        PendingEvent::new(id, event)
    }

    fn drive(&mut self) -> Result<Resolution, ExecuteError> {
        while let Some(mut pending) = self.game.pending_events.pop_front() {
            match self.advance(&mut pending)? {
                Step::Suspend(prompt) => {
                    self.game.pending_events.push_front(pending);
                    return Ok(Resolution::Suspended(prompt));
                }
                Step::Finished(follow_ups) => {
                    let opened: Vec<PendingEvent> =
                        follow_ups.into_iter().map(|e| self.open(e)).collect();
                    for next in opened.into_iter().rev() {
                        self.game.pending_events.push_front(next);
                    }
                }
            }
        }
        Ok(Resolution::Resolved)
    }

    fn advance(&mut self, pending: &mut PendingEvent) -> Result<Step, ExecuteError> {
        loop {
            match pending.stage {
                ResolutionStage::Created => {
                    // Gathered only now so earlier follow-ons are already visible.
                    let order = self.game.turn_order_from(pending.event.owner());
                    let candidates = self.env.effects.candidates(&pending.event, self.game, &order);
                    pending.collect(candidates);
                }
                ResolutionStage::Collecting => {
                    let player = match pending.current_player {
                        Some(player) => player,
                        None => match pending.players_to_resolve.pop_front() {
                            Some(next) => {
                                pending.current_player = Some(next);
                                next
                            }
                            None => {
                                pending.stage = ResolutionStage::Finalizing;
                                continue;
                            }
                        },
                    };

                    self.apply_mandatory(pending, player)?;
                    self.prune(pending, player);

                    if pending.optional_for(player).next().is_none() {
                        pending.current_player = None;
                        continue;
                    }
                    let prompt = self.offer_triggers(pending, player);
                    pending.stage = ResolutionStage::AwaitingPlayer(player);
                    return Ok(Step::Suspend(prompt));
                }
                ResolutionStage::Finalizing => {
                    return match finalize::finalize(&mut *self.game, self.env, pending, &mut *self.log)? {
                        Finalized::Done(follow_ups) => Ok(Step::Finished(follow_ups)),
                        Finalized::Decide {
                            player,
                            text,
                            options,
                        } => {
                            let prompt = Prompt::issue(&mut *self.sink, text, vec![player], options);
                            pending.stage = ResolutionStage::AwaitingDecision(player);
                            Ok(Step::Suspend(prompt))
                        }
                    };
                }
                ResolutionStage::AwaitingPlayer(_) | ResolutionStage::AwaitingDecision(_) => {
                    return Err(InvariantViolation::ImpossibleStage(pending.id).into());
                }
            }
        }
    }

    /// Applies every mandatory candidate of `player` in priority order.
    fn apply_mandatory(
        &mut self,
        pending: &mut PendingEvent,
        player: PlayerId,
    ) -> Result<(), ExecuteError> {
        let mandatory: Vec<TriggeredEffect> = pending
            .candidates_for(player)
            .filter(|t| t.mode == TriggerMode::Mandatory)
            .cloned()
            .collect();
        pending
            .remaining
            .retain(|t| !(t.player == player && t.mode == TriggerMode::Mandatory));

        for trigger in mandatory {
            let effect = self.effect(&trigger)?;
            if EffectRegistry::is_applicable(effect.as_ref(), &pending.event, self.game, player) {
                self.apply_trigger(pending, &trigger)?;
            }
        }
        Ok(())
    }

    /// Drops optional candidates of `player` that stopped applying.
    fn prune(&self, pending: &mut PendingEvent, player: PlayerId) {
        let registry = self.env.effects;
        let game = &*self.game;
        let event = &pending.event;
        pending.remaining.retain(|t| {
            t.player != player
                || registry
                    .find(&t.effect)
                    .is_some_and(|e| EffectRegistry::is_applicable(e.as_ref(), event, game, player))
        });
    }

    fn effect(
        &self,
        trigger: &TriggeredEffect,
    ) -> Result<std::sync::Arc<dyn crate::effects::TriggerEffect>, InvariantViolation> {
        self.env
            .effects
            .find(&trigger.effect)
            .cloned()
            .ok_or_else(|| InvariantViolation::MissingEffect(trigger.effect.clone()))
    }

    fn apply_trigger(
        &mut self,
        pending: &mut PendingEvent,
        trigger: &TriggeredEffect,
    ) -> Result<(), ExecuteError> {
        let effect = self.effect(trigger)?;
        if effect.exhausts_tech() {
            let owner = self
                .game
                .player_mut(trigger.player)
                .ok_or(InvariantViolation::MissingPlayer(trigger.player))?;
            if let Some(tech) = owner.tech_mut(&trigger.tech) {
                tech.exhausted = true;
            }
        }

        let name = self.game.player_name(trigger.player);
        self.log.push(format!(
            "{name} used {} ({}).",
            trigger.label,
            self.env.tech_name(&trigger.tech)
        ));
        let mut ctx = TriggerContext {
            game: &mut *self.game,
            event: &mut pending.event,
            player: trigger.player,
            tech: &trigger.tech,
            log: &mut *self.log,
        };
        effect.apply(&mut ctx)?;
        Ok(())
    }

    fn offer_triggers(&mut self, pending: &mut PendingEvent, player: PlayerId) -> Prompt {
        let mut options: Vec<(String, InteractionPayload)> = pending
            .optional_for(player)
            .map(|t| {
                (
                    t.label.clone(),
                    InteractionPayload::RespondToTrigger {
                        event: pending.id,
                        player,
                        effect: t.effect.clone(),
                    },
                )
            })
            .collect();
        options.push((
            "Decline remaining".to_string(),
            InteractionPayload::DeclineTriggers {
                event: pending.id,
                player,
            },
        ));

        let text = format!(
            "{}: {}. Use a technology?",
            self.game.player_name(player),
            pending.event.describe()
        );
        let prompt = Prompt::issue(&mut *self.sink, text, vec![player], options);

        for (candidate, option) in pending
            .remaining
            .iter_mut()
            .filter(|t| t.player == player && t.mode == TriggerMode::Optional)
            .zip(prompt.options.iter())
        {
            candidate.interaction = Some(option.interaction.clone());
        }
        prompt
    }
}

#[cfg(test)]
mod tests;
