use std::collections::VecDeque;

use super::GameEvent;
use crate::interaction::InteractionId;
use crate::state::{EventId, PlayerId, TechId};

/// Whether an effect applies on its own or waits for its owner to opt in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum TriggerMode {
    Mandatory,
    Optional,
}

/// One candidate effect for one player on one event.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TriggeredEffect {
    /// Registry name of the handler.
    pub effect: String,
    pub tech: TechId,
    pub player: PlayerId,
    pub mode: TriggerMode,
    pub label: String,
    /// Interaction currently offering this effect, if any.
    #[cfg_attr(feature = "serde", serde(default))]
    pub interaction: Option<InteractionId>,
}

/// Where the resolution of an event stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResolutionStage {
    /// Raised; candidates not gathered yet.
    Created,
    /// Walking players and applying mandatory effects.
    Collecting,
    /// Optional effects of this player were offered.
    AwaitingPlayer(PlayerId),
    /// Every effect resolved; the event's own side effects are next.
    Finalizing,
    /// The event itself needs a choice from this player (tech purchase).
    AwaitingDecision(PlayerId),
}

/// An event raised but not yet resolved, with everything needed to continue
/// after a suspension.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PendingEvent {
    pub id: EventId,
    pub event: GameEvent,
    pub stage: ResolutionStage,
    /// Candidates not yet applied or declined, grouped by player in visiting
    /// order and by priority within a player.
    pub remaining: Vec<TriggeredEffect>,
    /// Player currently being visited.
    pub current_player: Option<PlayerId>,
    /// Players still owed a chance to respond, in visiting order.
    pub players_to_resolve: VecDeque<PlayerId>,
}

impl PendingEvent {
    pub fn new(id: EventId, event: GameEvent) -> Self {
        Self {
            id,
            event,
            stage: ResolutionStage::Created,
            remaining: Vec::new(),
            current_player: None,
            players_to_resolve: VecDeque::new(),
        }
    }

    /// Records the candidates and the players owed a response, then starts
    /// collecting.
    pub fn collect(&mut self, candidates: Vec<TriggeredEffect>) {
        self.players_to_resolve.clear();
        for candidate in &candidates {
            if !self.players_to_resolve.contains(&candidate.player) {
                self.players_to_resolve.push_back(candidate.player);
            }
        }
        self.remaining = candidates;
        self.current_player = None;
        self.stage = ResolutionStage::Collecting;
    }

    pub fn candidates_for(&self, player: PlayerId) -> impl Iterator<Item = &TriggeredEffect> {
        self.remaining.iter().filter(move |t| t.player == player)
    }

    pub fn optional_for(&self, player: PlayerId) -> impl Iterator<Item = &TriggeredEffect> {
        self.candidates_for(player)
            .filter(|t| t.mode == TriggerMode::Optional)
    }

    /// Removes and returns the candidate of `player` backed by `effect`.
    pub fn take_candidate(&mut self, player: PlayerId, effect: &str) -> Option<TriggeredEffect> {
        let index = self
            .remaining
            .iter()
            .position(|t| t.player == player && t.effect == effect)?;
        Some(self.remaining.remove(index))
    }

    /// Drops every remaining optional candidate of `player`.
    pub fn decline_all(&mut self, player: PlayerId) {
        self.remaining
            .retain(|t| !(t.player == player && t.mode == TriggerMode::Optional));
    }

    pub fn clear_offers(&mut self) {
        for candidate in &mut self.remaining {
            candidate.interaction = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::TurnBegin;

    fn candidate(player: u32, effect: &str, mode: TriggerMode) -> TriggeredEffect {
        TriggeredEffect {
            effect: effect.to_string(),
            tech: TechId::new(effect),
            player: PlayerId(player),
            mode,
            label: effect.to_string(),
            interaction: None,
        }
    }

    #[test]
    fn players_are_visited_once_in_candidate_order() {
        let mut pending = PendingEvent::new(EventId(1), TurnBegin { player: PlayerId(1) }.into());
        pending.collect(vec![
            candidate(1, "a", TriggerMode::Mandatory),
            candidate(1, "b", TriggerMode::Optional),
            candidate(0, "c", TriggerMode::Optional),
        ]);
        assert_eq!(pending.stage, ResolutionStage::Collecting);
        assert_eq!(
            pending.players_to_resolve,
            VecDeque::from([PlayerId(1), PlayerId(0)])
        );
    }

    #[test]
    fn declining_keeps_mandatory_and_other_players() {
        let mut pending = PendingEvent::new(EventId(1), TurnBegin { player: PlayerId(1) }.into());
        pending.collect(vec![
            candidate(1, "a", TriggerMode::Mandatory),
            candidate(1, "b", TriggerMode::Optional),
            candidate(0, "c", TriggerMode::Optional),
        ]);
        pending.decline_all(PlayerId(1));
        let left: Vec<_> = pending.remaining.iter().map(|t| t.effect.as_str()).collect();
        assert_eq!(left, vec!["a", "c"]);
    }
}
