//! Durable "a decision is pending" records.
//!
//! Whenever resolution needs a human, the rules describe the decision as a
//! set of [`InteractionPayload`]s and hand them to an [`InteractionSink`].
//! The sink (the runtime's transaction in production) turns each into a
//! persisted [`InteractionData`] and returns its id. A later response carrying
//! that id resumes resolution exactly where it stopped.
mod payload;

pub use payload::{InteractionKind, InteractionPayload};

use std::fmt;

use crate::error::{ErrorSeverity, GameError};
use crate::state::{Game, GameId, PlayerId};

/// Opaque identifier embedded into the chat platform's buttons.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct InteractionId(pub String);

impl InteractionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InteractionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Marks an interaction as used.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Consumption {
    /// Responder, if they are seated in the game.
    pub by: Option<PlayerId>,
    /// Game revision the response was committed at.
    pub at_revision: u64,
}

/// A persisted continuation.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InteractionData {
    pub id: InteractionId,
    pub game_id: GameId,
    /// Players allowed to respond. Empty means anyone in the channel.
    #[cfg_attr(feature = "serde", serde(default))]
    pub allowed_player_ids: Vec<PlayerId>,
    /// Revision of the game this interaction was issued for.
    pub game_revision: u64,
    pub payload: InteractionPayload,
    #[cfg_attr(feature = "serde", serde(default))]
    pub consumed: Option<Consumption>,
}

/// Why a response to an interaction is refused.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum InteractionError {
    /// Reported exactly like a missing interaction.
    #[error("interaction not found")]
    NotPermitted,

    #[error("that choice was already made")]
    Consumed,

    #[error("that choice is no longer available")]
    Stale,
}

impl GameError for InteractionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotPermitted => ErrorSeverity::Permission,
            Self::Consumed | Self::Stale => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        self.into()
    }
}

impl InteractionData {
    pub fn new(
        id: InteractionId,
        game_id: GameId,
        allowed_player_ids: Vec<PlayerId>,
        game_revision: u64,
        payload: InteractionPayload,
    ) -> Self {
        Self {
            id,
            game_id,
            allowed_player_ids,
            game_revision,
            payload,
            consumed: None,
        }
    }

    /// Whether `responder` may use this interaction. Responders that are not
    /// seated in the game pass only open interactions.
    pub fn permits(&self, responder: Option<PlayerId>) -> bool {
        if self.allowed_player_ids.is_empty() {
            return true;
        }
        responder.is_some_and(|p| self.allowed_player_ids.contains(&p))
    }

    /// Whether the game moved on since this interaction was issued.
    pub fn is_stale(&self, game: &Game) -> bool {
        self.game_id != game.id || self.game_revision != game.revision
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed.is_some()
    }

    /// Full check of a response: permission first, so that foreign
    /// responders learn nothing about the interaction's state.
    pub fn authorize(&self, game: &Game, responder: Option<PlayerId>) -> Result<(), InteractionError> {
        if !self.permits(responder) {
            return Err(InteractionError::NotPermitted);
        }
        if self.is_consumed() {
            return Err(InteractionError::Consumed);
        }
        if self.is_stale(game) {
            return Err(InteractionError::Stale);
        }
        Ok(())
    }

    /// Marks the interaction used. A second call fails and changes nothing.
    pub fn consume(&mut self, by: Option<PlayerId>, at_revision: u64) -> Result<(), InteractionError> {
        if self.is_consumed() {
            return Err(InteractionError::Consumed);
        }
        self.consumed = Some(Consumption { by, at_revision });
        Ok(())
    }
}

/// Receives the decisions the rules want to ask for.
pub trait InteractionSink {
    /// Registers one selectable option and returns the id its button carries.
    fn issue(&mut self, allowed: &[PlayerId], payload: InteractionPayload) -> InteractionId;
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PromptOption {
    pub label: String,
    pub interaction: InteractionId,
}

/// A question for one or more players, ready to render.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Prompt {
    pub text: String,
    /// Empty means anyone in the channel.
    pub audience: Vec<PlayerId>,
    pub options: Vec<PromptOption>,
}

impl Prompt {
    /// Issues one interaction per option through `sink`.
    pub fn issue(
        sink: &mut dyn InteractionSink,
        text: impl Into<String>,
        audience: Vec<PlayerId>,
        options: Vec<(String, InteractionPayload)>,
    ) -> Self {
        let options = options
            .into_iter()
            .map(|(label, payload)| PromptOption {
                label,
                interaction: sink.issue(&audience, payload),
            })
            .collect();
        Self {
            text: text.into(),
            audience,
            options,
        }
    }

    pub fn option(&self, label: &str) -> Option<&InteractionId> {
        self.options
            .iter()
            .find(|o| o.label == label)
            .map(|o| &o.interaction)
    }
}

/// Sink that keeps issued payloads in memory with sequential ids.
///
/// Used by tests and offline tools that drive the rules without a store.
#[derive(Debug, Default)]
pub struct RecordingSink {
    next: u64,
    pub issued: Vec<(InteractionId, Vec<PlayerId>, InteractionPayload)>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn payload(&self, id: &InteractionId) -> Option<&InteractionPayload> {
        self.issued
            .iter()
            .find(|(issued, ..)| issued == id)
            .map(|(_, _, payload)| payload)
    }
}

impl InteractionSink for RecordingSink {
    fn issue(&mut self, allowed: &[PlayerId], payload: InteractionPayload) -> InteractionId {
        self.next += 1;
        let id = InteractionId(format!("i-{}", self.next));
        self.issued.push((id.clone(), allowed.to_vec(), payload));
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::state::ChannelId;

    fn game() -> Game {
        Game::new(GameId::new("g"), ChannelId::new("c"), GameConfig::default())
    }

    fn record(allowed: Vec<PlayerId>) -> InteractionData {
        InteractionData::new(
            InteractionId::new("i-1"),
            GameId::new("g"),
            allowed,
            0,
            InteractionPayload::EndTurn,
        )
    }

    #[test]
    fn empty_allow_list_admits_anyone() {
        let open = record(Vec::new());
        assert!(open.permits(None));
        assert!(open.permits(Some(PlayerId(3))));
    }

    #[test]
    fn allow_list_rejects_everyone_else() {
        let closed = record(vec![PlayerId(1)]);
        assert!(closed.permits(Some(PlayerId(1))));
        assert!(!closed.permits(Some(PlayerId(0))));
        assert!(!closed.permits(None));
        assert_eq!(
            closed.authorize(&game(), Some(PlayerId(0))),
            Err(InteractionError::NotPermitted)
        );
    }

    #[test]
    fn consumed_interactions_never_resolve_twice() {
        let mut data = record(Vec::new());
        data.consume(Some(PlayerId(0)), 1).unwrap();
        assert_eq!(data.consume(Some(PlayerId(1)), 2), Err(InteractionError::Consumed));
        assert_eq!(data.consumed.as_ref().map(|c| c.by), Some(Some(PlayerId(0))));
        assert_eq!(data.authorize(&game(), None), Err(InteractionError::Consumed));
    }

    #[test]
    fn revision_change_makes_interaction_stale() {
        let mut game = game();
        let data = record(Vec::new());
        assert!(data.authorize(&game, None).is_ok());
        game.bump_revision();
        assert!(data.is_stale(&game));
        assert_eq!(data.authorize(&game, None), Err(InteractionError::Stale));
    }

    #[test]
    fn prompt_issues_one_interaction_per_option() {
        let mut sink = RecordingSink::new();
        let prompt = Prompt::issue(
            &mut sink,
            "Your turn",
            vec![PlayerId(0)],
            vec![
                ("Refresh".to_string(), InteractionPayload::Refresh),
                ("End turn".to_string(), InteractionPayload::EndTurn),
            ],
        );
        assert_eq!(prompt.options.len(), 2);
        assert_eq!(sink.issued.len(), 2);
        let end = prompt.option("End turn").unwrap();
        assert_eq!(sink.payload(end), Some(&InteractionPayload::EndTurn));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn every_payload_variant_survives_json() {
        use crate::state::{Coordinate, EventId, TechId};

        let payloads = vec![
            InteractionPayload::RespondToTrigger {
                event: EventId(4),
                player: PlayerId(1),
                effect: "assault-doctrine".to_string(),
            },
            InteractionPayload::DeclineTriggers {
                event: EventId(4),
                player: PlayerId(1),
            },
            InteractionPayload::ChooseTech {
                event: EventId(5),
                tech: TechId::new("expansionism"),
            },
            InteractionPayload::SkipTechPurchase { event: EventId(5) },
            InteractionPayload::BeginMove {
                destination: Coordinate::new(1, 0),
            },
            InteractionPayload::ChooseMoveSource {
                source: Coordinate::ORIGIN,
            },
            InteractionPayload::EnterMoveAmount {
                source: Coordinate::ORIGIN,
                amount: 3,
            },
            InteractionPayload::CommitMove,
            InteractionPayload::CancelMove,
            InteractionPayload::Produce {
                planet: Coordinate::new(-1, 1),
            },
            InteractionPayload::Refresh,
            InteractionPayload::BuyTech,
            InteractionPayload::EndTurn,
        ];

        for payload in payloads {
            let mut data = record(vec![PlayerId(1)]);
            data.payload = payload;
            let json = serde_json::to_string(&data).unwrap();
            let back: InteractionData = serde_json::from_str(&json).unwrap();
            assert_eq!(back, data, "{json}");
        }
    }
}
