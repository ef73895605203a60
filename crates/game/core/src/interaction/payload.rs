use crate::state::{Coordinate, EventId, PlayerId, TechId};

/// Typed continuation carried by an interaction.
///
/// The `kind` tag is the discriminator written next to the payload; decoding
/// an unknown tag fails instead of guessing.
#[derive(Clone, Debug, PartialEq, Eq, strum::EnumDiscriminants)]
#[strum_discriminants(name(InteractionKind))]
#[strum_discriminants(derive(Hash, strum::Display, strum::IntoStaticStr, strum::EnumString))]
#[strum_discriminants(strum(serialize_all = "snake_case"))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum InteractionPayload {
    /// Use one optional effect offered for a pending event.
    RespondToTrigger {
        event: EventId,
        player: PlayerId,
        effect: String,
    },
    /// Decline every remaining optional effect of a player.
    DeclineTriggers { event: EventId, player: PlayerId },
    ChooseTech { event: EventId, tech: TechId },
    SkipTechPurchase { event: EventId },

    BeginMove { destination: Coordinate },
    ChooseMoveSource { source: Coordinate },
    EnterMoveAmount { source: Coordinate, amount: u32 },
    CommitMove,
    CancelMove,

    Produce { planet: Coordinate },
    Refresh,
    BuyTech,
    EndTurn,
}

impl InteractionPayload {
    pub fn kind(&self) -> InteractionKind {
        self.into()
    }

    /// Event this payload continues, for payloads that resume the engine.
    pub fn event_id(&self) -> Option<EventId> {
        match self {
            Self::RespondToTrigger { event, .. }
            | Self::DeclineTriggers { event, .. }
            | Self::ChooseTech { event, .. }
            | Self::SkipTechPurchase { event } => Some(*event),
            _ => None,
        }
    }

    pub fn resumes_engine(&self) -> bool {
        self.event_id().is_some()
    }
}
