//! Game events and their resolution bookkeeping.
//!
//! Every rule that technologies may observe is expressed as a [`GameEvent`].
//! Raising one hands it to the [`crate::engine::TriggerEngine`], which walks
//! the interested players, applies or offers their effects, and finally
//! performs the event's own side effects.
mod pending;

pub use pending::{PendingEvent, ResolutionStage, TriggerMode, TriggeredEffect};

use crate::movement::CombatModifiers;
use crate::state::{Coordinate, MoveSource, PlayerId, TechId};

/// A player's turn starts.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnBegin {
    pub player: PlayerId,
}

/// The turn's main action is spent.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionComplete {
    pub player: PlayerId,
}

/// A planet is about to produce. Effects may raise `bonus`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BeginProduce {
    pub player: PlayerId,
    pub planet: Coordinate,
    pub bonus: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PostProduce {
    pub player: PlayerId,
    pub planet: Coordinate,
    pub forces_added: u32,
    pub science_gained: u32,
}

/// A committed move is about to resolve. Effects may adjust `modifiers`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PreMove {
    pub player: PlayerId,
    pub destination: Coordinate,
    pub sources: Vec<MoveSource>,
    /// Controller of the destination if it is someone else.
    pub defender: Option<PlayerId>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub modifiers: CombatModifiers,
}

impl PreMove {
    pub fn moving(&self) -> u32 {
        self.sources.iter().map(|s| s.amount).sum()
    }

    pub fn is_attack(&self) -> bool {
        self.defender.is_some_and(|d| d != self.player)
    }
}

/// Why forces left the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum LossCause {
    Combat,
    Capacity,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PostForcesDestroyed {
    /// Player who owned the destroyed forces.
    pub owner: PlayerId,
    pub planet: Coordinate,
    pub amount: u32,
    pub cause: LossCause,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CapturePlanet {
    pub player: PlayerId,
    pub planet: Coordinate,
    pub previous_owner: Option<PlayerId>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerGainTech {
    pub player: PlayerId,
    pub tech: TechId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerLoseTech {
    pub player: PlayerId,
    pub tech: TechId,
}

/// What the purchasing player picked once offered the market.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PurchaseChoice {
    Buy(TechId),
    Skip,
}

/// A player is buying a technology. Effects may raise `discount`; the actual
/// choice is made after every effect had its say.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TechPurchaseDecision {
    pub player: PlayerId,
    pub discount: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub choice: Option<PurchaseChoice>,
}

/// Closed set of events technologies can react to.
#[derive(Clone, Debug, PartialEq, Eq, strum::EnumDiscriminants)]
#[strum_discriminants(name(EventKind))]
#[strum_discriminants(derive(Hash, PartialOrd, Ord, strum::Display, strum::IntoStaticStr))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type"))]
pub enum GameEvent {
    TurnBegin(TurnBegin),
    ActionComplete(ActionComplete),
    BeginProduce(BeginProduce),
    PostProduce(PostProduce),
    PreMove(PreMove),
    PostForcesDestroyed(PostForcesDestroyed),
    CapturePlanet(CapturePlanet),
    PlayerGainTech(PlayerGainTech),
    PlayerLoseTech(PlayerLoseTech),
    TechPurchaseDecision(TechPurchaseDecision),
}

impl GameEvent {
    pub fn kind(&self) -> EventKind {
        self.into()
    }

    /// Player the trigger walk starts from.
    pub fn owner(&self) -> PlayerId {
        match self {
            Self::TurnBegin(e) => e.player,
            Self::ActionComplete(e) => e.player,
            Self::BeginProduce(e) => e.player,
            Self::PostProduce(e) => e.player,
            Self::PreMove(e) => e.player,
            Self::PostForcesDestroyed(e) => e.owner,
            Self::CapturePlanet(e) => e.player,
            Self::PlayerGainTech(e) => e.player,
            Self::PlayerLoseTech(e) => e.player,
            Self::TechPurchaseDecision(e) => e.player,
        }
    }

    /// Short description used in prompts.
    pub fn describe(&self) -> String {
        match self {
            Self::TurnBegin(e) => format!("turn of {} begins", e.player),
            Self::ActionComplete(e) => format!("{} completed an action", e.player),
            Self::BeginProduce(e) => format!("{} produces at {}", e.player, e.planet),
            Self::PostProduce(e) => format!(
                "{} produced {} forces at {}",
                e.player, e.forces_added, e.planet
            ),
            Self::PreMove(e) => format!(
                "{} moves {} forces into {}",
                e.player,
                e.moving(),
                e.destination
            ),
            Self::PostForcesDestroyed(e) => format!(
                "{} lost {} forces at {} ({})",
                e.owner, e.amount, e.planet, e.cause
            ),
            Self::CapturePlanet(e) => format!("{} captured {}", e.player, e.planet),
            Self::PlayerGainTech(e) => format!("{} gains {}", e.player, e.tech),
            Self::PlayerLoseTech(e) => format!("{} loses {}", e.player, e.tech),
            Self::TechPurchaseDecision(e) => format!("{} is buying a technology", e.player),
        }
    }
}

macro_rules! impl_event_from {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for GameEvent {
                fn from(payload: $variant) -> Self {
                    GameEvent::$variant(payload)
                }
            }
        )*
    };
}

impl_event_from!(
    TurnBegin,
    ActionComplete,
    BeginProduce,
    PostProduce,
    PreMove,
    PostForcesDestroyed,
    CapturePlanet,
    PlayerGainTech,
    PlayerLoseTech,
    TechPurchaseDecision,
);
