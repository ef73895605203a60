//! Plain data types that make up the game aggregate.

mod common;
mod market;
mod planet;
mod player;
mod turn;

pub use common::{ChannelId, Coordinate, EventId, GameId, ParseCoordinateError, PlayerId, TechId};
pub use market::TechMarket;
pub use planet::{Board, Planet};
pub use player::{MoveSource, OwnedTech, PlannedMove, Player};
pub use turn::{Phase, TurnState};
