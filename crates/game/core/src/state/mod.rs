//! Authoritative game state representation.
//!
//! [`Game`] is the aggregate the runtime loads, mutates inside one transaction
//! and writes back. Everything a suspended decision needs to continue lives in
//! here (pending events included), so a game can be resumed after a restart
//! from its stored document alone.
pub mod types;

use std::collections::VecDeque;

pub use types::{
    Board, ChannelId, Coordinate, EventId, GameId, MoveSource, OwnedTech, ParseCoordinateError,
    Phase, Planet, PlannedMove, Player, PlayerId, TechId, TechMarket, TurnState,
};

use crate::config::GameConfig;
use crate::error::{InvariantViolation, RuleError};
use crate::event::PendingEvent;

/// Canonical snapshot of one game.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Game {
    pub id: GameId,
    pub channel_id: ChannelId,
    pub config: GameConfig,
    /// Seating order. Fixed once play begins.
    pub players: Vec<Player>,
    pub turn: TurnState,
    pub board: Board,
    pub market: TechMarket,
    /// Events raised but not yet resolved, innermost first.
    ///
    /// Non-empty exactly while a decision is outstanding.
    #[cfg_attr(feature = "serde", serde(default))]
    pub pending_events: VecDeque<PendingEvent>,
    next_event_id: u64,
    /// Incremented on every committed mutation. Interactions are stamped with
    /// the revision they were issued for.
    pub revision: u64,
}

impl Game {
    pub fn new(id: GameId, channel_id: ChannelId, config: GameConfig) -> Self {
        Self {
            id,
            channel_id,
            config,
            players: Vec::new(),
            turn: TurnState::default(),
            board: Board::default(),
            market: TechMarket::default(),
            pending_events: VecDeque::new(),
            next_event_id: 1,
            revision: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.turn.phase
    }

    /// Seats a new player and returns its game-local id.
    pub fn add_player(
        &mut self,
        external_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<PlayerId, RuleError> {
        if self.turn.phase != Phase::Setup {
            return Err(RuleError::WrongPhase {
                actual: self.turn.phase,
            });
        }
        let external_id = external_id.into();
        if self.player_by_external(&external_id).is_some() {
            return Err(RuleError::AlreadyJoined);
        }
        if self.players.len() >= self.config.max_players {
            return Err(RuleError::GameFull {
                max: self.config.max_players,
            });
        }

        let id = PlayerId(self.players.len() as u32);
        self.players.push(Player::new(id, external_id, name));
        Ok(id)
    }

    /// Moves the game from setup into play.
    ///
    /// The board must already carry the players' home planets; the deck order
    /// is final (shuffling is the caller's business).
    pub fn start(&mut self, board: Board, deck: Vec<TechId>) -> Result<(), RuleError> {
        if self.turn.phase != Phase::Setup {
            return Err(RuleError::WrongPhase {
                actual: self.turn.phase,
            });
        }
        if self.players.len() < self.config.min_players {
            return Err(RuleError::NotEnoughPlayers {
                min: self.config.min_players,
            });
        }

        self.board = board;
        self.market = TechMarket::new(deck, self.config.market_size);
        self.turn = TurnState {
            phase: Phase::Play,
            number: 1,
            current_index: 0,
            scoring_index: self.players.len() - 1,
            action_taken: false,
        };
        Ok(())
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    pub fn player_by_external(&self, external_id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.external_id == external_id)
    }

    /// Display name for log lines; falls back to the id.
    pub fn player_name(&self, id: PlayerId) -> String {
        self.player(id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    /// Player whose turn it is. `None` outside of play.
    pub fn current_player(&self) -> Option<PlayerId> {
        if self.turn.phase != Phase::Play {
            return None;
        }
        self.players.get(self.turn.current_index).map(|p| p.id)
    }

    /// All players in seating order, starting with `first` and wrapping around.
    ///
    /// Unknown ids start from the first seat.
    pub fn turn_order_from(&self, first: PlayerId) -> Vec<PlayerId> {
        let start = self
            .players
            .iter()
            .position(|p| p.id == first)
            .unwrap_or(0);
        let count = self.players.len();
        (0..count)
            .map(|offset| self.players[(start + offset) % count].id)
            .collect()
    }

    /// Clears exhaustion on everything `player` controls or owns.
    ///
    /// Returns how many planets and technologies were refreshed; refreshing
    /// twice in a row returns 0 the second time and changes nothing.
    pub fn refresh_player(&mut self, player: PlayerId) -> usize {
        let mut refreshed = 0;
        for planet in self.board.planets_mut() {
            if planet.exhausted && planet.is_controlled_by(player) {
                planet.exhausted = false;
                refreshed += 1;
            }
        }
        if let Some(p) = self.player_mut(player) {
            for tech in p.techs.iter_mut().filter(|t| t.exhausted) {
                tech.exhausted = false;
                refreshed += 1;
            }
        }
        refreshed
    }

    /// Whether an event is mid-resolution and waiting for a decision.
    pub fn is_resolving(&self) -> bool {
        !self.pending_events.is_empty()
    }

    pub fn allocate_event_id(&mut self) -> EventId {
        let id = EventId(self.next_event_id);
        self.next_event_id += 1;
        id
    }

    pub fn bump_revision(&mut self) -> u64 {
        self.revision += 1;
        self.revision
    }

    /// Checks the aggregate invariants. Run before every commit.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        if self.turn.phase != Phase::Setup {
            if self.players.is_empty() {
                return Err(InvariantViolation::NoPlayers);
            }
            for index in [self.turn.current_index, self.turn.scoring_index] {
                if index >= self.players.len() {
                    return Err(InvariantViolation::TurnIndexOutOfRange {
                        index,
                        players: self.players.len(),
                    });
                }
            }
        }

        // Capacity may be exceeded transiently while an event is suspended.
        if !self.is_resolving() {
            if let Some(planet) = self.board.planets().find(|p| p.forces > p.capacity) {
                return Err(InvariantViolation::CapacityExceeded {
                    coordinate: planet.coordinate,
                    forces: planet.forces,
                    capacity: planet.capacity,
                });
            }
        }

        for planet in self.board.planets() {
            if let Some(owner) = planet.controller()
                && self.player(owner).is_none()
            {
                return Err(InvariantViolation::MissingPlayer(owner));
            }
        }
        Ok(())
    }
}
