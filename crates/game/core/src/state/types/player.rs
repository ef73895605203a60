use std::collections::BTreeMap;

use super::{Coordinate, PlayerId, TechId};

/// A technology owned by a player.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OwnedTech {
    pub id: TechId,
    /// Exhausted technologies offer no triggers until refreshed.
    pub exhausted: bool,
    /// Technology-specific counters (charges, stored bonuses, ...).
    #[cfg_attr(feature = "serde", serde(default))]
    pub extra: BTreeMap<String, i64>,
}

impl OwnedTech {
    pub fn new(id: TechId) -> Self {
        Self {
            id,
            exhausted: false,
            extra: BTreeMap::new(),
        }
    }

    pub fn counter(&self, key: &str) -> i64 {
        self.extra.get(key).copied().unwrap_or(0)
    }

    pub fn set_counter(&mut self, key: impl Into<String>, value: i64) {
        self.extra.insert(key.into(), value);
    }
}

/// One source entry of a [`PlannedMove`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveSource {
    pub coordinate: Coordinate,
    pub amount: u32,
}

/// In-progress intent to relocate forces.
///
/// Exists only between "begin move" and "commit move"; sources keep the order
/// in which the player picked them.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlannedMove {
    pub destination: Coordinate,
    pub sources: Vec<MoveSource>,
}

impl PlannedMove {
    pub fn new(destination: Coordinate) -> Self {
        Self {
            destination,
            sources: Vec::new(),
        }
    }

    pub fn total(&self) -> u32 {
        self.sources.iter().map(|s| s.amount).sum()
    }

    pub fn amount_from(&self, source: Coordinate) -> u32 {
        self.sources
            .iter()
            .find(|s| s.coordinate == source)
            .map(|s| s.amount)
            .unwrap_or(0)
    }

    /// Sets the amount taken from `source`. A zero amount drops the source.
    pub fn set_amount(&mut self, source: Coordinate, amount: u32) {
        if amount == 0 {
            self.sources.retain(|s| s.coordinate != source);
            return;
        }
        match self.sources.iter_mut().find(|s| s.coordinate == source) {
            Some(entry) => entry.amount = amount,
            None => self.sources.push(MoveSource {
                coordinate: source,
                amount,
            }),
        }
    }
}

/// A seat at the table.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Player {
    pub id: PlayerId,
    /// Identity on the chat platform; only the dispatcher ever looks at it.
    pub external_id: String,
    pub name: String,
    pub science: u32,
    pub victory_points: u32,
    pub techs: Vec<OwnedTech>,
    pub planned_move: Option<PlannedMove>,
}

impl Player {
    pub fn new(id: PlayerId, external_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            external_id: external_id.into(),
            name: name.into(),
            science: 0,
            victory_points: 0,
            techs: Vec::new(),
            planned_move: None,
        }
    }

    pub fn tech(&self, id: &TechId) -> Option<&OwnedTech> {
        self.techs.iter().find(|t| &t.id == id)
    }

    pub fn tech_mut(&mut self, id: &TechId) -> Option<&mut OwnedTech> {
        self.techs.iter_mut().find(|t| &t.id == id)
    }

    pub fn has_tech(&self, id: &TechId) -> bool {
        self.tech(id).is_some()
    }

    /// Technologies that may currently offer triggers.
    pub fn ready_techs(&self) -> impl Iterator<Item = &OwnedTech> {
        self.techs.iter().filter(|t| !t.exhausted)
    }

    /// Grants a technology. Returns `false` if it was already owned.
    pub fn gain_tech(&mut self, id: TechId) -> bool {
        if self.has_tech(&id) {
            return false;
        }
        self.techs.push(OwnedTech::new(id));
        true
    }

    /// Removes a technology. Returns `false` if it was not owned.
    pub fn lose_tech(&mut self, id: &TechId) -> bool {
        let before = self.techs.len();
        self.techs.retain(|t| &t.id != id);
        self.techs.len() != before
    }

    pub fn exhausted_tech_count(&self) -> usize {
        self.techs.iter().filter(|t| t.exhausted).count()
    }
}
