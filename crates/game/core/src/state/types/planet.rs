use super::{Coordinate, PlayerId};

/// A single hex of the board.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Planet {
    pub coordinate: Coordinate,
    pub forces: u32,
    /// Maximum forces this planet may hold once an action has resolved.
    pub capacity: u32,
    /// Recorded owner. Meaningless while `forces == 0`; use [`Planet::controller`].
    pub owner: Option<PlayerId>,
    pub exhausted: bool,
    pub production: u32,
    pub science: u32,
    pub stars: u32,
}

impl Planet {
    pub fn new(coordinate: Coordinate, capacity: u32) -> Self {
        Self {
            coordinate,
            forces: 0,
            capacity,
            owner: None,
            exhausted: false,
            production: 0,
            science: 0,
            stars: 0,
        }
    }

    pub fn with_yield(mut self, production: u32, science: u32, stars: u32) -> Self {
        self.production = production;
        self.science = science;
        self.stars = stars;
        self
    }

    pub fn with_forces(mut self, owner: PlayerId, forces: u32) -> Self {
        self.owner = Some(owner);
        self.forces = forces;
        self
    }

    /// The player actually holding the planet: the owner, if any forces remain.
    pub fn controller(&self) -> Option<PlayerId> {
        if self.forces == 0 { None } else { self.owner }
    }

    pub fn is_controlled_by(&self, player: PlayerId) -> bool {
        self.controller() == Some(player)
    }
}

/// The set of planets in play.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Board {
    planets: Vec<Planet>,
}

impl Board {
    /// Builds a board, keeping the first planet for any duplicated coordinate.
    pub fn from_planets(planets: impl IntoIterator<Item = Planet>) -> Self {
        let mut board = Self::default();
        for planet in planets {
            if board.planet(planet.coordinate).is_none() {
                board.planets.push(planet);
            }
        }
        board
    }

    pub fn planet(&self, coordinate: Coordinate) -> Option<&Planet> {
        self.planets.iter().find(|p| p.coordinate == coordinate)
    }

    pub fn planet_mut(&mut self, coordinate: Coordinate) -> Option<&mut Planet> {
        self.planets.iter_mut().find(|p| p.coordinate == coordinate)
    }

    pub fn planets(&self) -> impl Iterator<Item = &Planet> {
        self.planets.iter()
    }

    pub fn planets_mut(&mut self) -> impl Iterator<Item = &mut Planet> {
        self.planets.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.planets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.planets.is_empty()
    }

    /// Planets adjacent to `coordinate`.
    pub fn neighbors(&self, coordinate: Coordinate) -> impl Iterator<Item = &Planet> {
        self.planets
            .iter()
            .filter(move |p| p.coordinate.is_adjacent(coordinate))
    }

    pub fn controlled_by(&self, player: PlayerId) -> impl Iterator<Item = &Planet> {
        self.planets
            .iter()
            .filter(move |p| p.is_controlled_by(player))
    }

    /// Total forces on the board; used by conservation checks.
    pub fn total_forces(&self) -> u32 {
        self.planets.iter().map(|p| p.forces).sum()
    }
}
