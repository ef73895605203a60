//! Board layouts.
//!
//! A layout is pure data: planet positions and yields plus an ordered list
//! of home planets. Seats are assigned homes in that order when a game
//! starts.

use game_core::{Board, Coordinate, GameConfig, Planet, PlayerId, RuleError};

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlanetSpec {
    pub coordinate: Coordinate,
    #[cfg_attr(feature = "serde", serde(default))]
    pub production: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub science: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub stars: u32,
    /// Overrides the configured planet capacity.
    #[cfg_attr(feature = "serde", serde(default))]
    pub capacity: Option<u32>,
}

impl PlanetSpec {
    pub fn new(coordinate: Coordinate, production: u32, science: u32, stars: u32) -> Self {
        Self {
            coordinate,
            production,
            science,
            stars,
            capacity: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoardLayout {
    pub name: String,
    pub planets: Vec<PlanetSpec>,
    /// Home planets in seat order.
    pub homes: Vec<Coordinate>,
}

impl BoardLayout {
    /// Radius-two hex cluster: a three-star core, a ring of balanced worlds
    /// and six industrial homes on the outer corners.
    pub fn standard() -> Self {
        let origin = Coordinate::ORIGIN;
        let mut planets = vec![PlanetSpec::new(origin, 1, 1, 3)];
        planets.extend(
            origin
                .neighbors()
                .map(|coordinate| PlanetSpec::new(coordinate, 1, 1, 1)),
        );

        // opposite corners first so small games spread out
        let homes = vec![
            Coordinate::new(2, 0),
            Coordinate::new(-2, 0),
            Coordinate::new(0, -2),
            Coordinate::new(0, 2),
            Coordinate::new(2, -2),
            Coordinate::new(-2, 2),
        ];
        for q in -2i32..=2 {
            for r in -2i32..=2 {
                let coordinate = Coordinate::new(q, r);
                if origin.distance(coordinate) != 2 {
                    continue;
                }
                let spec = if homes.contains(&coordinate) {
                    PlanetSpec::new(coordinate, 2, 1, 0)
                } else {
                    PlanetSpec::new(coordinate, 0, 2, 1)
                };
                planets.push(spec);
            }
        }

        Self {
            name: "standard".to_string(),
            planets,
            homes,
        }
    }

    /// Builds the starting board for `players` seats.
    pub fn build(&self, players: usize, config: &GameConfig) -> Result<Board, RuleError> {
        if players > self.homes.len() {
            return Err(RuleError::GameFull {
                max: self.homes.len(),
            });
        }
        let mut board = Board::from_planets(self.planets.iter().map(|spec| {
            Planet::new(
                spec.coordinate,
                spec.capacity.unwrap_or(config.planet_capacity),
            )
            .with_yield(spec.production, spec.science, spec.stars)
        }));
        for (seat, home) in self.homes.iter().take(players).enumerate() {
            let planet = board
                .planet_mut(*home)
                .ok_or(RuleError::UnknownPlanet(*home))?;
            planet.owner = Some(PlayerId(seat as u32));
            planet.forces = config.starting_forces.min(planet.capacity);
        }
        Ok(board)
    }
}
