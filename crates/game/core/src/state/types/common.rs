use std::fmt;
use std::str::FromStr;

/// Game-local player identifier.
///
/// Stable for the lifetime of a game and unrelated to the player's identity on
/// the chat platform (see [`crate::Player::external_id`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Storage identifier of a game aggregate.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct GameId(pub String);

impl GameId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// External chat channel a game is played in.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ChannelId(pub String);

impl ChannelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Technology identifier as used by the catalogue (e.g. `"fortified-worlds"`).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TechId(pub String);

impl TechId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TechId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sequential identifier of a raised game event, unique within one game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct EventId(pub u64);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "event#{}", self.0)
    }
}

/// Axial hex coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coordinate {
    pub q: i32,
    pub r: i32,
}

impl Coordinate {
    pub const ORIGIN: Self = Self { q: 0, r: 0 };

    const DIRECTIONS: [(i32, i32); 6] = [(1, 0), (1, -1), (0, -1), (-1, 0), (-1, 1), (0, 1)];

    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Hex distance in steps.
    pub fn distance(self, other: Coordinate) -> u32 {
        let dq = self.q - other.q;
        let dr = self.r - other.r;
        let ds = -dq - dr;
        ((dq.abs() + dr.abs() + ds.abs()) / 2) as u32
    }

    /// The six neighbouring coordinates, whether or not a planet sits there.
    pub fn neighbors(self) -> impl Iterator<Item = Coordinate> {
        Self::DIRECTIONS
            .into_iter()
            .map(move |(dq, dr)| Coordinate::new(self.q + dq, self.r + dr))
    }

    pub fn is_adjacent(self, other: Coordinate) -> bool {
        self.distance(other) == 1
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.q, self.r)
    }
}

/// Error returned when a coordinate literal such as `"1,-2"` cannot be parsed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid coordinate {0:?}, expected \"q,r\"")]
pub struct ParseCoordinateError(pub String);

impl FromStr for Coordinate {
    type Err = ParseCoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseCoordinateError(s.to_string());
        let (q, r) = s.trim().split_once(',').ok_or_else(err)?;
        let q = q.trim().parse().map_err(|_| err())?;
        let r = r.trim().parse().map_err(|_| err())?;
        Ok(Coordinate::new(q, r))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_hex_steps() {
        let origin = Coordinate::ORIGIN;
        assert_eq!(origin.distance(Coordinate::new(1, 0)), 1);
        assert_eq!(origin.distance(Coordinate::new(1, -1)), 1);
        assert_eq!(origin.distance(Coordinate::new(2, -1)), 2);
        assert_eq!(origin.distance(Coordinate::new(-2, 2)), 2);
    }

    #[test]
    fn every_neighbor_is_adjacent() {
        let center = Coordinate::new(3, -1);
        assert_eq!(center.neighbors().count(), 6);
        assert!(center.neighbors().all(|n| center.is_adjacent(n)));
    }

    #[test]
    fn parses_coordinate_literals() {
        assert_eq!("1,-2".parse::<Coordinate>(), Ok(Coordinate::new(1, -2)));
        assert_eq!(" 0 , 3 ".parse::<Coordinate>(), Ok(Coordinate::new(0, 3)));
        assert!("1;2".parse::<Coordinate>().is_err());
        assert!("a,2".parse::<Coordinate>().is_err());
    }
}
