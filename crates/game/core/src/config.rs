/// Rule parameters of a single game.
///
/// Stored on the [`crate::Game`] itself so a game keeps the rules it was
/// started with even if the server defaults change later.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Maximum forces a planet may hold after an action resolves.
    pub planet_capacity: u32,
    /// Victory points that end the game at a scoring check.
    pub victory_points: u32,
    /// Number of technologies offered in the market at once.
    pub market_size: usize,
    pub min_players: usize,
    pub max_players: usize,
    /// Forces placed on each home planet when play begins.
    pub starting_forces: u32,
}

impl GameConfig {
    pub const DEFAULT_PLANET_CAPACITY: u32 = 12;
    pub const DEFAULT_VICTORY_POINTS: u32 = 10;
    pub const DEFAULT_MARKET_SIZE: usize = 3;
    pub const DEFAULT_MIN_PLAYERS: usize = 2;
    pub const DEFAULT_MAX_PLAYERS: usize = 6;
    pub const DEFAULT_STARTING_FORCES: u32 = 3;

    pub fn new() -> Self {
        Self {
            planet_capacity: Self::DEFAULT_PLANET_CAPACITY,
            victory_points: Self::DEFAULT_VICTORY_POINTS,
            market_size: Self::DEFAULT_MARKET_SIZE,
            min_players: Self::DEFAULT_MIN_PLAYERS,
            max_players: Self::DEFAULT_MAX_PLAYERS,
            starting_forces: Self::DEFAULT_STARTING_FORCES,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
