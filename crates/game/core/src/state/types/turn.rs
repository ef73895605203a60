/// Lifecycle phase of a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    /// Players may join; nothing else happens.
    #[default]
    Setup,
    /// Turn order is fixed and actions resolve.
    Play,
    /// A player reached the victory target.
    Finished,
}

/// Turn bookkeeping.
///
/// `current_index` and `scoring_index` index into [`crate::Game::players`];
/// [`crate::Game::validate`] enforces that they stay in range.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnState {
    pub phase: Phase,
    /// Round counter, starting at 1 once play begins.
    pub number: u32,
    pub current_index: usize,
    /// Player whose end of turn triggers scoring.
    pub scoring_index: usize,
    /// Whether the current player already spent the turn's main action.
    pub action_taken: bool,
}
