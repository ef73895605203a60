//! Movement planning and resolution.
mod planning;
mod resolve;

pub use planning::{
    MoveStep, begin_move, cancel_move, choose_source, commit_move, prompt, set_source_amount,
    valid_sources,
};
pub use resolve::{CombatModifiers, MoveOutcome, resolve_move};
