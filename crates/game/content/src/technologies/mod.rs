//! Effect handlers behind the standard technologies.
//!
//! Each technology contributes one [`TriggerEffect`]. Adding a technology
//! means adding a handler here and a catalogue entry; neither the engine nor
//! the runtime changes.

mod conquest;
mod economy;
mod military;

pub use conquest::{Expansionism, SalvageOperations, ScorchedEarth};
pub use economy::{Industrialization, LogisticsNetwork, ResearchGrants};
pub use military::{AssaultDoctrine, FortifiedWorlds};

use std::sync::Arc;

use game_core::{EffectRegistry, TriggerEffect};

/// Technology ids of the standard set.
pub mod ids {
    pub const FORTIFIED_WORLDS: &str = "fortified-worlds";
    pub const ASSAULT_DOCTRINE: &str = "assault-doctrine";
    pub const INDUSTRIALIZATION: &str = "industrialization";
    pub const SALVAGE_OPERATIONS: &str = "salvage-operations";
    pub const RESEARCH_GRANTS: &str = "research-grants";
    pub const EXPANSIONISM: &str = "expansionism";
    pub const LOGISTICS_NETWORK: &str = "logistics-network";
    pub const SCORCHED_EARTH: &str = "scorched-earth";
}

pub fn standard_effects() -> Vec<Arc<dyn TriggerEffect>> {
    vec![
        Arc::new(FortifiedWorlds),
        Arc::new(AssaultDoctrine),
        Arc::new(Industrialization),
        Arc::new(SalvageOperations),
        Arc::new(ResearchGrants),
        Arc::new(Expansionism),
        Arc::new(LogisticsNetwork),
        Arc::new(ScorchedEarth),
    ]
}

pub fn standard_registry() -> EffectRegistry {
    EffectRegistry::new(standard_effects())
}
