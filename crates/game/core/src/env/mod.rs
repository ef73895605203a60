//! Read-only data the rules consult while resolving.
//!
//! Oracles expose the technology catalogue; the [`GameEnv`] aggregate bundles
//! it with the effect registry so rule code never reaches for globals.
mod tech;

pub use tech::{TechDefinition, TechOracle};

use crate::effects::EffectRegistry;
use crate::error::RuleError;
use crate::state::TechId;

/// Everything static a rule operation may read.
#[derive(Clone, Copy)]
pub struct GameEnv<'a> {
    pub techs: &'a dyn TechOracle,
    pub effects: &'a EffectRegistry,
}

impl<'a> GameEnv<'a> {
    pub fn new(techs: &'a dyn TechOracle, effects: &'a EffectRegistry) -> Self {
        Self { techs, effects }
    }

    /// Looks up a technology, reporting unknown ids as a rule error.
    pub fn tech(&self, id: &TechId) -> Result<&'a TechDefinition, RuleError> {
        self.techs
            .definition(id)
            .ok_or_else(|| RuleError::UnknownTechnology(id.clone()))
    }

    pub fn tech_name(&self, id: &TechId) -> String {
        self.techs
            .definition(id)
            .map(|d| d.name.clone())
            .unwrap_or_else(|| id.to_string())
    }
}

impl core::fmt::Debug for GameEnv<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GameEnv")
            .field("effects", &self.effects.len())
            .finish_non_exhaustive()
    }
}
