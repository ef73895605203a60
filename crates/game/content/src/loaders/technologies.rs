//! Technology catalogue loader.

use std::path::Path;

use game_core::{TechDefinition, TechId};

use crate::catalogue::TechCatalogue;
use crate::loaders::{LoadResult, read_file};
use crate::technologies::standard_registry;

/// Loader for the technology catalogue from RON files.
///
/// Every listed id must have an effect handler in the standard registry;
/// a catalogue entry without one could be bought but would never fire.
pub struct TechLoader;

impl TechLoader {
    pub fn load(path: &Path) -> LoadResult<TechCatalogue> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<TechCatalogue> {
        let definitions: Vec<TechDefinition> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse technologies RON: {}", e))?;

        let registry = standard_registry();
        let handled: Vec<TechId> = registry
            .names()
            .filter_map(|name| registry.find(name))
            .map(|effect| TechId::new(effect.tech()))
            .collect();
        if let Some(orphan) = definitions.iter().find(|d| !handled.contains(&d.id)) {
            anyhow::bail!("Technology {} has no effect handler", orphan.id);
        }

        Ok(TechCatalogue::new(definitions))
    }
}
