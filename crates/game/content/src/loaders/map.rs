//! Board layout loader.

use std::path::Path;

use crate::loaders::{LoadResult, read_file};
use crate::maps::BoardLayout;

/// Loader for board layouts from RON files.
pub struct MapLoader;

impl MapLoader {
    pub fn load(path: &Path) -> LoadResult<BoardLayout> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<BoardLayout> {
        let layout: BoardLayout = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse map RON: {}", e))?;

        for home in &layout.homes {
            if !layout.planets.iter().any(|p| p.coordinate == *home) {
                anyhow::bail!("Map {}: home {} is not a planet", layout.name, home);
            }
        }
        Ok(layout)
    }
}
