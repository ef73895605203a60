//! Content loaders for reading game data from files.
//!
//! Loaders turn RON/TOML files into the types the runtime hands to the rules
//! engine: [`game_core::GameConfig`], [`crate::TechCatalogue`] and
//! [`crate::BoardLayout`].

pub mod config;
pub mod factory;
pub mod map;
pub mod technologies;

pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use map::MapLoader;
pub use technologies::TechLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
