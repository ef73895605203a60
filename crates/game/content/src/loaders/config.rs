//! Game configuration loader.

use std::path::Path;

use game_core::GameConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for game configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> LoadResult<GameConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<GameConfig> {
        let config: GameConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;
        if config.min_players == 0 || config.min_players > config.max_players {
            anyhow::bail!(
                "Invalid player limits: min {} / max {}",
                config.min_players,
                config.max_players
            );
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = ConfigLoader::parse("victory_points = 6\n").unwrap();
        assert_eq!(config.victory_points, 6);
        assert_eq!(config.planet_capacity, GameConfig::DEFAULT_PLANET_CAPACITY);
    }

    #[test]
    fn inverted_player_limits_are_rejected() {
        let err = ConfigLoader::parse("min_players = 5\nmax_players = 3\n").unwrap_err();
        assert!(err.to_string().contains("Invalid player limits"));
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = ConfigLoader::load(Path::new("/nonexistent/config.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/config.toml"));
    }
}
