//! Content factory for building catalogues and layouts from data files.

use std::path::{Path, PathBuf};

use game_core::GameConfig;

use crate::catalogue::TechCatalogue;
use crate::loaders::{ConfigLoader, LoadResult, MapLoader, TechLoader};
use crate::maps::BoardLayout;

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── technologies.ron
/// └── maps/
///     └── standard.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load game configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        let path = self.data_dir.join("config.toml");
        ConfigLoader::load(&path)
    }

    /// Load the technology catalogue from `technologies.ron`.
    pub fn load_techs(&self) -> LoadResult<TechCatalogue> {
        let path = self.data_dir.join("technologies.ron");
        TechLoader::load(&path)
    }

    /// Load a layout from `maps/{map_name}.ron`.
    pub fn load_map(&self, map_name: &str) -> LoadResult<BoardLayout> {
        let path = self.data_dir.join("maps").join(format!("{}.ron", map_name));
        MapLoader::load(&path)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn loads_everything_from_a_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("config.toml"), "market_size = 2\n").unwrap();
        fs::write(
            dir.path().join("technologies.ron"),
            r#"[(id: "research-grants", name: "Research Grants", cost: 2)]"#,
        )
        .unwrap();
        fs::create_dir(dir.path().join("maps")).unwrap();
        fs::write(
            dir.path().join("maps").join("tiny.ron"),
            r#"(name: "tiny", planets: [(coordinate: (q: 0, r: 0))], homes: [(q: 0, r: 0)])"#,
        )
        .unwrap();

        let factory = ContentFactory::new(dir.path());
        assert_eq!(factory.load_config().unwrap().market_size, 2);
        assert_eq!(factory.load_techs().unwrap().len(), 1);
        assert_eq!(factory.load_map("tiny").unwrap().name, "tiny");
        assert!(factory.load_map("missing").is_err());
    }

    #[test]
    fn bundled_data_matches_the_builtin_content() {
        let factory = ContentFactory::new(concat!(env!("CARGO_MANIFEST_DIR"), "/data"));
        assert_eq!(factory.load_config().unwrap(), GameConfig::default());
        assert_eq!(factory.load_techs().unwrap(), TechCatalogue::standard());
        assert_eq!(
            factory.load_map("standard").unwrap().build(6, &GameConfig::default()),
            BoardLayout::standard().build(6, &GameConfig::default())
        );
    }
}
