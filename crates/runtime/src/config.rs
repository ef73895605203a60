//! Runtime configuration.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::controller::DEFAULT_MAX_COMMIT_ATTEMPTS;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, strum::EnumString, strum::Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StoreBackend {
    #[default]
    Memory,
    File,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub store: StoreBackend,
    /// Root of the file store.
    pub data_dir: PathBuf,
    pub max_commit_attempts: u32,
    /// Delay before a turn reminder is posted; `None` disables reminders.
    pub turn_reminder: Option<Duration>,
    /// Fixed seed for deck shuffles. Random when unset.
    pub rng_seed: Option<u64>,
    /// Directory with `config.toml`, `technologies.ron` and `maps/`.
    /// Built-in content is used when unset.
    pub content_dir: Option<PathBuf>,
    /// Layout loaded from `maps/` when a content directory is set.
    pub map: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            store: StoreBackend::default(),
            data_dir: default_data_dir(),
            max_commit_attempts: DEFAULT_MAX_COMMIT_ATTEMPTS,
            turn_reminder: None,
            rng_seed: None,
            content_dir: None,
            map: "standard".to_string(),
        }
    }
}

impl RuntimeConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `STORE_BACKEND` - `memory` or `file` (default: memory)
    /// - `DATA_DIR` - Root of the file store (default: platform data dir)
    /// - `MAX_COMMIT_ATTEMPTS` - Commit retries per action (default: 8)
    /// - `TURN_REMINDER_SECS` - Reminder delay, 0 disables (default: 0)
    /// - `RNG_SEED` - Seed for deck shuffles (default: random)
    /// - `CONTENT_DIR` - Content data directory (default: built-in content)
    /// - `MAP` - Layout name inside `CONTENT_DIR/maps` (default: standard)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(store) = read_env::<StoreBackend>("STORE_BACKEND") {
            config.store = store;
        }
        if let Ok(dir) = env::var("DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(attempts) = read_env::<u32>("MAX_COMMIT_ATTEMPTS") {
            config.max_commit_attempts = attempts.max(1);
        }
        config.turn_reminder = read_env::<u64>("TURN_REMINDER_SECS")
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);
        config.rng_seed = read_env::<u64>("RNG_SEED");
        config.content_dir = env::var("CONTENT_DIR").ok().map(PathBuf::from);
        if let Ok(map) = env::var("MAP") {
            config.map = map;
        }

        config
    }
}

/// Platform data directory, falling back to `./game_data`.
pub fn default_data_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "starlane")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./game_data"))
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_names_parse_case_insensitively() {
        assert_eq!("file".parse::<StoreBackend>().unwrap(), StoreBackend::File);
        assert_eq!("Memory".parse::<StoreBackend>().unwrap(), StoreBackend::Memory);
        assert!("sql".parse::<StoreBackend>().is_err());
        assert_eq!(StoreBackend::File.to_string(), "file");
    }

    #[test]
    fn defaults() {
        let config = RuntimeConfig::default();
        assert_eq!(config.store, StoreBackend::Memory);
        assert_eq!(config.max_commit_attempts, 8);
        assert!(config.turn_reminder.is_none());
        assert_eq!(config.map, "standard");
    }
}
