//! Data-driven content definitions and loaders.
//!
//! This crate houses static game content and provides loaders for RON/TOML data files:
//! - Technology catalogue (names, costs) and the effect handlers behind each technology
//! - Board layouts (data-driven via RON)
//! - Game configuration (data-driven via TOML)
//!
//! Content is consumed by the runtime and never appears in game state apart
//! from the ids it hands out.

pub mod catalogue;
pub mod maps;
pub mod technologies;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use catalogue::TechCatalogue;
pub use maps::{BoardLayout, PlanetSpec};
pub use technologies::{standard_effects, standard_registry};

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, ContentFactory, MapLoader, TechLoader};
