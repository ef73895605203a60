//! Explicit application context.
//!
//! Everything a request handler needs (store-backed controller, content,
//! RNG, notifier) hangs off one [`AppContext`] that the composition root
//! builds once and shares behind an `Arc`.

use std::sync::{Arc, Mutex};

use game_content::{BoardLayout, ContentFactory, TechCatalogue, standard_registry};
use game_core::{EffectRegistry, GameConfig, GameEnv, TechId};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::api::{Notifier, Result, RuntimeError};
use crate::config::{RuntimeConfig, StoreBackend};
use crate::controller::GameController;
use crate::store::{DocumentStore, FileDocumentStore, InMemoryDocumentStore};

pub struct AppContext {
    pub config: RuntimeConfig,
    /// Rules new games are created with.
    pub game_config: GameConfig,
    pub controller: GameController,
    pub techs: TechCatalogue,
    pub effects: EffectRegistry,
    pub layout: BoardLayout,
    pub notifier: Arc<dyn Notifier>,
    rng: Mutex<StdRng>,
}

impl AppContext {
    /// Builds the store selected by `config` and loads content.
    pub fn new(config: RuntimeConfig, notifier: Arc<dyn Notifier>) -> Result<Self> {
        let store: Arc<dyn DocumentStore> = match config.store {
            StoreBackend::Memory => Arc::new(InMemoryDocumentStore::new()),
            StoreBackend::File => Arc::new(FileDocumentStore::new(&config.data_dir)?),
        };
        Self::with_store(config, store, notifier)
    }

    pub fn with_store(
        config: RuntimeConfig,
        store: Arc<dyn DocumentStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        let (game_config, techs, layout) = match &config.content_dir {
            Some(dir) => {
                let factory = ContentFactory::new(dir);
                let content = |e: anyhow::Error| RuntimeError::Content(format!("{e:#}"));
                (
                    factory.load_config().map_err(content)?,
                    factory.load_techs().map_err(content)?,
                    factory.load_map(&config.map).map_err(content)?,
                )
            }
            None => (
                GameConfig::default(),
                TechCatalogue::standard(),
                BoardLayout::standard(),
            ),
        };

        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        tracing::info!(
            target: "runtime::context",
            store = %config.store,
            techs = techs.len(),
            map = %layout.name,
            "application context ready"
        );

        Ok(Self {
            controller: GameController::new(store, config.max_commit_attempts),
            config,
            game_config,
            techs,
            effects: standard_registry(),
            layout,
            notifier,
            rng: Mutex::new(rng),
        })
    }

    pub fn env(&self) -> GameEnv<'_> {
        GameEnv::new(&self.techs, &self.effects)
    }

    /// The whole catalogue in a fresh random order.
    pub fn shuffled_deck(&self) -> Vec<TechId> {
        let mut deck = self.techs.ids();
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        deck.shuffle(&mut *rng);
        deck
    }
}
