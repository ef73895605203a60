//! Transactional runtime for chat-driven games.
//!
//! This crate loads games from a [`DocumentStore`], runs rule calls from
//! `game-core` under a per-game lock and commits the new state together with
//! the interactions it issued. The chat adapter talks to it through
//! [`ActionDispatcher`] only.
//!
//! Modules are organized by responsibility:
//! - [`api`] exposes the types the adapter exchanges with the runtime
//! - [`dispatch`] routes commands and button presses to rule calls
//! - [`controller`] owns locking, snapshots, retries and commits
//! - [`store`] and [`records`] persist typed documents
//! - [`context`] and [`config`] assemble everything from the environment
pub mod api;
pub mod cache;
pub mod config;
pub mod context;
pub mod controller;
pub mod dispatch;
pub mod interactions;
pub mod locks;
pub mod records;
pub mod store;

pub use api::{
    Button, Inbound, LogNotifier, Notifier, RecordedResponse, Reply, ResponseBuilder, Result,
    RuntimeError, Target,
};
pub use cache::{CachedGame, GameCache};
pub use config::{RuntimeConfig, StoreBackend};
pub use context::AppContext;
pub use controller::{DEFAULT_MAX_COMMIT_ATTEMPTS, GameController, GameTxn};
pub use dispatch::{ActionDispatcher, Command};
pub use interactions::{InteractionStore, StoredInteraction};
pub use locks::LockRegistry;
pub use records::{AnyRecord, Record, RecordError};
pub use store::{
    DocumentStore, Expect, FileDocumentStore, InMemoryDocumentStore, StoreError,
    VersionedDocument, Write,
};
