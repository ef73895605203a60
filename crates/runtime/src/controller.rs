//! Per-game exclusive execution with transactional commits.
//!
//! Every mutation of a game runs through [`GameController::with_game_lock`]
//! (or [`GameController::respond`] for interaction responses):
//!
//! 1. take the game's mutex from the [`LockRegistry`]
//! 2. read a snapshot (cache first, the store on retries)
//! 3. run the synchronous rule closure against a [`GameTxn`]
//! 4. commit the game and staged interactions in one store batch
//!
//! A conflicting commit re-runs the closure from a fresh snapshot, up to
//! `max_attempts` times. Closure errors abort without writing anything. Once
//! a game finishes it leaves the cache and its lock is released.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use game_core::{
    ChannelId, Game, GameConfig, GameId, InteractionData, InteractionError, InteractionId, Phase,
};
use serde_json::Value;
use uuid::Uuid;

use crate::api::{Result, RuntimeError};
use crate::cache::{CachedGame, GameCache};
use crate::interactions::{InteractionStore, StoredInteraction};
use crate::locks::LockRegistry;
use crate::records::{self, GAMES, INTERACTIONS};
use crate::store::{DocumentStore, Expect, Write};

pub const DEFAULT_MAX_COMMIT_ATTEMPTS: u32 = 8;

/// Working copy handed to rule closures.
#[derive(Debug)]
pub struct GameTxn {
    pub game: Game,
    pub interactions: InteractionStore,
    responding_to: Option<StoredInteraction>,
}

impl GameTxn {
    fn new(game: Game, responding_to: Option<StoredInteraction>) -> Self {
        let interactions = InteractionStore::new(game.id.clone());
        Self {
            game,
            interactions,
            responding_to,
        }
    }

    /// The interaction being answered, if this transaction is a response.
    pub fn responding_to(&self) -> Option<&InteractionData> {
        self.responding_to.as_ref().map(|stored| &stored.data)
    }

    /// Marks the interaction being answered as consumed.
    pub fn consume_interaction(
        &mut self,
        by: Option<game_core::PlayerId>,
    ) -> std::result::Result<(), InteractionError> {
        let stored = self
            .responding_to
            .take()
            .ok_or(InteractionError::NotPermitted)?;
        let revision = self.game.revision;
        self.interactions.consume(stored, by, revision)
    }
}

pub struct GameController {
    store: Arc<dyn DocumentStore>,
    locks: LockRegistry,
    cache: GameCache,
    max_attempts: u32,
}

impl GameController {
    pub fn new(store: Arc<dyn DocumentStore>, max_attempts: u32) -> Self {
        Self {
            store,
            locks: LockRegistry::new(),
            cache: GameCache::new(),
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn cache(&self) -> &GameCache {
        &self.cache
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// Latest committed game, from the cache when present.
    pub async fn load_game(&self, id: &GameId) -> Result<CachedGame> {
        if let Some(cached) = self.cache.get(id) {
            return Ok(cached);
        }
        self.read_game(id).await
    }

    async fn read_game(&self, id: &GameId) -> Result<CachedGame> {
        let doc = self
            .store
            .get(GAMES, id.as_str())
            .await?
            .ok_or_else(|| RuntimeError::GameNotFound(id.clone()))?;
        let game: Game = records::decode_document(&doc)?;
        self.cache.insert(game.clone(), doc.version);
        Ok(CachedGame {
            game,
            version: doc.version,
        })
    }

    /// The game bound to `channel`: an unfinished one if any, else the most
    /// recently updated.
    pub async fn find_by_channel(&self, channel: &ChannelId) -> Result<Option<CachedGame>> {
        if let Some(cached) = self.cache.by_channel(channel) {
            return Ok(Some(cached));
        }

        let mut docs = self
            .store
            .find_by(GAMES, "channel_id", &Value::String(channel.as_str().to_string()))
            .await?;
        docs.sort_by_key(|doc| doc.updated_at);

        let mut chosen: Option<CachedGame> = None;
        for doc in docs {
            let game: Game = records::decode_document(&doc)?;
            let unfinished = game.phase() != Phase::Finished;
            let candidate = CachedGame {
                game,
                version: doc.version,
            };
            match &chosen {
                Some(current) if current.game.phase() != Phase::Finished && !unfinished => {}
                _ => chosen = Some(candidate),
            }
        }

        if let Some(found) = &chosen {
            self.cache.insert(found.game.clone(), found.version);
        }
        Ok(chosen)
    }

    pub async fn create_game(&self, channel: ChannelId, config: GameConfig) -> Result<Game> {
        let key = format!("channel:{channel}");
        let created = {
            let _guard = self.locks.lock(&key).await;
            self.create_unlocked(channel, config).await
        };
        self.locks.release(&key);
        created
    }

    async fn create_unlocked(&self, channel: ChannelId, config: GameConfig) -> Result<Game> {
        if let Some(existing) = self.find_by_channel(&channel).await?
            && existing.game.phase() != Phase::Finished
        {
            return Err(RuntimeError::ChannelTaken);
        }

        let id = GameId::new(Uuid::new_v4().simple().to_string());
        let game = Game::new(id.clone(), channel, config);
        self.store
            .commit(vec![Write::Put {
                collection: GAMES,
                id: id.as_str().to_string(),
                expect: Expect::Absent,
                body: records::encode(&game)?,
            }])
            .await?;
        self.cache.insert(game.clone(), 1);

        tracing::info!(
            target: "runtime::controller",
            game_id = %id,
            channel = %game.channel_id,
            "game created"
        );
        Ok(game)
    }

    pub async fn load_interaction(&self, id: &InteractionId) -> Result<Option<StoredInteraction>> {
        let Some(doc) = self.store.get(INTERACTIONS, id.as_str()).await? else {
            return Ok(None);
        };
        let data: InteractionData = records::decode_document(&doc)?;
        Ok(Some(StoredInteraction {
            data,
            version: doc.version,
        }))
    }

    /// Runs `f` with exclusive access to the game and commits its changes.
    pub async fn with_game_lock<T, F>(&self, id: &GameId, f: F) -> Result<T>
    where
        F: FnMut(&mut GameTxn) -> Result<T>,
    {
        self.run(id, None, f).await
    }

    /// Like [`Self::with_game_lock`] for a response to `interaction`. The
    /// interaction is re-read on every attempt and exposed through
    /// [`GameTxn::responding_to`].
    pub async fn respond<T, F>(&self, interaction: &InteractionId, f: F) -> Result<T>
    where
        F: FnMut(&mut GameTxn) -> Result<T>,
    {
        let stored = self
            .load_interaction(interaction)
            .await?
            .ok_or(InteractionError::NotPermitted)?;
        self.run(&stored.data.game_id, Some(interaction), f).await
    }

    async fn run<T, F>(&self, id: &GameId, interaction: Option<&InteractionId>, mut f: F) -> Result<T>
    where
        F: FnMut(&mut GameTxn) -> Result<T>,
    {
        let guard = self.locks.lock(id.as_str()).await;

        for attempt in 1..=self.max_attempts {
            let snapshot = if attempt == 1 {
                self.load_game(id).await?
            } else {
                self.read_game(id).await?
            };
            let responding_to = match interaction {
                Some(interaction_id) => {
                    let stored = self
                        .load_interaction(interaction_id)
                        .await?
                        .filter(|stored| stored.data.game_id == *id)
                        .ok_or(InteractionError::NotPermitted)?;
                    Some(stored)
                }
                None => None,
            };

            let mut txn = GameTxn::new(snapshot.game.clone(), responding_to);
            let value = f(&mut txn)?;

            match self.commit(&snapshot, txn).await {
                Ok(finished) => {
                    drop(guard);
                    if finished {
                        self.locks.release(id.as_str());
                    }
                    return Ok(value);
                }
                Err(RuntimeError::Store(err)) if err.is_conflict() => {
                    tracing::warn!(
                        target: "runtime::controller",
                        game_id = %id,
                        attempt,
                        error = %err,
                        "commit conflict, retrying from a fresh snapshot"
                    );
                }
                Err(err) => return Err(err),
            }
        }

        tracing::error!(
            target: "runtime::controller",
            game_id = %id,
            attempts = self.max_attempts,
            "commit retries exhausted"
        );
        Err(RuntimeError::CommitRetriesExhausted {
            game_id: id.clone(),
            attempts: self.max_attempts,
        })
    }

    /// Returns whether the committed game is finished.
    async fn commit(&self, snapshot: &CachedGame, txn: GameTxn) -> Result<bool> {
        let GameTxn {
            mut game,
            interactions,
            ..
        } = txn;

        let changed = game != snapshot.game;
        if changed {
            game.bump_revision();
        }
        game.validate()?;

        let mut writes = Vec::new();
        if changed {
            writes.push(Write::Put {
                collection: GAMES,
                id: game.id.as_str().to_string(),
                expect: Expect::Version(snapshot.version),
                body: records::encode(&game)?,
            });
        }
        writes.extend(interactions.into_writes(game.revision)?);
        let finished = game.phase() == Phase::Finished;
        if writes.is_empty() {
            return Ok(finished);
        }

        let count = writes.len();
        self.store.commit(writes).await?;
        tracing::debug!(
            target: "runtime::controller",
            game_id = %game.id,
            revision = game.revision,
            writes = count,
            "committed"
        );
        if changed {
            // finished games are evicted here, timers included
            self.cache.insert(game, snapshot.version + 1);
        }
        Ok(finished)
    }

    /// Removes a game and every interaction issued for it.
    pub async fn delete_game(&self, id: &GameId) -> Result<()> {
        {
            let _guard = self.locks.lock(id.as_str()).await;
            let mut attempt = 0;
            loop {
                attempt += 1;
                let snapshot = self.read_game(id).await?;
                let interactions = self
                    .store
                    .find_by(
                        INTERACTIONS,
                        "game_id",
                        &Value::String(id.as_str().to_string()),
                    )
                    .await?;

                let mut writes = vec![Write::Delete {
                    collection: GAMES,
                    id: id.as_str().to_string(),
                    expect: Expect::Version(snapshot.version),
                }];
                writes.extend(interactions.into_iter().map(|doc| Write::Delete {
                    collection: INTERACTIONS,
                    id: doc.id,
                    expect: Expect::Version(doc.version),
                }));

                match self.store.commit(writes).await {
                    Ok(()) => break,
                    Err(err) if err.is_conflict() && attempt < self.max_attempts => {
                        tracing::warn!(target: "runtime::controller", game_id = %id, attempt, "delete conflict");
                    }
                    Err(err) if err.is_conflict() => {
                        return Err(RuntimeError::CommitRetriesExhausted {
                            game_id: id.clone(),
                            attempts: self.max_attempts,
                        });
                    }
                    Err(err) => return Err(err.into()),
                }
            }
            self.cache.evict(id);
        }
        self.locks.release(id.as_str());

        tracing::info!(target: "runtime::controller", game_id = %id, "game deleted");
        Ok(())
    }

    /// Runs `task` after `delay` unless the game is evicted or rescheduled
    /// first.
    pub fn schedule<F>(&self, id: &GameId, delay: Duration, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cache.schedule(id, delay, task);
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use game_core::{InteractionPayload, PlayerId, RuleError};

    use super::*;
    use crate::store::{InMemoryDocumentStore, StoreError, VersionedDocument};

    fn controller() -> GameController {
        GameController::new(Arc::new(InMemoryDocumentStore::new()), DEFAULT_MAX_COMMIT_ATTEMPTS)
    }

    /// Rejects every write that expects an existing version, as if another
    /// process always committed first.
    struct ContendedStore(InMemoryDocumentStore);

    #[async_trait]
    impl DocumentStore for ContendedStore {
        async fn get(
            &self,
            collection: &str,
            id: &str,
        ) -> crate::store::Result<Option<VersionedDocument>> {
            self.0.get(collection, id).await
        }

        async fn find_by(
            &self,
            collection: &str,
            field: &str,
            value: &Value,
        ) -> crate::store::Result<Vec<VersionedDocument>> {
            self.0.find_by(collection, field, value).await
        }

        async fn commit(&self, writes: Vec<Write>) -> crate::store::Result<()> {
            if let Some(write) = writes
                .iter()
                .find(|write| matches!(write.expect(), Expect::Version(_)))
            {
                return Err(StoreError::Conflict {
                    collection: write.collection().to_string(),
                    id: write.id().to_string(),
                });
            }
            self.0.commit(writes).await
        }
    }

    #[tokio::test]
    async fn one_game_per_channel_until_it_finishes() {
        let controller = controller();
        let channel = ChannelId::new("c1");
        let game = controller
            .create_game(channel.clone(), GameConfig::default())
            .await
            .unwrap();

        let err = controller
            .create_game(channel.clone(), GameConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RuntimeError::ChannelTaken));

        let found = controller.find_by_channel(&channel).await.unwrap().unwrap();
        assert_eq!(found.game.id, game.id);
    }

    #[tokio::test]
    async fn mutations_bump_revision_and_version() {
        let controller = controller();
        let game = controller
            .create_game(ChannelId::new("c1"), GameConfig::default())
            .await
            .unwrap();

        controller
            .with_game_lock(&game.id, |txn| {
                txn.game.add_player("u1", "Ada")?;
                Ok(())
            })
            .await
            .unwrap();

        let stored = controller.read_game(&game.id).await.unwrap();
        assert_eq!(stored.version, 2);
        assert_eq!(stored.game.revision, 1);
        assert_eq!(stored.game.players.len(), 1);
    }

    #[tokio::test]
    async fn failed_closures_commit_nothing() {
        let controller = controller();
        let game = controller
            .create_game(ChannelId::new("c1"), GameConfig::default())
            .await
            .unwrap();

        let err = controller
            .with_game_lock(&game.id, |txn| -> Result<()> {
                txn.game.add_player("u1", "Ada")?;
                txn.interactions.offer(&[], InteractionPayload::EndTurn);
                Err(RuleError::NotYourTurn.into())
            })
            .await
            .unwrap_err();

        assert!(matches!(err, RuntimeError::Rule(RuleError::NotYourTurn)));
        let stored = controller.read_game(&game.id).await.unwrap();
        assert!(stored.game.players.is_empty());
        assert_eq!(stored.version, 1);
    }

    #[tokio::test]
    async fn read_only_transactions_keep_the_revision() {
        let controller = controller();
        let game = controller
            .create_game(ChannelId::new("c1"), GameConfig::default())
            .await
            .unwrap();

        let issued = controller
            .with_game_lock(&game.id, |txn| {
                Ok(txn.interactions.offer(&[PlayerId(0)], InteractionPayload::EndTurn))
            })
            .await
            .unwrap();

        let stored = controller.load_interaction(&issued).await.unwrap().unwrap();
        let current = controller.read_game(&game.id).await.unwrap();
        assert_eq!(current.game.revision, 0);
        assert!(!stored.data.is_stale(&current.game));
    }

    #[tokio::test]
    async fn responses_consume_their_interaction_once() {
        let controller = controller();
        let game = controller
            .create_game(ChannelId::new("c1"), GameConfig::default())
            .await
            .unwrap();
        let issued = controller
            .with_game_lock(&game.id, |txn| {
                Ok(txn.interactions.offer(&[], InteractionPayload::Refresh))
            })
            .await
            .unwrap();

        let respond = || {
            controller.respond(&issued, |txn| {
                let data = txn.responding_to().cloned().ok_or(InteractionError::NotPermitted)?;
                data.authorize(&txn.game, None)?;
                txn.consume_interaction(None)?;
                Ok(())
            })
        };
        respond().await.unwrap();
        let err = respond().await.unwrap_err();
        assert!(matches!(err, RuntimeError::Interaction(InteractionError::Consumed)));
    }

    #[tokio::test]
    async fn unknown_interactions_look_forbidden() {
        let controller = controller();
        let err = controller
            .respond(&InteractionId::new("nope"), |_| Ok(()))
            .await
            .unwrap_err();
        assert!(matches!(err, RuntimeError::Interaction(InteractionError::NotPermitted)));
    }

    #[tokio::test]
    async fn delete_removes_game_and_interactions() {
        let controller = controller();
        let game = controller
            .create_game(ChannelId::new("c1"), GameConfig::default())
            .await
            .unwrap();
        let issued = controller
            .with_game_lock(&game.id, |txn| {
                Ok(txn.interactions.offer(&[], InteractionPayload::Refresh))
            })
            .await
            .unwrap();

        controller.delete_game(&game.id).await.unwrap();

        assert!(controller.load_interaction(&issued).await.unwrap().is_none());
        assert!(controller.find_by_channel(&ChannelId::new("c1")).await.unwrap().is_none());
        assert!(matches!(
            controller.load_game(&game.id).await.unwrap_err(),
            RuntimeError::GameNotFound(_)
        ));
    }

    #[tokio::test]
    async fn conflicting_commit_retries_from_a_fresh_snapshot() {
        let controller = controller();
        let game = controller
            .create_game(ChannelId::new("c1"), GameConfig::default())
            .await
            .unwrap();

        // another writer commits behind the cache
        let mut external = game.clone();
        external.add_player("u0", "External").unwrap();
        external.bump_revision();
        controller
            .store()
            .commit(vec![Write::Put {
                collection: GAMES,
                id: game.id.as_str().to_string(),
                expect: Expect::Version(1),
                body: records::encode(&external).unwrap(),
            }])
            .await
            .unwrap();

        let mut attempts = 0;
        controller
            .with_game_lock(&game.id, |txn| {
                attempts += 1;
                txn.game.add_player("u1", "Ada")?;
                Ok(())
            })
            .await
            .unwrap();

        assert_eq!(attempts, 2);
        let stored = controller.read_game(&game.id).await.unwrap();
        assert_eq!(stored.version, 3);
        assert_eq!(stored.game.revision, 2);
        let names: Vec<_> = stored.game.players.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["External", "Ada"]);
    }

    #[tokio::test]
    async fn endless_conflicts_exhaust_the_retries() {
        let controller = GameController::new(
            Arc::new(ContendedStore(InMemoryDocumentStore::new())),
            3,
        );
        let game = controller
            .create_game(ChannelId::new("c1"), GameConfig::default())
            .await
            .unwrap();

        let mut attempts = 0;
        let err = controller
            .with_game_lock(&game.id, |txn| {
                attempts += 1;
                txn.game.add_player("u1", "Ada")?;
                Ok(())
            })
            .await
            .unwrap_err();

        assert_eq!(attempts, 3);
        assert!(matches!(
            err,
            RuntimeError::CommitRetriesExhausted { attempts: 3, .. }
        ));
        let stored = controller.read_game(&game.id).await.unwrap();
        assert!(stored.game.players.is_empty());
    }

    #[tokio::test]
    async fn locks_and_cache_do_not_outlive_their_use() {
        let controller = controller();
        let game = controller
            .create_game(ChannelId::new("c1"), GameConfig::default())
            .await
            .unwrap();
        assert!(controller.locks.is_empty(), "channel lock released after create");

        controller
            .with_game_lock(&game.id, |txn| {
                txn.game.add_player("u1", "Ada")?;
                txn.game.add_player("u2", "Bo")?;
                Ok(())
            })
            .await
            .unwrap();
        assert_eq!(controller.locks.len(), 1);
        assert_eq!(controller.cache.len(), 1);

        controller
            .with_game_lock(&game.id, |txn| {
                txn.game.turn.phase = Phase::Finished;
                Ok(())
            })
            .await
            .unwrap();

        assert!(controller.locks.is_empty());
        assert!(controller.cache.is_empty());
        let stored = controller.read_game(&game.id).await.unwrap();
        assert_eq!(stored.game.phase(), Phase::Finished);
        assert!(controller.cache.is_empty(), "finished games are not re-cached");
    }
}
