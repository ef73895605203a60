//! Read-through cache of committed games.

use std::future::Future;
use std::time::Duration;

use dashmap::DashMap;
use game_core::{ChannelId, Game, GameId, Phase};
use tokio::task::JoinHandle;

/// A committed game together with the store version it was committed at.
#[derive(Clone, Debug, PartialEq)]
pub struct CachedGame {
    pub game: Game,
    pub version: u64,
}

/// Games by id and by channel, plus the timers attached to each game.
///
/// Only the controller writes here, and only after a successful commit, so
/// an entry is never newer than the store. Finished games are not kept, and
/// evicting a game aborts its timers.
#[derive(Debug, Default)]
pub struct GameCache {
    games: DashMap<GameId, CachedGame>,
    channels: DashMap<ChannelId, GameId>,
    timers: DashMap<GameId, JoinHandle<()>>,
}

impl GameCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &GameId) -> Option<CachedGame> {
        self.games.get(id).map(|entry| entry.clone())
    }

    pub fn by_channel(&self, channel: &ChannelId) -> Option<CachedGame> {
        let id = self.channels.get(channel)?.clone();
        self.get(&id)
    }

    pub fn insert(&self, game: Game, version: u64) {
        if game.phase() == Phase::Finished {
            self.evict(&game.id);
            return;
        }
        self.channels.insert(game.channel_id.clone(), game.id.clone());
        self.games.insert(game.id.clone(), CachedGame { game, version });
    }

    pub fn evict(&self, id: &GameId) {
        if let Some((_, cached)) = self.games.remove(id) {
            self.channels
                .remove_if(&cached.game.channel_id, |_, mapped| mapped == id);
        }
        self.cancel_timer(id);
    }

    /// Runs `task` after `delay`, replacing any timer already set for `id`.
    pub fn schedule<F>(&self, id: &GameId, delay: Duration, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.timers.retain(|_, handle| !handle.is_finished());
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        });
        if let Some(previous) = self.timers.insert(id.clone(), handle) {
            previous.abort();
        }
    }

    pub fn cancel_timer(&self, id: &GameId) {
        if let Some((_, handle)) = self.timers.remove(id) {
            handle.abort();
        }
    }

    pub fn has_timer(&self, id: &GameId) -> bool {
        self.timers
            .get(id)
            .is_some_and(|handle| !handle.is_finished())
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn timer_count(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use game_core::GameConfig;

    use super::*;

    fn game(id: &str, channel: &str) -> Game {
        Game::new(GameId::new(id), ChannelId::new(channel), GameConfig::default())
    }

    #[test]
    fn lookups_by_id_and_channel() {
        let cache = GameCache::new();
        cache.insert(game("g1", "c1"), 3);

        assert_eq!(cache.get(&GameId::new("g1")).unwrap().version, 3);
        assert_eq!(
            cache.by_channel(&ChannelId::new("c1")).unwrap().game.id,
            GameId::new("g1")
        );
        assert!(cache.by_channel(&ChannelId::new("c2")).is_none());
    }

    #[test]
    fn evict_clears_both_indexes() {
        let cache = GameCache::new();
        cache.insert(game("g1", "c1"), 1);
        cache.evict(&GameId::new("g1"));
        assert!(cache.is_empty());
        assert!(cache.by_channel(&ChannelId::new("c1")).is_none());
    }

    #[tokio::test]
    async fn eviction_cancels_timers() {
        let cache = GameCache::new();
        let id = GameId::new("g1");
        cache.insert(game("g1", "c1"), 1);
        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();
        cache.schedule(&id, Duration::from_millis(20), async move {
            flag.store(true, Ordering::SeqCst);
        });
        assert!(cache.has_timer(&id));

        cache.evict(&id);
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(!fired.load(Ordering::SeqCst));
        assert!(!cache.has_timer(&id));
    }

    #[tokio::test]
    async fn rescheduling_replaces_the_previous_timer() {
        let cache = GameCache::new();
        let id = GameId::new("g1");
        let first = Arc::new(AtomicBool::new(false));
        let second = Arc::new(AtomicBool::new(false));
        let (a, b) = (first.clone(), second.clone());
        cache.schedule(&id, Duration::from_millis(20), async move {
            a.store(true, Ordering::SeqCst);
        });
        cache.schedule(&id, Duration::from_millis(20), async move {
            b.store(true, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(80)).await;
        assert!(!first.load(Ordering::SeqCst));
        assert!(second.load(Ordering::SeqCst));
    }

    #[test]
    fn finished_games_are_dropped() {
        let cache = GameCache::new();
        let mut finished = game("g1", "c1");
        cache.insert(finished.clone(), 1);
        finished.turn.phase = Phase::Finished;

        cache.insert(finished, 2);
        assert!(cache.is_empty());
        assert!(cache.by_channel(&ChannelId::new("c1")).is_none());
    }

    #[tokio::test]
    async fn fired_timers_are_pruned() {
        let cache = GameCache::new();
        cache.schedule(&GameId::new("g1"), Duration::ZERO, async {});
        tokio::time::sleep(Duration::from_millis(20)).await;

        cache.schedule(&GameId::new("g2"), Duration::from_secs(60), async {});
        assert_eq!(cache.timer_count(), 1);
        cache.cancel_timer(&GameId::new("g2"));
    }
}
