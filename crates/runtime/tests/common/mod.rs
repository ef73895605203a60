#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use game_core::{ChannelId, Coordinate, Game, PlayerId, TechId};
use runtime::{
    ActionDispatcher, AppContext, Inbound, LogNotifier, Notifier, RecordedResponse, RuntimeConfig,
};

pub const CHANNEL: &str = "c1";
pub const ADA: &str = "u-ada";
pub const BO: &str = "u-bo";

pub const A: PlayerId = PlayerId(0);
pub const B: PlayerId = PlayerId(1);

/// Notifier that keeps every message.
#[derive(Default)]
pub struct CollectingNotifier {
    pub sent: Mutex<Vec<(ChannelId, String)>>,
}

#[async_trait]
impl Notifier for CollectingNotifier {
    async fn notify(&self, channel: &ChannelId, message: &str) {
        self.sent
            .lock()
            .unwrap()
            .push((channel.clone(), message.to_string()));
    }
}

pub struct Table {
    pub dispatcher: ActionDispatcher,
}

impl Table {
    pub fn new() -> Self {
        Self::with_config(seeded(), Arc::new(LogNotifier))
    }

    pub fn with_config(config: RuntimeConfig, notifier: Arc<dyn Notifier>) -> Self {
        let ctx = AppContext::new(config, notifier).expect("context");
        Self {
            dispatcher: ActionDispatcher::new(Arc::new(ctx)),
        }
    }

    pub async fn send(&self, user: &str, name: &str, args: &[&str]) -> RecordedResponse {
        let inbound = Inbound::command(CHANNEL, user, name, args).with_name(display(user));
        let mut out = RecordedResponse::new();
        self.dispatcher.dispatch(&inbound, &mut out).await;
        out
    }

    /// Presses the button labelled `label` in `response`.
    pub async fn press(&self, user: &str, response: &RecordedResponse, label: &str) -> RecordedResponse {
        let id = response
            .button_for(label)
            .unwrap_or_else(|| panic!("no {label:?} button in {response:?}"))
            .clone();
        let inbound = Inbound::interaction(CHANNEL, user, id);
        let mut out = RecordedResponse::new();
        self.dispatcher.dispatch(&inbound, &mut out).await;
        out
    }

    pub async fn game(&self) -> Game {
        self.dispatcher
            .context()
            .controller
            .find_by_channel(&ChannelId::new(CHANNEL))
            .await
            .unwrap()
            .expect("game in channel")
            .game
    }

    /// Mutates the stored game directly, for scenario setup.
    pub async fn arrange(&self, f: impl Fn(&mut Game)) {
        let game = self.game().await;
        self.dispatcher
            .context()
            .controller
            .with_game_lock(&game.id, |txn| {
                f(&mut txn.game);
                Ok(())
            })
            .await
            .unwrap();
    }

    /// Creates a game, seats Ada and Bo and starts it.
    pub async fn started() -> (Self, RecordedResponse) {
        let table = Self::new();
        table.seat_two().await;
        let start = table.send(ADA, "start", &[]).await;
        assert!(start.error.is_none(), "{start:?}");
        (table, start)
    }

    pub async fn seat_two(&self) {
        assert!(self.send(ADA, "create", &[]).await.error.is_none());
        assert!(self.send(ADA, "join", &[]).await.error.is_none());
        assert!(self.send(BO, "join", &[]).await.error.is_none());
    }
}

pub fn seeded() -> RuntimeConfig {
    RuntimeConfig {
        rng_seed: Some(11),
        ..RuntimeConfig::default()
    }
}

pub fn display(user: &str) -> &'static str {
    match user {
        ADA => "Ada",
        BO => "Bo",
        _ => "Guest",
    }
}

pub fn grant(game: &mut Game, player: PlayerId, tech: &str) {
    game.player_mut(player)
        .unwrap()
        .gain_tech(TechId::new(tech));
}

pub fn place(game: &mut Game, at: Coordinate, owner: Option<PlayerId>, forces: u32) {
    let planet = game.board.planet_mut(at).unwrap();
    planet.owner = owner;
    planet.forces = forces;
    planet.exhausted = false;
}
