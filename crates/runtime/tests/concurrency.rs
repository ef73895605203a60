mod common;

use std::sync::Arc;
use std::time::Duration;

use common::*;
use game_core::{ChannelId, Coordinate, Phase};
use runtime::{
    ActionDispatcher, AppContext, Inbound, LogNotifier, RecordedResponse, RuntimeConfig,
    StoreBackend,
};

/// Six users join at once; the per-game lock serializes them so every seat
/// is taken exactly once.
#[tokio::test]
async fn test_parallel_joins_are_serialized() {
    let table = Arc::new(Table::new());
    table.send(ADA, "create", &[]).await;

    let mut tasks = Vec::new();
    for n in 0..6 {
        let table = table.clone();
        tasks.push(tokio::spawn(async move {
            let inbound = Inbound::command(CHANNEL, format!("user-{n}"), "join", &[])
                .with_name(format!("Player {n}"));
            let mut out = RecordedResponse::new();
            table.dispatcher.dispatch(&inbound, &mut out).await;
            out
        }));
    }
    for task in tasks {
        let out = task.await.unwrap();
        assert!(out.error.is_none(), "{out:?}");
    }

    let game = table.game().await;
    assert_eq!(game.players.len(), 6);
    assert_eq!(game.revision, 6);

    let late = table.send("user-late", "join", &[]).await;
    assert_eq!(late.error.as_deref(), Some("the game is full (6 players)"));
}

/// The same button pressed twice at once takes effect once.
#[tokio::test]
async fn test_double_press_applies_once() {
    let (table, start) = Table::started().await;
    let table = Arc::new(table);
    let id = start.button_for("Produce 2,0").unwrap().clone();

    let mut tasks = Vec::new();
    for _ in 0..2 {
        let table = table.clone();
        let id = id.clone();
        tasks.push(tokio::spawn(async move {
            let inbound = Inbound::interaction(CHANNEL, ADA, id);
            let mut out = RecordedResponse::new();
            table.dispatcher.dispatch(&inbound, &mut out).await;
            out
        }));
    }
    let mut errors = Vec::new();
    for task in tasks {
        if let Some(error) = task.await.unwrap().error {
            errors.push(error);
        }
    }
    assert_eq!(errors, vec!["that choice was already made".to_string()]);

    let game = table.game().await;
    assert_eq!(game.board.planet(Coordinate::new(2, 0)).unwrap().forces, 5);
}

/// Games in different channels proceed independently.
#[tokio::test]
async fn test_channels_are_independent() {
    let table = Table::new();
    for channel in ["c-a", "c-b"] {
        let inbound = Inbound::command(channel, ADA, "create", &[]);
        let mut out = RecordedResponse::new();
        table.dispatcher.dispatch(&inbound, &mut out).await;
        assert!(out.error.is_none(), "{out:?}");
    }

    let controller = &table.dispatcher.context().controller;
    let a = controller.find_by_channel(&ChannelId::new("c-a")).await.unwrap().unwrap();
    let b = controller.find_by_channel(&ChannelId::new("c-b")).await.unwrap().unwrap();
    assert_ne!(a.game.id, b.game.id);
}

/// A fresh process over the same file store picks the game up where the
/// previous one left it, buttons included.
#[tokio::test]
async fn test_file_store_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = RuntimeConfig {
        store: StoreBackend::File,
        data_dir: dir.path().to_path_buf(),
        ..seeded()
    };

    let first = Table::with_config(config.clone(), Arc::new(LogNotifier));
    first.seat_two().await;
    let start = first.send(ADA, "start", &[]).await;
    let amount = first.press(ADA, &start, "Move to 1,0").await;
    drop(first);

    let ctx = AppContext::new(config, Arc::new(LogNotifier)).unwrap();
    let second = Table {
        dispatcher: ActionDispatcher::new(Arc::new(ctx)),
    };
    let moved = second.press(ADA, &amount, "3").await;
    assert!(moved.contains("Ada now holds 1,0 with 3 forces."), "{moved:?}");

    let game = second.game().await;
    assert_eq!(game.phase(), Phase::Play);
    assert!(game.turn.action_taken);
}

/// Passing the turn schedules a reminder for the next player; a newer turn
/// replaces it.
#[tokio::test]
async fn test_turn_reminders() {
    let notifier = Arc::new(CollectingNotifier::default());
    let config = RuntimeConfig {
        turn_reminder: Some(Duration::from_millis(40)),
        ..seeded()
    };
    let table = Table::with_config(config, notifier.clone());
    table.seat_two().await;
    table.send(ADA, "start", &[]).await;
    table.send(ADA, "end-turn", &[]).await;
    table.send(BO, "end-turn", &[]).await;

    tokio::time::sleep(Duration::from_millis(150)).await;
    let sent = notifier.sent.lock().unwrap().clone();
    assert_eq!(
        sent,
        vec![(ChannelId::new(CHANNEL), "Ada, it is your turn.".to_string())]
    );
}
