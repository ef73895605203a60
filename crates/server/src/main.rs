//! Game server binary.
//!
//! Composition root: reads configuration from the environment, sets up
//! logging, builds the [`AppContext`] and feeds JSON request lines from stdin
//! to the [`ActionDispatcher`]. Answers and notices go to stdout, one JSON
//! document per line.
//!
//! ```bash
//! STORE_BACKEND=file DATA_DIR=./data cargo run -p game-server
//! ```
mod adapter;
mod logging;

use std::sync::Arc;

use anyhow::Result;
use runtime::{ActionDispatcher, AppContext, RuntimeConfig};
use tokio::io::{AsyncBufReadExt, BufReader};

use adapter::StdoutNotifier;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let _guard = logging::setup_logging(logging::log_dir_from_env().as_deref())?;

    let config = RuntimeConfig::from_env();
    tracing::info!(
        store = %config.store,
        data_dir = %config.data_dir.display(),
        reminders = ?config.turn_reminder,
        "Starting game server"
    );

    let ctx = AppContext::new(config, Arc::new(StdoutNotifier))?;
    let dispatcher = ActionDispatcher::new(Arc::new(ctx));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut tasks = tokio::task::JoinSet::new();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let dispatcher = dispatcher.clone();
        tasks.spawn(async move {
            let answer = adapter::handle_line(&dispatcher, &line).await;
            println!("{answer}");
        });
        // reap finished requests so the set does not grow without bound
        while tasks.try_join_next().is_some() {}
    }

    while tasks.join_next().await.is_some() {}
    tracing::info!("stdin closed, shutting down");
    Ok(())
}
