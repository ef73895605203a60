//! Port for messages the runtime sends on its own, such as turn reminders.

use async_trait::async_trait;
use game_core::ChannelId;

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, channel: &ChannelId, message: &str);
}

/// Notifier that only logs.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, channel: &ChannelId, message: &str) {
        tracing::info!(target: "runtime::notify", channel = %channel, "{}", message);
    }
}
