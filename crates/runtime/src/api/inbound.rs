//! Requests delivered by the chat adapter.

use game_core::{ChannelId, InteractionId};
use serde::{Deserialize, Serialize};

/// What the request asks for: a typed command or a button press.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    Command {
        name: String,
        #[serde(default)]
        args: Vec<String>,
    },
    Interaction {
        id: InteractionId,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inbound {
    pub target: Target,
    /// Chat identity of the invoking user.
    pub user_id: String,
    /// Display name, used when the user joins a game.
    #[serde(default)]
    pub user_name: Option<String>,
    pub channel_id: ChannelId,
}

impl Inbound {
    pub fn command(
        channel_id: impl Into<String>,
        user_id: impl Into<String>,
        name: impl Into<String>,
        args: &[&str],
    ) -> Self {
        Self {
            target: Target::Command {
                name: name.into(),
                args: args.iter().map(|a| a.to_string()).collect(),
            },
            user_id: user_id.into(),
            user_name: None,
            channel_id: ChannelId::new(channel_id),
        }
    }

    pub fn interaction(
        channel_id: impl Into<String>,
        user_id: impl Into<String>,
        id: InteractionId,
    ) -> Self {
        Self {
            target: Target::Interaction { id },
            user_id: user_id.into(),
            user_name: None,
            channel_id: ChannelId::new(channel_id),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.user_name = Some(name.into());
        self
    }

    pub fn display_name(&self) -> &str {
        self.user_name.as_deref().unwrap_or(&self.user_id)
    }
}
