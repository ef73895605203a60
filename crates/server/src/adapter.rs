//! JSON-lines adapter standing in for a chat platform.
//!
//! Each stdin line is one [`Request`]; each stdout line is either a
//! [`ResponseLine`] answering a request or a [`NoticeLine`] the runtime sent
//! on its own.

use async_trait::async_trait;
use game_core::ChannelId;
use runtime::{ActionDispatcher, Inbound, Notifier, RecordedResponse};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct Request {
    /// Echoed back so callers can match answers to requests.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(flatten)]
    pub inbound: Inbound,
}

#[derive(Debug, Serialize)]
pub struct ResponseLine {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub response: RecordedResponse,
}

#[derive(Debug, Serialize)]
pub struct NoticeLine<'a> {
    pub channel: &'a ChannelId,
    pub notice: &'a str,
}

/// Parses and dispatches one input line, returning the output line.
pub async fn handle_line(dispatcher: &ActionDispatcher, line: &str) -> String {
    let request: Request = match serde_json::from_str(line) {
        Ok(request) => request,
        Err(err) => {
            tracing::warn!(target: "server", error = %err, "malformed request line");
            let response = RecordedResponse {
                error: Some(format!("malformed request: {err}")),
                ..RecordedResponse::default()
            };
            return encode(&ResponseLine { id: None, response });
        }
    };

    let mut response = RecordedResponse::new();
    dispatcher.dispatch(&request.inbound, &mut response).await;
    encode(&ResponseLine {
        id: request.id,
        response,
    })
}

fn encode<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|err| {
        tracing::error!(target: "server", error = %err, "response could not be encoded");
        r#"{"response":{"lines":[],"buttons":[],"error":"internal error"}}"#.to_string()
    })
}

/// Prints runtime notices as JSON lines on stdout.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdoutNotifier;

#[async_trait]
impl Notifier for StdoutNotifier {
    async fn notify(&self, channel: &ChannelId, message: &str) {
        println!(
            "{}",
            encode(&NoticeLine {
                channel,
                notice: message,
            })
        );
    }
}
