//! Output side of the chat adapter.

use game_core::{InteractionId, Prompt};
use serde::{Deserialize, Serialize};

/// Abstract message builder the adapter renders.
pub trait ResponseBuilder: Send {
    fn text(&mut self, line: &str);

    fn button(&mut self, label: &str, interaction: &InteractionId);

    /// A failure shown only to the invoking user.
    fn error(&mut self, message: &str);
}

/// What a successful request produced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Reply {
    pub lines: Vec<String>,
    pub prompt: Option<Prompt>,
}

impl Reply {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn extend(&mut self, lines: impl IntoIterator<Item = String>) {
        self.lines.extend(lines);
    }

    pub fn with_prompt(mut self, prompt: Option<Prompt>) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn write_to(&self, out: &mut dyn ResponseBuilder) {
        for line in &self.lines {
            out.text(line);
        }
        if let Some(prompt) = &self.prompt {
            out.text(&prompt.text);
            for option in &prompt.options {
                out.button(&option.label, &option.interaction);
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub label: String,
    pub interaction: InteractionId,
}

/// [`ResponseBuilder`] that keeps everything, for tests and line adapters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedResponse {
    pub lines: Vec<String>,
    pub buttons: Vec<Button>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RecordedResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn button_for(&self, label: &str) -> Option<&InteractionId> {
        self.buttons
            .iter()
            .find(|b| b.label == label)
            .map(|b| &b.interaction)
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|line| line.contains(needle))
    }
}

impl ResponseBuilder for RecordedResponse {
    fn text(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }

    fn button(&mut self, label: &str, interaction: &InteractionId) {
        self.buttons.push(Button {
            label: label.to_string(),
            interaction: interaction.clone(),
        });
    }

    fn error(&mut self, message: &str) {
        self.error = Some(message.to_string());
    }
}
