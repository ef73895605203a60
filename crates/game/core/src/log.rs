//! Human-readable narration collected while an action resolves.
//!
//! The rules never talk to the chat platform; they append lines here and the
//! runtime renders them into the response for the invoking player.

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActionLog {
    lines: Vec<String>,
}

impl ActionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn extend(&mut self, lines: impl IntoIterator<Item = String>) {
        self.lines.extend(lines);
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}
