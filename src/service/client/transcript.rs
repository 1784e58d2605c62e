use uuid::Uuid;

use crate::entities::{Message, Role};

/// Identity of one user message and the answer it produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TurnId(Uuid);

impl TurnId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TurnId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    /// `None` for messages loaded from the store.
    pub turn: Option<TurnId>,
    pub message: Message,
}

/// Messages as displayed. Streamed assistant text is keyed by turn, so an
/// answer never lands on an earlier assistant message.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_messages(messages: impl IntoIterator<Item = Message>) -> Self {
        Self {
            entries: messages
                .into_iter()
                .map(|message| TranscriptEntry { turn: None, message })
                .collect(),
        }
    }

    pub fn push_user(&mut self, turn: TurnId, content: impl Into<String>) {
        self.entries.push(TranscriptEntry { turn: Some(turn), message: Message::user(content) });
    }

    /// Replaces the assistant text of `turn`, appending the entry on the
    /// first fragment.
    pub fn upsert_assistant(&mut self, turn: TurnId, content: &str) {
        let existing = self
            .entries
            .iter_mut()
            .rev()
            .find(|entry| entry.turn == Some(turn) && entry.message.role == Role::Assistant);
        match existing {
            Some(entry) => {
                entry.message.content.clear();
                entry.message.content.push_str(content);
            }
            None => self
                .entries
                .push(TranscriptEntry { turn: Some(turn), message: Message::assistant(content) }),
        }
    }

    pub fn assistant_reply(&self, turn: TurnId) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.turn == Some(turn) && entry.message.role == Role::Assistant)
            .map(|entry| entry.message.content.as_str())
    }

    /// History to send to the relay.
    pub fn messages(&self) -> Vec<Message> {
        self.entries.iter().map(|entry| entry.message.clone()).collect()
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
