use serde::{Deserialize, Serialize};

pub const GREETING: &str = "Hi Commander, I'm your portfolio assistant. Ask me for your resume, \
    links, or a quick project summary. Try: 'Show resume', 'Open GitHub', or \
    'Tell me about Mail Whisperer'.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub speaker: Speaker,
    pub text: String,
}

impl Entry {
    pub fn user(text: impl Into<String>) -> Self {
        Self { speaker: Speaker::User, text: text.into() }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self { speaker: Speaker::Bot, text: text.into() }
    }
}

/// Append-only log of one dialog session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Transcript {
    entries: Vec<Entry>,
}

impl Transcript {
    /// A transcript opened with the assistant's welcome message.
    pub fn with_greeting() -> Self {
        let mut transcript = Self::default();
        transcript.push(Entry::bot(GREETING));
        transcript
    }

    pub fn push(&mut self, entry: Entry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&Entry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
