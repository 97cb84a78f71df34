// The chat transcript lives only on this side; the coach service keeps no history.

use chrono::{DateTime, Utc};
use serde::Serialize;

pub const GREETING: &str = "Hi! I'm your habit coach. Tell me how your habits are going today.";
pub const FALLBACK_REPLY: &str = "Sorry, I couldn't reach the coach right now. Please try again in a moment.";
pub const UNREADABLE_REPLY: &str = "Sorry, I couldn't understand the coach's reply.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Coach,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub speaker: Speaker,
    pub text: String,
    pub sent_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            messages: vec![ChatMessage {
                speaker: Speaker::Coach,
                text: GREETING.to_string(),
                sent_at: now,
            }],
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn push(&mut self, speaker: Speaker, text: impl Into<String>, now: DateTime<Utc>) {
        self.messages.push(ChatMessage {
            speaker,
            text: text.into(),
            sent_at: now,
        });
    }
}
