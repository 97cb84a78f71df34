use crate::modules::coach::core::ports::{CoachClient, CoachError};
use crate::modules::coach::core::reply::parse_coach_reply;
use crate::modules::coach::core::transcript::{
    ChatMessage, FALLBACK_REPLY, Speaker, Transcript, UNREADABLE_REPLY,
};
use crate::shared::core::clock::Clock;
use chrono::Utc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::warn;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SendMessageError {
    #[error("message is empty")]
    EmptyMessage,

    #[error("the coach is still answering the previous message")]
    Busy,
}

struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct SendMessageHandler {
    coach: Arc<dyn CoachClient>,
    clock: Arc<dyn Clock>,
    timeout: Duration,
    transcript: RwLock<Transcript>,
    in_flight: AtomicBool,
}

impl SendMessageHandler {
    pub fn new(coach: Arc<dyn CoachClient>, clock: Arc<dyn Clock>, timeout: Duration) -> Self {
        let transcript = Transcript::new(clock.now().with_timezone(&Utc));
        Self {
            coach,
            clock,
            timeout,
            transcript: RwLock::new(transcript),
            in_flight: AtomicBool::new(false),
        }
    }

    pub async fn transcript(&self) -> Vec<ChatMessage> {
        self.transcript.read().await.messages().to_vec()
    }

    /// Appends the user's message, asks the coach and appends its answer.
    /// Coach failures never surface as errors: they become a fallback message.
    pub async fn handle(&self, text: &str) -> Result<ChatMessage, SendMessageError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SendMessageError::EmptyMessage);
        }
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(SendMessageError::Busy);
        }
        let _in_flight = InFlight(&self.in_flight);

        self.transcript
            .write()
            .await
            .push(Speaker::User, text, self.clock.now().with_timezone(&Utc));

        let answer = match tokio::time::timeout(self.timeout, self.coach.ask(text)).await {
            Ok(Ok(body)) => parse_coach_reply(&body).unwrap_or_else(|| {
                warn!(%body, "unreadable coach reply");
                UNREADABLE_REPLY.to_string()
            }),
            Ok(Err(err)) => {
                warn!(error = %err, "coach call failed");
                FALLBACK_REPLY.to_string()
            }
            Err(_) => {
                warn!(error = %CoachError::Timeout(self.timeout), "coach call failed");
                FALLBACK_REPLY.to_string()
            }
        };

        let reply = ChatMessage {
            speaker: Speaker::Coach,
            text: answer,
            sent_at: self.clock.now().with_timezone(&Utc),
        };
        self.transcript.write().await.push(
            reply.speaker,
            reply.text.clone(),
            reply.sent_at,
        );
        Ok(reply)
    }
}
