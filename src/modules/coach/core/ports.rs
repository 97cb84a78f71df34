// Ports for the AI coach collaborator.
//
// Boundaries
// - One request, one reply. No streaming and no server-side conversation state.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoachError {
    #[error("coach timed out after {0:?}")]
    Timeout(Duration),

    #[error("coach unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait CoachClient: Send + Sync {
    /// Sends the user's text and returns the raw reply body.
    async fn ask(&self, user_input: &str) -> Result<Value, CoachError>;
}
