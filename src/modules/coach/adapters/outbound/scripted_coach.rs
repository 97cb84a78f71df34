// Offline coach that answers from a keyword table. Used when no coach service is
// configured and in tests.

use crate::modules::coach::core::ports::{CoachClient, CoachError};
use async_trait::async_trait;
use serde_json::{Value, json};

const SCRIPT: &[(&[&str], &str)] = &[
    (
        &["tired", "exhausted", "sleep"],
        "Rest counts too. Pick the smallest version of your habit today and call it a win.",
    ),
    (
        &["forgot", "missed", "skip"],
        "Missing one slot doesn't break anything. Set the next slot as your fresh start.",
    ),
    (
        &["focus", "distracted", "procrastinat"],
        "Try a two-minute start: do only the first step, then decide whether to continue.",
    ),
    (
        &["motivat", "bored", "why"],
        "Remind yourself what this habit gives you. Writing one line about it can help.",
    ),
    (
        &["done", "did it", "finished", "success"],
        "Nice work! Record it now so your streak reflects it.",
    ),
];

const DEFAULT_REPLY: &str =
    "Thanks for sharing. What is one small step you can take toward your next habit slot?";

#[derive(Debug, Default, Clone, Copy)]
pub struct ScriptedCoach;

impl ScriptedCoach {
    pub fn new() -> Self {
        Self
    }

    pub fn answer(user_input: &str) -> &'static str {
        let lowered = user_input.to_lowercase();
        SCRIPT
            .iter()
            .find(|(keywords, _)| keywords.iter().any(|k| lowered.contains(k)))
            .map(|(_, reply)| *reply)
            .unwrap_or(DEFAULT_REPLY)
    }
}

#[async_trait]
impl CoachClient for ScriptedCoach {
    async fn ask(&self, user_input: &str) -> Result<Value, CoachError> {
        Ok(json!({ "text": Self::answer(user_input) }))
    }
}
