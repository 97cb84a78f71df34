// Push subscription descriptor as a browser push manager hands it out.

use crate::modules::notifications::core::ports::PushError;
use serde::{Deserialize, Serialize};

const PLACEHOLDER_KEY_MARKER: &str = "YOUR_VAPID";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushKeys {
    pub p256dh: String,
    pub auth: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushSubscription {
    pub endpoint: String,
    #[serde(default)]
    pub expiration_time: Option<i64>,
    pub keys: PushKeys,
}

impl PushSubscription {
    pub fn validate(&self) -> Result<(), PushError> {
        if !self.endpoint.starts_with("https://") {
            return Err(PushError::InvalidSubscription(
                "endpoint must be an https url".into(),
            ));
        }
        if self.keys.p256dh.trim().is_empty() || self.keys.auth.trim().is_empty() {
            return Err(PushError::InvalidSubscription("missing keys".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Granted,
    Denied,
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PushStatus {
    pub enabled: bool,
    pub configured: bool,
    pub vapid_public_key: Option<String>,
}

/// A key that is missing, blank or still the template placeholder cannot sign pushes.
pub fn vapid_key_is_configured(key: Option<&str>) -> bool {
    key.map(str::trim)
        .is_some_and(|k| !k.is_empty() && !k.contains(PLACEHOLDER_KEY_MARKER))
}
