// Ports for push notification registration.
//
// Boundaries
// - Delivery is somebody else's job. The registry only stores subscriptions and
//   whether they are active.

use crate::modules::notifications::core::subscription::PushSubscription;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PushError {
    #[error("push notifications need a VAPID public key")]
    Misconfigured,

    #[error("notification permission was not granted")]
    PermissionDenied,

    #[error("this device does not support push notifications")]
    Unsupported,

    #[error("invalid push subscription: {0}")]
    InvalidSubscription(String),

    #[error("a push setting change is already in progress")]
    Busy,

    #[error("registry timed out after {0:?}")]
    Timeout(Duration),

    #[error("registry error: {0}")]
    Registry(String),
}

#[async_trait]
pub trait PushRegistry: Send + Sync {
    /// Stores the subscription for the user and marks it active.
    async fn register(&self, user_id: &str, subscription: &PushSubscription)
    -> Result<(), PushError>;

    async fn deactivate(&self, user_id: &str) -> Result<(), PushError>;

    async fn is_active(&self, user_id: &str) -> Result<bool, PushError>;
}
