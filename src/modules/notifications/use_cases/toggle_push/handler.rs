// Push toggle.
//
// Notes
// - After a failed enable the reported state is whatever the registry actually
//   holds, never the state the user asked for.
// - Disabling always ends disabled; a registry failure there is only logged.

use crate::modules::notifications::core::ports::{PushError, PushRegistry};
use crate::modules::notifications::core::subscription::{
    Permission, PushStatus, PushSubscription, vapid_key_is_configured,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnablePush {
    pub permission: Permission,
    pub subscription: Option<PushSubscription>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushFailure {
    pub error: PushError,
    pub status: PushStatus,
}

struct Toggling<'a>(&'a AtomicBool);

impl Drop for Toggling<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct TogglePushHandler {
    registry: Arc<dyn PushRegistry>,
    user_id: String,
    vapid_public_key: Option<String>,
    timeout: Duration,
    toggling: AtomicBool,
}

impl TogglePushHandler {
    pub fn new(
        registry: Arc<dyn PushRegistry>,
        user_id: impl Into<String>,
        vapid_public_key: Option<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            registry,
            user_id: user_id.into(),
            vapid_public_key,
            timeout,
            toggling: AtomicBool::new(false),
        }
    }

    fn configured(&self) -> bool {
        vapid_key_is_configured(self.vapid_public_key.as_deref())
    }

    fn status_with(&self, enabled: bool) -> PushStatus {
        let configured = self.configured();
        PushStatus {
            enabled,
            configured,
            vapid_public_key: self.vapid_public_key.clone().filter(|_| configured),
        }
    }

    async fn bounded<T, F>(&self, call: F) -> Result<T, PushError>
    where
        F: Future<Output = Result<T, PushError>>,
    {
        tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| PushError::Timeout(self.timeout))?
    }

    pub async fn status(&self) -> PushStatus {
        let enabled = match self.bounded(self.registry.is_active(&self.user_id)).await {
            Ok(active) => active,
            Err(err) => {
                warn!(error = %err, "could not read push status");
                false
            }
        };
        self.status_with(enabled)
    }

    pub async fn enable(&self, command: EnablePush) -> Result<PushStatus, PushFailure> {
        if self
            .toggling
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(PushFailure {
                error: PushError::Busy,
                status: self.status().await,
            });
        }
        let _toggling = Toggling(&self.toggling);

        match self.try_enable(command).await {
            Ok(()) => {
                info!(user_id = %self.user_id, "push notifications enabled");
                Ok(self.status_with(true))
            }
            Err(error) => {
                warn!(error = %error, "could not enable push notifications");
                Err(PushFailure {
                    error,
                    status: self.status().await,
                })
            }
        }
    }

    async fn try_enable(&self, command: EnablePush) -> Result<(), PushError> {
        if !self.configured() {
            return Err(PushError::Misconfigured);
        }
        if command.permission != Permission::Granted {
            return Err(PushError::PermissionDenied);
        }
        let subscription = command.subscription.ok_or(PushError::Unsupported)?;
        subscription.validate()?;
        self.bounded(self.registry.register(&self.user_id, &subscription))
            .await
    }

    pub async fn disable(&self) -> Result<PushStatus, PushFailure> {
        if self
            .toggling
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(PushFailure {
                error: PushError::Busy,
                status: self.status().await,
            });
        }
        let _toggling = Toggling(&self.toggling);

        if let Err(err) = self.bounded(self.registry.deactivate(&self.user_id)).await {
            warn!(error = %err, "could not mark push subscription inactive");
        }
        info!(user_id = %self.user_id, "push notifications disabled");
        Ok(self.status_with(false))
    }
}
