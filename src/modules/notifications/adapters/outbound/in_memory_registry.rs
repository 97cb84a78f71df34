use crate::modules::notifications::core::ports::{PushError, PushRegistry};
use crate::modules::notifications::core::subscription::PushSubscription;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

struct Entry {
    subscription: PushSubscription,
    active: bool,
}

#[derive(Default)]
pub struct InMemoryPushRegistry {
    entries: RwLock<HashMap<String, Entry>>,
    offline: AtomicBool,
}

impl InMemoryPushRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_offline(&self) {
        self.offline.fetch_xor(true, Ordering::SeqCst);
    }

    pub async fn subscription(&self, user_id: &str) -> Option<PushSubscription> {
        self.entries
            .read()
            .await
            .get(user_id)
            .map(|e| e.subscription.clone())
    }

    fn guard(&self) -> Result<(), PushError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(PushError::Registry("registry offline".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl PushRegistry for InMemoryPushRegistry {
    async fn register(
        &self,
        user_id: &str,
        subscription: &PushSubscription,
    ) -> Result<(), PushError> {
        self.guard()?;
        self.entries.write().await.insert(
            user_id.to_string(),
            Entry {
                subscription: subscription.clone(),
                active: true,
            },
        );
        Ok(())
    }

    async fn deactivate(&self, user_id: &str) -> Result<(), PushError> {
        self.guard()?;
        if let Some(entry) = self.entries.write().await.get_mut(user_id) {
            entry.active = false;
        }
        Ok(())
    }

    async fn is_active(&self, user_id: &str) -> Result<bool, PushError> {
        self.guard()?;
        Ok(self
            .entries
            .read()
            .await
            .get(user_id)
            .is_some_and(|e| e.active))
    }
}
