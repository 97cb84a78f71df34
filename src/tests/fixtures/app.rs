// AppState wired over in-memory adapters for handler and e2e tests.

use crate::modules::coach::adapters::outbound::scripted_coach::ScriptedCoach;
use crate::modules::coach::use_cases::send_message::handler::SendMessageHandler;
use crate::modules::habits::adapters::outbound::in_memory_store::InMemoryHabitStore;
use crate::modules::habits::core::habit::{HabitDraft, HabitId};
use crate::modules::habits::core::ports::HabitStore;
use crate::modules::habits::use_cases::reconciler::HabitsReconciler;
use crate::modules::notifications::adapters::outbound::in_memory_registry::InMemoryPushRegistry;
use crate::modules::notifications::use_cases::toggle_push::handler::TogglePushHandler;
use crate::shared::infrastructure::change_feed::ChangeFeed;
use crate::shell::state::AppState;
use crate::tests::fixtures::clock::FixedClock;
use crate::tests::fixtures::habits::{USER_ID, local_at};
use chrono::{DateTime, FixedOffset};
use std::sync::Arc;
use std::time::Duration;

pub const TEST_VAPID_KEY: &str = "BEl62iUYgUivxIkv69yViEuiBIa-Ib9-SkvMeAtA3LFgDzkrxZJjSgSnfckjBJuBkr3qBUYIHBQFLXYp5Nksh8U";
pub const TEST_TIMEOUT: Duration = Duration::from_millis(200);

pub struct TestApp {
    pub state: AppState,
    pub store: Arc<InMemoryHabitStore>,
    pub registry: Arc<InMemoryPushRegistry>,
    pub clock: Arc<FixedClock>,
}

#[allow(dead_code)]
impl TestApp {
    /// Monday 2026-10-19 08:30 in +09:00.
    pub fn new() -> Self {
        Self::at(local_at(2026, 10, 19, 8, 30))
    }

    pub fn at(now: DateTime<FixedOffset>) -> Self {
        let changes = Arc::new(ChangeFeed::new());
        let store = Arc::new(InMemoryHabitStore::with_change_feed(changes.clone()));
        let registry = Arc::new(InMemoryPushRegistry::new());
        let clock = Arc::new(FixedClock::at(now));

        let dyn_store: Arc<dyn HabitStore> = store.clone();
        let habits = Arc::new(HabitsReconciler::new(
            USER_ID,
            dyn_store,
            clock.clone(),
            TEST_TIMEOUT,
        ));
        let send_message = Arc::new(SendMessageHandler::new(
            Arc::new(ScriptedCoach::new()),
            clock.clone(),
            TEST_TIMEOUT,
        ));
        let toggle_push = Arc::new(TogglePushHandler::new(
            registry.clone(),
            USER_ID,
            Some(TEST_VAPID_KEY.to_string()),
            TEST_TIMEOUT,
        ));

        Self {
            state: AppState::new(habits, send_message, toggle_push, changes),
            store,
            registry,
            clock,
        }
    }

    /// Inserts a habit straight into the store and re-fetches.
    pub async fn seed_habit(&self, draft: HabitDraft) -> HabitId {
        let row = self.store.insert_habit(USER_ID, &draft).await.unwrap();
        self.refresh().await;
        row.id
    }

    pub async fn refresh(&self) {
        self.state.habits.refresh().await.unwrap();
    }
}
