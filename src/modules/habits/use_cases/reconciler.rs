// HabitsReconciler owns the habit state and keeps it in step with the store.
//
// Purpose
// - Apply decisions optimistically, run their intents against the store and fold
//   the results back in, re-fetching whenever ground truth is needed.
//
// Responsibilities
// - One write lock per batch: a decision's events are applied together, so the
//   list and the selected habit never show different copies.
// - Publish a freshly evaluated Board after every batch and every tick.
// - Serialize re-fetches so an older snapshot never lands after a newer one.
//
// Boundaries
// - No HTTP here. Use case handlers call into the reconciler.

use crate::modules::habits::adapters::outbound::intent_dispatch::{
    DispatchReport, dispatch_intents,
};
use crate::modules::habits::core::board::{Board, build_board};
use crate::modules::habits::core::decision::{DecideError, Decision};
use crate::modules::habits::core::events::HabitEvent;
use crate::modules::habits::core::evolve::evolve;
use crate::modules::habits::core::habit::{HabitId, HabitRecord};
use crate::modules::habits::core::intents::HabitIntent;
use crate::modules::habits::core::ports::{
    HABITS_TABLE, HabitStore, RECORDS_TABLE, StoreError, bounded,
};
use crate::modules::habits::core::state::HabitsState;
use crate::shared::core::clock::{Clock, start_of_local_day};
use crate::shared::infrastructure::change_feed::ChangeEvent;
use chrono::{DateTime, FixedOffset};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock, watch};
use tracing::{debug, error, info};

pub struct HabitsReconciler<TStore>
where
    TStore: HabitStore + ?Sized,
{
    user_id: String,
    store: Arc<TStore>,
    clock: Arc<dyn Clock>,
    request_timeout: Duration,
    state: RwLock<HabitsState>,
    refresh_gate: Mutex<()>,
    board: watch::Sender<Board>,
}

impl<TStore> HabitsReconciler<TStore>
where
    TStore: HabitStore + ?Sized,
{
    pub fn new(
        user_id: impl Into<String>,
        store: Arc<TStore>,
        clock: Arc<dyn Clock>,
        request_timeout: Duration,
    ) -> Self {
        let state = HabitsState::default();
        let (board, _) = watch::channel(build_board(&state, &clock.now()));
        Self {
            user_id: user_id.into(),
            store,
            clock,
            request_timeout,
            state: RwLock::new(state),
            refresh_gate: Mutex::new(()),
            board,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn now(&self) -> DateTime<FixedOffset> {
        self.clock.now()
    }

    pub fn store(&self) -> &TStore {
        &self.store
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub async fn snapshot(&self) -> HabitsState {
        self.state.read().await.clone()
    }

    pub fn board(&self) -> Board {
        self.board.borrow().clone()
    }

    pub fn subscribe_board(&self) -> watch::Receiver<Board> {
        self.board.subscribe()
    }

    /// Runs `decide` against the current state and applies its events in one batch.
    /// Returns the intents the caller must execute.
    pub async fn decide_and_commit<F>(&self, decide: F) -> Result<Vec<HabitIntent>, DecideError>
    where
        F: FnOnce(&HabitsState, &DateTime<FixedOffset>) -> Decision,
    {
        let now = self.clock.now();
        let mut state = self.state.write().await;
        match decide(&state, &now) {
            Decision::Accepted { events, intents } => {
                let next = events.into_iter().fold(state.clone(), evolve);
                *state = next;
                self.publish(&state, &now);
                Ok(intents)
            }
            Decision::Rejected { reason } => {
                debug!(%reason, "decision rejected");
                Err(reason)
            }
        }
    }

    pub async fn commit(&self, events: Vec<HabitEvent>) {
        if events.is_empty() {
            return;
        }
        let now = self.clock.now();
        let mut state = self.state.write().await;
        let next = events.into_iter().fold(state.clone(), evolve);
        *state = next;
        self.publish(&state, &now);
    }

    /// Executes intents, commits their follow-up events and re-fetches when asked to.
    pub async fn execute(&self, intents: Vec<HabitIntent>) -> DispatchReport {
        let report =
            dispatch_intents(&*self.store, &self.user_id, self.request_timeout, intents).await;
        self.commit(report.events.clone()).await;
        if report.refetch {
            // A failed re-fetch is already reflected as LoadFailed.
            let _ = self.refresh().await;
        }
        report
    }

    /// Fetches all habits and today's records and replaces the snapshot.
    pub async fn refresh(&self) -> Result<(), StoreError> {
        let _gate = self.refresh_gate.lock().await;
        let now = self.clock.now();
        let since = start_of_local_day(&now);
        let fetched = tokio::try_join!(
            bounded(self.request_timeout, self.store.list_habits(&self.user_id)),
            bounded(
                self.request_timeout,
                self.store.list_records_since(&self.user_id, since)
            ),
        );
        match fetched {
            Ok((rows, records)) => {
                let mut by_habit: HashMap<HabitId, Vec<HabitRecord>> = HashMap::new();
                for record in records {
                    by_habit.entry(record.habit_id).or_default().push(record);
                }
                let habits = rows
                    .into_iter()
                    .map(|row| {
                        let today = by_habit.remove(&row.id).unwrap_or_default();
                        row.into_habit(today)
                    })
                    .collect::<Vec<_>>();
                info!(habits = habits.len(), "habits loaded");
                self.commit(vec![HabitEvent::SnapshotLoaded {
                    habits,
                    day: now.date_naive(),
                }])
                .await;
                Ok(())
            }
            Err(err) => {
                error!(error = %err, "could not load habits");
                self.commit(vec![HabitEvent::LoadFailed {
                    message: err.to_string(),
                }])
                .await;
                Err(err)
            }
        }
    }

    /// Polling tick: re-fetches after the local day rolls over, otherwise
    /// re-evaluates the board against the current time.
    pub async fn tick(&self) {
        let now = self.clock.now();
        let state = self.state.read().await;
        let stale = state.loaded_day != Some(now.date_naive());
        if stale {
            drop(state);
            debug!("local day changed, re-fetching");
            let _ = self.refresh().await;
        } else {
            self.publish(&state, &now);
        }
    }

    /// Reacts to a store change notification. Returns whether it triggered a re-fetch.
    pub async fn on_change(&self, change: &ChangeEvent) -> bool {
        if change.table != HABITS_TABLE && change.table != RECORDS_TABLE {
            debug!(table = %change.table, "ignoring change on unrelated table");
            return false;
        }
        debug!(table = %change.table, kind = ?change.kind, "store changed, re-fetching");
        let _ = self.refresh().await;
        true
    }

    pub async fn dismiss_notice(&self, id: u64) -> bool {
        let known = self.state.read().await.notices.iter().any(|n| n.id == id);
        if known {
            self.commit(vec![HabitEvent::NoticeDismissed { id }]).await;
        }
        known
    }

    fn publish(&self, state: &HabitsState, now: &DateTime<FixedOffset>) {
        self.board.send_replace(build_board(state, now));
    }
}

#[cfg(test)]
mod habits_reconciler_tests {
    use super::*;
    use crate::modules::habits::adapters::outbound::in_memory_store::InMemoryHabitStore;
    use crate::modules::habits::core::evaluate::DisplayState;
    use crate::modules::habits::core::state::LoadStatus;
    use crate::modules::habits::use_cases::record_outcome::command::RecordOutcome;
    use crate::modules::habits::use_cases::record_outcome::decide::decide_record;
    use crate::shared::infrastructure::change_feed::ChangeKind;
    use crate::tests::fixtures::clock::FixedClock;
    use crate::tests::fixtures::habits::{HabitBuilder, RecordBuilder, USER_ID, local_at, slot};
    use rstest::{fixture, rstest};

    type BeforeEachReturn = (
        Arc<InMemoryHabitStore>,
        Arc<FixedClock>,
        HabitsReconciler<InMemoryHabitStore>,
    );

    #[fixture]
    fn before_each() -> BeforeEachReturn {
        let store = Arc::new(InMemoryHabitStore::new());
        let clock = Arc::new(FixedClock::at(local_at(2026, 10, 19, 8, 30)));
        let reconciler = HabitsReconciler::new(
            USER_ID,
            store.clone(),
            clock.clone(),
            Duration::from_millis(200),
        );
        (store, clock, reconciler)
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_attach_only_todays_records_on_refresh(before_each: BeforeEachReturn) {
        let (store, _clock, reconciler) = before_each;
        let row = store
            .insert_habit(USER_ID, &HabitBuilder::new(0).slots(&["09:00"]).draft())
            .await
            .unwrap();
        store
            .seed_record(
                RecordBuilder::new(row.id)
                    .id(1)
                    .logged_at(local_at(2026, 10, 18, 21, 0))
                    .build(),
            )
            .await;
        store
            .seed_record(
                RecordBuilder::new(row.id)
                    .id(2)
                    .logged_at(local_at(2026, 10, 19, 8, 0))
                    .build(),
            )
            .await;

        reconciler.refresh().await.unwrap();

        let state = reconciler.snapshot().await;
        assert_eq!(state.load_status, LoadStatus::Ready);
        assert_eq!(state.habits[0].today_records.len(), 1);
        assert_eq!(reconciler.board().cards.len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_count_a_record_once_when_a_refetch_beats_its_confirmation(
        before_each: BeforeEachReturn,
    ) {
        let (store, clock, reconciler) = before_each;
        let row = store
            .insert_habit(USER_ID, &HabitBuilder::new(0).slots(&["09:00", "10:30"]).draft())
            .await
            .unwrap();
        reconciler.refresh().await.unwrap();
        clock.set(local_at(2026, 10, 19, 8, 50));

        let intents = reconciler
            .decide_and_commit(|state, now| {
                decide_record(state, RecordOutcome::new(USER_ID, row.id, true, None), now)
            })
            .await
            .unwrap();
        let [HabitIntent::InsertRecord {
            provisional,
            record,
        }] = intents.as_slice()
        else {
            panic!("expected a single insert, got {intents:?}");
        };
        let saved = store.insert_record(record).await.unwrap();
        reconciler.refresh().await.unwrap();

        let card = reconciler.board().card(row.id).unwrap().clone();
        assert_eq!(card.habit.today_records, vec![saved.clone()]);
        assert_eq!(
            card.evaluation.state,
            DisplayState::Countdown {
                slot: slot("10:30"),
                minutes_remaining: 100
            }
        );

        reconciler
            .commit(vec![HabitEvent::RecordConfirmed {
                provisional: *provisional,
                record: saved.clone(),
            }])
            .await;
        let state = reconciler.snapshot().await;
        assert_eq!(state.habits[0].today_records, vec![saved]);
        assert!(state.pending_inserts.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_mark_the_load_failed_when_the_store_is_down(before_each: BeforeEachReturn) {
        let (store, _clock, reconciler) = before_each;
        store.toggle_offline();
        assert!(reconciler.refresh().await.is_err());
        assert!(matches!(
            reconciler.board().load_status,
            LoadStatus::Failed { .. }
        ));
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_time_out_a_slow_load(before_each: BeforeEachReturn) {
        let (store, _clock, reconciler) = before_each;
        store.set_delay_ms(500);
        assert_eq!(
            reconciler.refresh().await,
            Err(StoreError::Timeout(Duration::from_millis(200)))
        );
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_refetch_when_the_local_day_rolls_over(before_each: BeforeEachReturn) {
        let (store, clock, reconciler) = before_each;
        reconciler.refresh().await.unwrap();
        store
            .insert_habit(USER_ID, &HabitBuilder::new(0).draft())
            .await
            .unwrap();

        reconciler.tick().await;
        assert!(reconciler.snapshot().await.habits.is_empty());

        clock.set(local_at(2026, 10, 20, 0, 1));
        reconciler.tick().await;
        let state = reconciler.snapshot().await;
        assert_eq!(state.habits.len(), 1);
        assert_eq!(state.loaded_day, Some(local_at(2026, 10, 20, 0, 1).date_naive()));
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_republish_the_board_on_a_tick(before_each: BeforeEachReturn) {
        let (_store, clock, reconciler) = before_each;
        reconciler.refresh().await.unwrap();
        let mut boards = reconciler.subscribe_board();
        clock.advance_minutes(5);
        reconciler.tick().await;
        assert!(boards.has_changed().unwrap());
        assert_eq!(
            boards.borrow_and_update().generated_at,
            local_at(2026, 10, 19, 8, 35)
        );
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_only_refetch_for_habit_tables(before_each: BeforeEachReturn) {
        let (_store, _clock, reconciler) = before_each;
        assert!(
            reconciler
                .on_change(&ChangeEvent::new(RECORDS_TABLE, ChangeKind::Insert))
                .await
        );
        assert!(
            !reconciler
                .on_change(&ChangeEvent::new("pushSub", ChangeKind::Update))
                .await
        );
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_dismiss_known_notices_only(before_each: BeforeEachReturn) {
        let (_store, _clock, reconciler) = before_each;
        reconciler
            .commit(vec![HabitEvent::NoticeRaised {
                message: "oops".into(),
            }])
            .await;
        assert!(!reconciler.dismiss_notice(9).await);
        assert!(reconciler.dismiss_notice(1).await);
        assert!(reconciler.board().notices.is_empty());
    }
}
