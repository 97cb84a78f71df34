use crate::modules::habits::core::decision::DecideError;
use crate::modules::habits::core::habit::{HabitId, HabitRecord, RecordId};
use crate::modules::habits::core::ports::{HabitStore, bounded};
use crate::modules::habits::core::schedule::weekday_label;
use crate::modules::habits::use_cases::errors::ApplicationError;
use crate::modules::habits::use_cases::reconciler::HabitsReconciler;
use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde::Serialize;
use std::sync::Arc;

pub const DEFAULT_HISTORY_LIMIT: usize = 10;
pub const MAX_HISTORY_LIMIT: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub record_id: RecordId,
    pub success: bool,
    pub created_at: DateTime<Utc>,
    pub date_label: String,
    pub time_label: String,
}

impl HistoryEntry {
    /// Dates read "10/19 (Mon)". Times show the answered slot when the record has
    /// one, else the local time it was logged.
    pub fn from_record<Tz>(record: HabitRecord, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let local = record.created_at.with_timezone(tz);
        let date_label = format!(
            "{}/{} ({})",
            local.month(),
            local.day(),
            weekday_label(local.weekday())
        );
        let time_label = match record.target_slot {
            Some(slot) => slot.to_string(),
            None => local.format("%H:%M").to_string(),
        };
        Self {
            record_id: record.id,
            success: record.success,
            created_at: record.created_at,
            date_label,
            time_label,
        }
    }
}

pub struct HabitHistoryHandler<TStore>
where
    TStore: HabitStore + ?Sized,
{
    reconciler: Arc<HabitsReconciler<TStore>>,
}

impl<TStore> HabitHistoryHandler<TStore>
where
    TStore: HabitStore + ?Sized,
{
    pub fn new(reconciler: Arc<HabitsReconciler<TStore>>) -> Self {
        Self { reconciler }
    }

    /// The latest records of one habit, newest first.
    pub async fn handle(
        &self,
        habit_id: HabitId,
        limit: Option<usize>,
    ) -> Result<Vec<HistoryEntry>, ApplicationError> {
        if self.reconciler.snapshot().await.habit(habit_id).is_none() {
            return Err(DecideError::HabitNotFound(habit_id).into());
        }
        let limit = limit
            .unwrap_or(DEFAULT_HISTORY_LIMIT)
            .clamp(1, MAX_HISTORY_LIMIT);
        let records = bounded(
            self.reconciler.request_timeout(),
            self.reconciler.store().recent_records(habit_id, limit),
        )
        .await?;
        let tz = self.reconciler.now().timezone();
        Ok(records
            .into_iter()
            .map(|record| HistoryEntry::from_record(record, &tz))
            .collect())
    }
}

#[cfg(test)]
mod habit_history_handler_tests {
    use super::*;
    use crate::modules::habits::adapters::outbound::in_memory_store::InMemoryHabitStore;
    use crate::modules::habits::core::ports::StoreError;
    use crate::tests::fixtures::clock::FixedClock;
    use crate::tests::fixtures::habits::{HabitBuilder, RecordBuilder, USER_ID, local_at, seoul};
    use rstest::{fixture, rstest};
    use std::time::Duration;

    type BeforeEachReturn = (
        Arc<InMemoryHabitStore>,
        HabitHistoryHandler<InMemoryHabitStore>,
    );

    #[fixture]
    async fn before_each() -> BeforeEachReturn {
        let store = Arc::new(InMemoryHabitStore::new());
        store
            .insert_habit(USER_ID, &HabitBuilder::new(0).draft())
            .await
            .unwrap();
        for day in 1..=12 {
            store
                .seed_record(
                    RecordBuilder::new(1)
                        .id(i64::from(day))
                        .logged_at(local_at(2026, 10, day, 7, 15))
                        .build(),
                )
                .await;
        }
        let clock = Arc::new(FixedClock::at(local_at(2026, 10, 19, 12, 0)));
        let reconciler = Arc::new(HabitsReconciler::new(
            USER_ID,
            store.clone(),
            clock,
            Duration::from_millis(200),
        ));
        reconciler.refresh().await.unwrap();
        (store, HabitHistoryHandler::new(reconciler))
    }

    #[rstest]
    fn it_should_label_records_for_display() {
        let labelled = RecordBuilder::new(1)
            .logged_at(local_at(2026, 10, 19, 9, 40))
            .slot("09:00")
            .build();
        let unlabelled = RecordBuilder::new(1)
            .logged_at(local_at(2026, 10, 18, 22, 5))
            .failed()
            .build();

        let entry = HistoryEntry::from_record(labelled, &seoul());
        assert_eq!(entry.date_label, "10/19 (Mon)");
        assert_eq!(entry.time_label, "09:00");

        let entry = HistoryEntry::from_record(unlabelled, &seoul());
        assert_eq!(entry.date_label, "10/18 (Sun)");
        assert_eq!(entry.time_label, "22:05");
        assert!(!entry.success);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_return_the_latest_ten_by_default(#[future] before_each: BeforeEachReturn) {
        let (_store, handler) = before_each.await;
        let history = handler.handle(1, None).await.expect("history failed");
        assert_eq!(history.len(), 10);
        assert_eq!(history[0].record_id, RecordId::Persisted(12));
        assert_eq!(history[0].date_label, "10/12 (Mon)");
        assert_eq!(history[9].record_id, RecordId::Persisted(3));
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_honour_an_explicit_limit(#[future] before_each: BeforeEachReturn) {
        let (_store, handler) = before_each.await;
        assert_eq!(handler.handle(1, Some(3)).await.unwrap().len(), 3);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_reject_unknown_habits(#[future] before_each: BeforeEachReturn) {
        let (_store, handler) = before_each.await;
        assert!(matches!(
            handler.handle(42, None).await,
            Err(ApplicationError::Domain(DecideError::HabitNotFound(42)))
        ));
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_surface_store_failures(#[future] before_each: BeforeEachReturn) {
        let (store, handler) = before_each.await;
        store.toggle_offline();
        assert!(matches!(
            handler.handle(1, None).await,
            Err(ApplicationError::Store(StoreError::Backend(_)))
        ));
    }
}
