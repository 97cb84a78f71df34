use crate::modules::habits::core::events::HabitEvent;
use crate::modules::habits::core::habit::HabitRecord;
use crate::modules::habits::core::ports::HabitStore;
use crate::modules::habits::use_cases::errors::ApplicationError;
use crate::modules::habits::use_cases::reconciler::HabitsReconciler;
use crate::modules::habits::use_cases::record_outcome::command::RecordOutcome;
use crate::modules::habits::use_cases::record_outcome::decide::decide_record;
use std::sync::Arc;

pub struct RecordOutcomeHandler<TStore>
where
    TStore: HabitStore + ?Sized,
{
    reconciler: Arc<HabitsReconciler<TStore>>,
}

impl<TStore> RecordOutcomeHandler<TStore>
where
    TStore: HabitStore + ?Sized,
{
    pub fn new(reconciler: Arc<HabitsReconciler<TStore>>) -> Self {
        Self { reconciler }
    }

    /// Records optimistically, then returns the record as the store saved it.
    /// On failure the splice is rolled back and habits are re-fetched.
    pub async fn handle(&self, command: RecordOutcome) -> Result<HabitRecord, ApplicationError> {
        let provisional = command.record_id;
        let intents = self
            .reconciler
            .decide_and_commit(|state, now| decide_record(state, command, now))
            .await?;
        let report = self.reconciler.execute(intents).await;
        if let Some(err) = report.error {
            return Err(ApplicationError::Store(err));
        }
        report
            .events
            .into_iter()
            .find_map(|event| match event {
                HabitEvent::RecordConfirmed {
                    provisional: p,
                    record,
                } if p == provisional => Some(record),
                _ => None,
            })
            .ok_or_else(|| ApplicationError::NotLoaded("record was not confirmed".into()))
    }
}
