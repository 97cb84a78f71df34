use crate::modules::habits::core::habit::HabitId;
use crate::modules::habits::core::ports::HabitStore;
use crate::modules::habits::use_cases::errors::ApplicationError;
use crate::modules::habits::use_cases::manage_habit::command::ManageHabit;
use crate::modules::habits::use_cases::manage_habit::decide::decide_manage;
use crate::modules::habits::use_cases::reconciler::HabitsReconciler;
use std::sync::Arc;

pub struct ManageHabitHandler<TStore>
where
    TStore: HabitStore + ?Sized,
{
    reconciler: Arc<HabitsReconciler<TStore>>,
}

impl<TStore> ManageHabitHandler<TStore>
where
    TStore: HabitStore + ?Sized,
{
    pub fn new(reconciler: Arc<HabitsReconciler<TStore>>) -> Self {
        Self { reconciler }
    }

    /// Returns the id of the created habit for `Create`, `None` otherwise.
    pub async fn handle(&self, command: ManageHabit) -> Result<Option<HabitId>, ApplicationError> {
        let intents = self
            .reconciler
            .decide_and_commit(|state, now| decide_manage(state, command, now))
            .await?;
        let report = self.reconciler.execute(intents).await;
        match report.error {
            Some(err) => Err(ApplicationError::Store(err)),
            None => Ok(report.created_habit),
        }
    }
}
