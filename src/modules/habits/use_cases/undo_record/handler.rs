use crate::modules::habits::core::ports::HabitStore;
use crate::modules::habits::use_cases::errors::ApplicationError;
use crate::modules::habits::use_cases::reconciler::HabitsReconciler;
use crate::modules::habits::use_cases::undo_record::command::UndoRecord;
use crate::modules::habits::use_cases::undo_record::decide::decide_undo;
use std::sync::Arc;

pub struct UndoRecordHandler<TStore>
where
    TStore: HabitStore + ?Sized,
{
    reconciler: Arc<HabitsReconciler<TStore>>,
}

impl<TStore> UndoRecordHandler<TStore>
where
    TStore: HabitStore + ?Sized,
{
    pub fn new(reconciler: Arc<HabitsReconciler<TStore>>) -> Self {
        Self { reconciler }
    }

    pub async fn handle(&self, command: UndoRecord) -> Result<(), ApplicationError> {
        let intents = self
            .reconciler
            .decide_and_commit(|state, _| decide_undo(state, command))
            .await?;
        match self.reconciler.execute(intents).await.error {
            Some(err) => Err(ApplicationError::Store(err)),
            None => Ok(()),
        }
    }
}
