use crate::modules::habits::core::ports::HabitStore;
use crate::modules::habits::use_cases::errors::ApplicationError;
use crate::modules::habits::use_cases::reconciler::HabitsReconciler;
use crate::modules::habits::use_cases::select_habit::decide::{ChangeFocus, decide_focus};
use std::sync::Arc;

pub struct SelectHabitHandler<TStore>
where
    TStore: HabitStore + ?Sized,
{
    reconciler: Arc<HabitsReconciler<TStore>>,
}

impl<TStore> SelectHabitHandler<TStore>
where
    TStore: HabitStore + ?Sized,
{
    pub fn new(reconciler: Arc<HabitsReconciler<TStore>>) -> Self {
        Self { reconciler }
    }

    pub async fn handle(&self, command: ChangeFocus) -> Result<(), ApplicationError> {
        self.reconciler
            .decide_and_commit(|state, _| decide_focus(state, command))
            .await?;
        Ok(())
    }
}
