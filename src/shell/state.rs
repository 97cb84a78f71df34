use crate::modules::coach::use_cases::send_message::handler::SendMessageHandler;
use crate::modules::habits::core::ports::HabitStore;
use crate::modules::habits::use_cases::habit_history::handler::HabitHistoryHandler;
use crate::modules::habits::use_cases::manage_habit::handler::ManageHabitHandler;
use crate::modules::habits::use_cases::reconciler::HabitsReconciler;
use crate::modules::habits::use_cases::record_outcome::handler::RecordOutcomeHandler;
use crate::modules::habits::use_cases::select_habit::handler::SelectHabitHandler;
use crate::modules::habits::use_cases::undo_record::handler::UndoRecordHandler;
use crate::modules::notifications::use_cases::toggle_push::handler::TogglePushHandler;
use crate::shared::infrastructure::change_feed::ChangeFeed;
use std::sync::Arc;

pub type Reconciler = HabitsReconciler<dyn HabitStore>;

#[derive(Clone)]
pub struct AppState {
    pub habits: Arc<Reconciler>,
    pub record_outcome: Arc<RecordOutcomeHandler<dyn HabitStore>>,
    pub undo_record: Arc<UndoRecordHandler<dyn HabitStore>>,
    pub manage_habit: Arc<ManageHabitHandler<dyn HabitStore>>,
    pub select_habit: Arc<SelectHabitHandler<dyn HabitStore>>,
    pub habit_history: Arc<HabitHistoryHandler<dyn HabitStore>>,
    pub send_message: Arc<SendMessageHandler>,
    pub toggle_push: Arc<TogglePushHandler>,
    pub changes: Arc<ChangeFeed>,
}

impl AppState {
    /// Wires every habits use case onto the one shared reconciler.
    pub fn new(
        habits: Arc<Reconciler>,
        send_message: Arc<SendMessageHandler>,
        toggle_push: Arc<TogglePushHandler>,
        changes: Arc<ChangeFeed>,
    ) -> Self {
        Self {
            record_outcome: Arc::new(RecordOutcomeHandler::new(habits.clone())),
            undo_record: Arc::new(UndoRecordHandler::new(habits.clone())),
            manage_habit: Arc::new(ManageHabitHandler::new(habits.clone())),
            select_habit: Arc::new(SelectHabitHandler::new(habits.clone())),
            habit_history: Arc::new(HabitHistoryHandler::new(habits.clone())),
            habits,
            send_message,
            toggle_push,
            changes,
        }
    }
}
