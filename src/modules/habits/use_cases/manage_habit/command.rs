use crate::modules::habits::core::habit::{HabitDraft, HabitId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManageHabit {
    Create { draft: HabitDraft },
    Update { habit_id: HabitId, draft: HabitDraft },
    Delete { habit_id: HabitId },
}
