use crate::modules::habits::core::decision::{DecideError, Decision};
use crate::modules::habits::core::events::HabitEvent;
use crate::modules::habits::core::habit::HabitId;
use crate::modules::habits::core::state::HabitsState;

/// Which pointer into the habit list a command moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Selected,
    Editing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeFocus {
    pub focus: Focus,
    pub habit_id: Option<HabitId>,
}

pub fn decide_focus(state: &HabitsState, command: ChangeFocus) -> Decision {
    if let Some(habit_id) = command.habit_id
        && state.habit(habit_id).is_none()
    {
        return Decision::Rejected {
            reason: DecideError::HabitNotFound(habit_id),
        };
    }
    let habit_id = command.habit_id;
    let event = match command.focus {
        Focus::Selected => HabitEvent::SelectionChanged { habit_id },
        Focus::Editing => HabitEvent::EditingChanged { habit_id },
    };
    Decision::Accepted {
        events: vec![event],
        intents: vec![],
    }
}
