// Habit create, update and delete.
//
// Notes
// - A schedule change clears today's records of that habit before the update is
//   written: they answered slots that no longer exist.
// - Every accepted mutation ends with a re-fetch; the store is the source of truth
//   for habit rows.

use crate::modules::habits::core::decision::{DecideError, Decision};
use crate::modules::habits::core::events::HabitEvent;
use crate::modules::habits::core::habit::HabitDraft;
use crate::modules::habits::core::intents::HabitIntent;
use crate::modules::habits::core::state::HabitsState;
use crate::modules::habits::use_cases::manage_habit::command::ManageHabit;
use crate::shared::core::clock::start_of_local_day;
use chrono::{DateTime, FixedOffset};

fn validated(draft: HabitDraft) -> Result<HabitDraft, DecideError> {
    let draft = draft.normalized();
    if draft.name.is_empty() {
        return Err(DecideError::EmptyName);
    }
    Ok(draft)
}

pub fn decide_manage(
    state: &HabitsState,
    command: ManageHabit,
    now: &DateTime<FixedOffset>,
) -> Decision {
    match command {
        ManageHabit::Create { draft } => match validated(draft) {
            Ok(draft) => Decision::Accepted {
                events: vec![],
                intents: vec![HabitIntent::InsertHabit { draft }, HabitIntent::Refetch],
            },
            Err(reason) => Decision::Rejected { reason },
        },
        ManageHabit::Update { habit_id, draft } => {
            let Some(habit) = state.habit(habit_id) else {
                return Decision::Rejected {
                    reason: DecideError::HabitNotFound(habit_id),
                };
            };
            let draft = match validated(draft) {
                Ok(draft) => draft,
                Err(reason) => return Decision::Rejected { reason },
            };
            let mut events = vec![];
            let mut intents = vec![];
            if draft.schedule.differs_from(&habit.schedule) {
                events.push(HabitEvent::TodayRecordsCleared { habit_id });
                intents.push(HabitIntent::ClearTodayRecords {
                    habit_id,
                    since: start_of_local_day(now),
                });
            }
            intents.push(HabitIntent::UpdateHabit { habit_id, draft });
            intents.push(HabitIntent::Refetch);
            Decision::Accepted { events, intents }
        }
        ManageHabit::Delete { habit_id } => {
            if state.habit(habit_id).is_none() {
                return Decision::Rejected {
                    reason: DecideError::HabitNotFound(habit_id),
                };
            }
            let mut events = vec![];
            if state.selected == Some(habit_id) {
                events.push(HabitEvent::SelectionChanged { habit_id: None });
            }
            if state.editing == Some(habit_id) {
                events.push(HabitEvent::EditingChanged { habit_id: None });
            }
            Decision::Accepted {
                events,
                intents: vec![HabitIntent::DeleteHabit { habit_id }, HabitIntent::Refetch],
            }
        }
    }
}
