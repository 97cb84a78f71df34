// HabitsState is the single owned copy of everything the habit screens show.
//
// Notes
// - Selection and editing are ids into `habits`, so the list and the detail view
//   always read the same copy.
// - `pending_inserts` keeps optimistic records until the store confirms or rejects
//   them. `pending_deletes` keeps undone ids until the delete settles. Both survive
//   a re-fetch.

use crate::modules::habits::core::habit::{Habit, HabitId, HabitRecord, RecordId};
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LoadStatus {
    #[default]
    Loading,
    Ready,
    Failed {
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub id: u64,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HabitsState {
    pub habits: Vec<Habit>,
    pub load_status: LoadStatus,
    pub loaded_day: Option<NaiveDate>,
    pub selected: Option<HabitId>,
    pub editing: Option<HabitId>,
    pub pending_inserts: Vec<HabitRecord>,
    pub pending_deletes: Vec<RecordId>,
    pub notices: Vec<Notice>,
    pub next_notice_id: u64,
}

impl HabitsState {
    pub fn habit(&self, habit_id: HabitId) -> Option<&Habit> {
        self.habits.iter().find(|h| h.id == habit_id)
    }

    pub(crate) fn habit_mut(&mut self, habit_id: HabitId) -> Option<&mut Habit> {
        self.habits.iter_mut().find(|h| h.id == habit_id)
    }

    pub fn selected_habit(&self) -> Option<&Habit> {
        self.selected.and_then(|id| self.habit(id))
    }

    pub fn editing_habit(&self) -> Option<&Habit> {
        self.editing.and_then(|id| self.habit(id))
    }

    pub fn find_record(&self, record_id: &RecordId) -> Option<&HabitRecord> {
        self.habits.iter().find_map(|h| h.record(record_id))
    }

    pub fn is_pending(&self, record_id: &RecordId) -> bool {
        self.pending_inserts.iter().any(|r| &r.id == record_id)
    }
}
