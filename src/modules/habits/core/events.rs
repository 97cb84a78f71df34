// Facts applied to HabitsState. Each one is produced by a decide function or by the
// reconciler when a store call returns.

use crate::modules::habits::core::habit::{Habit, HabitId, HabitRecord, RecordId};
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HabitEvent {
    SnapshotLoaded {
        habits: Vec<Habit>,
        day: NaiveDate,
    },
    LoadFailed {
        message: String,
    },
    RecordSpliced {
        record: HabitRecord,
    },
    RecordConfirmed {
        provisional: RecordId,
        record: HabitRecord,
    },
    RecordDiscarded {
        provisional: RecordId,
    },
    RecordRemoved {
        record_id: RecordId,
    },
    RecordDeleteSettled {
        record_id: RecordId,
    },
    TodayRecordsCleared {
        habit_id: HabitId,
    },
    SelectionChanged {
        habit_id: Option<HabitId>,
    },
    EditingChanged {
        habit_id: Option<HabitId>,
    },
    NoticeRaised {
        message: String,
    },
    NoticeDismissed {
        id: u64,
    },
}
