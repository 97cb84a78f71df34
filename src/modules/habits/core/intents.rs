use crate::modules::habits::core::habit::{HabitDraft, HabitId, RecordId};
use crate::modules::habits::core::ports::NewRecord;
use chrono::{DateTime, Utc};

/// Side effects produced by a decider as part of an Accepted decision.
/// The outbound intent_dispatch adapter executes them against the store in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HabitIntent {
    InsertRecord {
        provisional: RecordId,
        record: NewRecord,
    },
    DeleteRecord {
        record_id: i64,
    },
    InsertHabit {
        draft: HabitDraft,
    },
    UpdateHabit {
        habit_id: HabitId,
        draft: HabitDraft,
    },
    DeleteHabit {
        habit_id: HabitId,
    },
    ClearTodayRecords {
        habit_id: HabitId,
        since: DateTime<Utc>,
    },
    Refetch,
}
