use crate::modules::habits::core::decision::{DecideError, Decision};
use crate::modules::habits::core::evaluate::evaluate;
use crate::modules::habits::core::events::HabitEvent;
use crate::modules::habits::core::habit::HabitRecord;
use crate::modules::habits::core::intents::HabitIntent;
use crate::modules::habits::core::ports::NewRecord;
use crate::modules::habits::core::state::HabitsState;
use crate::modules::habits::use_cases::record_outcome::command::RecordOutcome;
use chrono::{DateTime, Datelike, FixedOffset, Utc};

/// Splices a provisional record into the habit and asks for the insert.
/// Without an explicit slot the record answers whichever slot is actionable now.
pub fn decide_record(
    state: &HabitsState,
    command: RecordOutcome,
    now: &DateTime<FixedOffset>,
) -> Decision {
    let reject = |reason| Decision::Rejected { reason };

    let Some(habit) = state.habit(command.habit_id) else {
        return reject(DecideError::HabitNotFound(command.habit_id));
    };
    if !habit.active {
        return reject(DecideError::HabitInactive(habit.id));
    }
    if !habit.schedule.runs_on(now.weekday()) {
        return reject(DecideError::NotScheduledToday(habit.id));
    }

    let target_slot = match command.target_slot {
        Some(slot) if !habit.schedule.slots.contains(&slot) => {
            return reject(DecideError::UnknownSlot(slot));
        }
        Some(slot) => Some(slot),
        None => evaluate(habit, now).state.actionable_slot(),
    };
    if let Some(slot) = target_slot {
        let taken = habit
            .today_records
            .iter()
            .any(|r| r.target_slot == Some(slot) && r.is_on_local_day_of(now));
        if taken {
            return reject(DecideError::SlotAlreadyRecorded(slot));
        }
    }

    let record = HabitRecord {
        id: command.record_id,
        user_id: command.user_id,
        habit_id: habit.id,
        success: command.success,
        created_at: now.with_timezone(&Utc),
        target_slot,
    };
    let insert = NewRecord {
        user_id: record.user_id.clone(),
        habit_id: record.habit_id,
        success: record.success,
        created_at: record.created_at,
        target_slot,
    };
    Decision::Accepted {
        intents: vec![HabitIntent::InsertRecord {
            provisional: record.id,
            record: insert,
        }],
        events: vec![HabitEvent::RecordSpliced { record }],
    }
}
