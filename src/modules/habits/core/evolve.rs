use crate::modules::habits::core::events::HabitEvent;
use crate::modules::habits::core::state::{HabitsState, LoadStatus, Notice};

pub fn evolve(mut state: HabitsState, event: HabitEvent) -> HabitsState {
    match event {
        HabitEvent::SnapshotLoaded { habits, day } => {
            state.habits = habits;
            for habit in state.habits.iter_mut() {
                habit
                    .today_records
                    .retain(|r| !state.pending_deletes.contains(&r.id));
            }
            // An insert that already reached the store shows up in the snapshot
            // before its confirmation; the saved row stands in for it.
            for pending in &state.pending_inserts {
                if let Some(habit) = state.habits.iter_mut().find(|h| h.id == pending.habit_id) {
                    let saved = habit.today_records.iter().any(|r| r.is_saved_copy_of(pending));
                    if !saved && !habit.has_record(&pending.id) {
                        habit.today_records.push(pending.clone());
                    }
                }
            }
            if state.selected.is_some_and(|id| state.habit(id).is_none()) {
                state.selected = None;
            }
            if state.editing.is_some_and(|id| state.habit(id).is_none()) {
                state.editing = None;
            }
            state.load_status = LoadStatus::Ready;
            state.loaded_day = Some(day);
            state
        }
        HabitEvent::LoadFailed { message } => {
            state.load_status = LoadStatus::Failed { message };
            state
        }
        HabitEvent::RecordSpliced { record } => {
            if let Some(habit) = state.habit_mut(record.habit_id) {
                habit.today_records.push(record.clone());
            }
            state.pending_inserts.push(record);
            state
        }
        HabitEvent::RecordConfirmed {
            provisional,
            record,
        } => {
            // Cleared by a schedule change while the insert was in flight.
            if !state.is_pending(&provisional) {
                return state;
            }
            state.pending_inserts.retain(|r| r.id != provisional);
            if let Some(habit) = state.habit_mut(record.habit_id) {
                habit.today_records.retain(|r| r.id != provisional);
                if !habit.has_record(&record.id) {
                    habit.today_records.push(record);
                }
            }
            state
        }
        HabitEvent::RecordDiscarded { provisional } => {
            state.pending_inserts.retain(|r| r.id != provisional);
            for habit in state.habits.iter_mut() {
                habit.today_records.retain(|r| r.id != provisional);
            }
            state
        }
        HabitEvent::RecordRemoved { record_id } => {
            for habit in state.habits.iter_mut() {
                habit.today_records.retain(|r| r.id != record_id);
            }
            if !state.pending_deletes.contains(&record_id) {
                state.pending_deletes.push(record_id);
            }
            state
        }
        HabitEvent::RecordDeleteSettled { record_id } => {
            state.pending_deletes.retain(|id| *id != record_id);
            state
        }
        HabitEvent::TodayRecordsCleared { habit_id } => {
            state.pending_inserts.retain(|r| r.habit_id != habit_id);
            if let Some(habit) = state.habit_mut(habit_id) {
                habit.today_records.clear();
            }
            state
        }
        HabitEvent::SelectionChanged { habit_id } => {
            state.selected = habit_id;
            state
        }
        HabitEvent::EditingChanged { habit_id } => {
            state.editing = habit_id;
            state
        }
        HabitEvent::NoticeRaised { message } => {
            state.next_notice_id += 1;
            state.notices.push(Notice {
                id: state.next_notice_id,
                message,
            });
            state
        }
        HabitEvent::NoticeDismissed { id } => {
            state.notices.retain(|n| n.id != id);
            state
        }
    }
}
