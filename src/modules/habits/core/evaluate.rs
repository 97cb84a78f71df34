// Schedule evaluator: derives what a habit card should show right now.
//
// Pure. Given the same habit and instant it always returns the same evaluation,
// so it is safe to re-run on every polling tick.
//
// Windows (minutes, slot - now)
// - >= 60            countdown to that slot
// - -60 ..< 60       awaiting input for that slot
// - < -60            expired, skipped

use crate::modules::habits::core::habit::{Habit, HabitRecord, RecordId};
use crate::modules::habits::core::schedule::SlotTime;
use crate::modules::habits::core::slot_matching::match_slots;
use crate::shared::core::clock::minute_of_day;
use chrono::{DateTime, Datelike, TimeZone};
use serde::Serialize;

pub const COUNTDOWN_THRESHOLD_MINUTES: i64 = 60;
pub const LATE_WINDOW_MINUTES: i64 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DisplayState {
    Disabled,
    Resting,
    AwaitingInput {
        slot: Option<SlotTime>,
    },
    Countdown {
        slot: SlotTime,
        minutes_remaining: i64,
    },
    Completed,
    DayEnded,
}

impl DisplayState {
    pub fn actionable_slot(&self) -> Option<SlotTime> {
        match self {
            DisplayState::AwaitingInput { slot } => *slot,
            DisplayState::Countdown { slot, .. } => Some(*slot),
            _ => None,
        }
    }

    /// Human-readable remaining time for countdowns.
    pub fn message(&self) -> Option<String> {
        match self {
            DisplayState::Countdown {
                minutes_remaining, ..
            } => Some(format_remaining(*minutes_remaining)),
            _ => None,
        }
    }
}

pub fn format_remaining(minutes: i64) -> String {
    let minutes = minutes.max(0);
    if minutes >= 60 {
        format!("{}h {:02}m left", minutes / 60, minutes % 60)
    } else {
        format!("{minutes}m left")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotStatus {
    pub slot: SlotTime,
    pub record_id: Option<RecordId>,
    pub success: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Evaluation {
    #[serde(flatten)]
    pub state: DisplayState,
    pub slots: Vec<SlotStatus>,
}

pub fn evaluate<Tz: TimeZone>(habit: &Habit, now: &DateTime<Tz>) -> Evaluation {
    let tz = now.timezone();
    let today: Vec<&HabitRecord> = habit
        .today_records
        .iter()
        .filter(|record| record.is_on_local_day_of(now))
        .collect();

    let matches = match_slots(&habit.schedule.slots, &today, &tz);
    let slots = matches
        .iter()
        .map(|m| SlotStatus {
            slot: m.slot,
            record_id: m.record.map(|r| r.id),
            success: m.record.map(|r| r.success),
        })
        .collect();

    let state = if !habit.active {
        DisplayState::Disabled
    } else if !habit.schedule.runs_on(now.weekday()) {
        DisplayState::Resting
    } else if !habit.schedule.has_slots() {
        if today.is_empty() {
            DisplayState::AwaitingInput { slot: None }
        } else {
            DisplayState::Completed
        }
    } else {
        let now_minute = minute_of_day(now);
        matches
            .iter()
            .filter(|m| m.record.is_none())
            .find_map(|m| {
                let until = m.slot.minute_of_day() - now_minute;
                if until >= COUNTDOWN_THRESHOLD_MINUTES {
                    Some(DisplayState::Countdown {
                        slot: m.slot,
                        minutes_remaining: until,
                    })
                } else if until >= -LATE_WINDOW_MINUTES {
                    Some(DisplayState::AwaitingInput { slot: Some(m.slot) })
                } else {
                    None
                }
            })
            .unwrap_or_else(|| {
                if matches.iter().all(|m| m.record.is_some()) {
                    DisplayState::Completed
                } else {
                    DisplayState::DayEnded
                }
            })
    };

    Evaluation { state, slots }
}
