// Habit and HabitRecord, the two entities the client keeps in memory.
//
// Notes
// - Record timestamps are UTC instants. Anything "today" is decided against the
//   caller's local offset, never against UTC.
// - `today_records` is attached for display only. It is not persisted with the habit.

use crate::modules::habits::core::schedule::{Schedule, SlotTime};
use crate::shared::core::clock::minute_of_day;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

pub type HabitId = i64;

const PROVISIONAL_PREFIX: &str = "tmp-";

/// Server rows carry numeric ids; optimistic rows carry a client-generated uuid
/// until the store confirms them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Persisted(i64),
    Provisional(Uuid),
}

impl RecordId {
    pub fn provisional() -> Self {
        RecordId::Provisional(Uuid::now_v7())
    }

    pub fn is_provisional(&self) -> bool {
        matches!(self, RecordId::Provisional(_))
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Persisted(id) => write!(f, "{id}"),
            RecordId::Provisional(id) => write!(f, "{PROVISIONAL_PREFIX}{id}"),
        }
    }
}

impl FromStr for RecordId {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.strip_prefix(PROVISIONAL_PREFIX) {
            Some(uuid) => Uuid::parse_str(uuid)
                .map(RecordId::Provisional)
                .map_err(|err| err.to_string()),
            None => raw
                .parse::<i64>()
                .map(RecordId::Persisted)
                .map_err(|err| err.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitRecord {
    pub id: RecordId,
    pub user_id: String,
    pub habit_id: HabitId,
    pub success: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub target_slot: Option<SlotTime>,
}

impl HabitRecord {
    /// The time of day this record answers: the explicit slot label when present,
    /// otherwise the local time it was logged at.
    pub fn logged_minute<Tz: TimeZone>(&self, tz: &Tz) -> i64 {
        match self.target_slot {
            Some(slot) => slot.minute_of_day(),
            None => minute_of_day(&self.created_at.with_timezone(tz)),
        }
    }

    pub fn is_on_local_day_of<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> bool {
        self.created_at.with_timezone(&now.timezone()).date_naive() == now.date_naive()
    }

    /// True when this is the stored row of the optimistic `pending` record. Stores
    /// keep timestamps at millisecond precision.
    pub fn is_saved_copy_of(&self, pending: &HabitRecord) -> bool {
        !self.id.is_provisional()
            && self.habit_id == pending.habit_id
            && self.success == pending.success
            && self.target_slot == pending.target_slot
            && self.created_at.timestamp_millis() == pending.created_at.timestamp_millis()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    pub id: HabitId,
    pub name: String,
    pub description: Option<String>,
    #[serde(flatten)]
    pub schedule: Schedule,
    pub active: bool,
    #[serde(default)]
    pub today_records: Vec<HabitRecord>,
}

impl Habit {
    pub fn record(&self, record_id: &RecordId) -> Option<&HabitRecord> {
        self.today_records.iter().find(|r| &r.id == record_id)
    }

    pub fn has_record(&self, record_id: &RecordId) -> bool {
        self.record(record_id).is_some()
    }
}

/// User-editable habit fields, as sent to the store on create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitDraft {
    pub name: String,
    pub description: Option<String>,
    #[serde(flatten)]
    pub schedule: Schedule,
    pub active: bool,
}

impl HabitDraft {
    /// Trims text fields and sorts the schedule. Blank descriptions become `None`.
    pub fn normalized(self) -> Self {
        let description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        Self {
            name: self.name.trim().to_string(),
            description,
            schedule: self.schedule.normalized(),
            active: self.active,
        }
    }
}
