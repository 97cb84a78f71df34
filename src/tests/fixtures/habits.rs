// Shared builders for habits and records used across unit and e2e tests.
//
// Times are built in a fixed +09:00 offset so tests never depend on the host zone.

use crate::modules::habits::core::habit::{Habit, HabitDraft, HabitId, HabitRecord, RecordId};
use crate::modules::habits::core::schedule::{Schedule, SlotTime, WeekdaySet};
use chrono::{DateTime, FixedOffset, TimeZone, Utc};

pub const USER_ID: &str = "user-fixed-0001";

pub fn seoul() -> FixedOffset {
    FixedOffset::east_opt(9 * 3600).unwrap()
}

pub fn local_at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<FixedOffset> {
    seoul()
        .with_ymd_and_hms(year, month, day, hour, minute, 0)
        .unwrap()
}

pub fn slot(raw: &str) -> SlotTime {
    raw.parse().unwrap()
}

pub struct HabitBuilder {
    inner: Habit,
}

#[allow(dead_code)]
impl HabitBuilder {
    pub fn new(id: HabitId) -> Self {
        Self {
            inner: Habit {
                id,
                name: format!("Habit {id}"),
                description: None,
                schedule: Schedule::new(WeekdaySet::EVERY_DAY, vec![]),
                active: true,
                today_records: vec![],
            },
        }
    }

    pub fn name(mut self, v: impl Into<String>) -> Self {
        self.inner.name = v.into();
        self
    }

    pub fn days(mut self, v: WeekdaySet) -> Self {
        self.inner.schedule.days = v;
        self
    }

    pub fn slots(mut self, v: &[&str]) -> Self {
        self.inner.schedule.slots = v.iter().map(|raw| slot(raw)).collect();
        self
    }

    pub fn inactive(mut self) -> Self {
        self.inner.active = false;
        self
    }

    pub fn records(mut self, v: Vec<HabitRecord>) -> Self {
        self.inner.today_records = v;
        self
    }

    pub fn draft(&self) -> HabitDraft {
        HabitDraft {
            name: self.inner.name.clone(),
            description: self.inner.description.clone(),
            schedule: self.inner.schedule.clone(),
            active: self.inner.active,
        }
    }

    pub fn build(self) -> Habit {
        self.inner
    }
}

pub struct RecordBuilder {
    inner: HabitRecord,
}

#[allow(dead_code)]
impl RecordBuilder {
    pub fn new(habit_id: HabitId) -> Self {
        Self {
            inner: HabitRecord {
                id: RecordId::Persisted(1),
                user_id: USER_ID.to_string(),
                habit_id,
                success: true,
                created_at: Utc.with_ymd_and_hms(2026, 10, 19, 0, 0, 0).unwrap(),
                target_slot: None,
            },
        }
    }

    pub fn id(mut self, v: i64) -> Self {
        self.inner.id = RecordId::Persisted(v);
        self
    }

    pub fn provisional(mut self) -> Self {
        self.inner.id = RecordId::provisional();
        self
    }

    pub fn logged_at(mut self, v: DateTime<FixedOffset>) -> Self {
        self.inner.created_at = v.with_timezone(&Utc);
        self
    }

    pub fn slot(mut self, v: &str) -> Self {
        self.inner.target_slot = Some(slot(v));
        self
    }

    pub fn failed(mut self) -> Self {
        self.inner.success = false;
        self
    }

    pub fn build(self) -> HabitRecord {
        self.inner
    }
}
