// Schedule primitives: which weekdays a habit runs on and at which times of day.
//
// Internal matching works on weekday ordinals (Monday = 0) and minute-of-day
// values only. Display labels live in a table used at the outer boundary.

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("weekday ordinal {0} is out of range 0..=6")]
    InvalidWeekday(u8),

    #[error("invalid time slot '{0}', expected HH:MM")]
    InvalidSlot(String),
}

const WEEKDAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

pub fn weekday_label(day: Weekday) -> &'static str {
    WEEKDAY_LABELS[day.num_days_from_monday() as usize]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    pub const EVERY_DAY: Self = Self(0b111_1111);

    pub fn empty() -> Self {
        Self(0)
    }

    pub fn from_ordinals<I>(ordinals: I) -> Result<Self, ScheduleError>
    where
        I: IntoIterator<Item = u8>,
    {
        ordinals.into_iter().try_fold(Self::empty(), |set, ordinal| {
            if ordinal > 6 {
                return Err(ScheduleError::InvalidWeekday(ordinal));
            }
            Ok(Self(set.0 | 1 << ordinal))
        })
    }

    pub fn with(self, day: Weekday) -> Self {
        Self(self.0 | 1 << day.num_days_from_monday())
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & (1 << day.num_days_from_monday()) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Ascending ordinals, Monday = 0.
    pub fn ordinals(&self) -> Vec<u8> {
        (0..7u8).filter(|bit| self.0 & (1 << bit) != 0).collect()
    }

    pub fn labels(&self) -> Vec<&'static str> {
        self.ordinals()
            .into_iter()
            .map(|ordinal| WEEKDAY_LABELS[ordinal as usize])
            .collect()
    }
}

impl TryFrom<Vec<u8>> for WeekdaySet {
    type Error = ScheduleError;

    fn try_from(ordinals: Vec<u8>) -> Result<Self, Self::Error> {
        Self::from_ordinals(ordinals)
    }
}

impl From<WeekdaySet> for Vec<u8> {
    fn from(set: WeekdaySet) -> Self {
        set.ordinals()
    }
}

/// A wall-clock time of day without timezone, stored as minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SlotTime(u16);

impl SlotTime {
    pub fn new(hour: u32, minute: u32) -> Result<Self, ScheduleError> {
        if hour >= 24 || minute >= 60 {
            return Err(ScheduleError::InvalidSlot(format!("{hour}:{minute}")));
        }
        Ok(Self((hour * 60 + minute) as u16))
    }

    pub fn minute_of_day(self) -> i64 {
        i64::from(self.0)
    }

    pub fn hour(self) -> u32 {
        u32::from(self.0 / 60)
    }

    pub fn minute(self) -> u32 {
        u32::from(self.0 % 60)
    }
}

impl FromStr for SlotTime {
    type Err = ScheduleError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || ScheduleError::InvalidSlot(raw.to_string());
        // Postgres `time` columns come back as "HH:MM:SS"; seconds are dropped.
        let mut parts = raw.trim().split(':');
        let (Some(hour), Some(minute)) = (parts.next(), parts.next()) else {
            return Err(invalid());
        };
        let second = parts.next();
        if parts.next().is_some()
            || hour.is_empty()
            || hour.len() > 2
            || minute.len() != 2
            || second.is_some_and(|s| s.len() != 2)
        {
            return Err(invalid());
        }
        if let Some(second) = second {
            let second: u32 = second.parse().map_err(|_| invalid())?;
            if second >= 60 {
                return Err(invalid());
            }
        }
        let hour: u32 = hour.parse().map_err(|_| invalid())?;
        let minute: u32 = minute.parse().map_err(|_| invalid())?;
        Self::new(hour, minute).map_err(|_| invalid())
    }
}

impl TryFrom<String> for SlotTime {
    type Error = ScheduleError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

impl From<SlotTime> for String {
    fn from(slot: SlotTime) -> Self {
        slot.to_string()
    }
}

impl fmt::Display for SlotTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Schedule {
    pub days: WeekdaySet,
    #[serde(default)]
    pub slots: Vec<SlotTime>,
}

impl Schedule {
    pub fn new(days: WeekdaySet, slots: Vec<SlotTime>) -> Self {
        Self { days, slots }
    }

    pub fn normalized(&self) -> Self {
        let mut slots = self.slots.clone();
        slots.sort();
        slots.dedup();
        Self {
            days: self.days,
            slots,
        }
    }

    pub fn differs_from(&self, other: &Schedule) -> bool {
        self.normalized() != other.normalized()
    }

    pub fn has_slots(&self) -> bool {
        !self.slots.is_empty()
    }

    pub fn runs_on(&self, day: Weekday) -> bool {
        self.days.contains(day)
    }
}
