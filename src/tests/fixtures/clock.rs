use crate::shared::core::clock::Clock;
use chrono::{DateTime, Duration, FixedOffset};
use std::sync::Mutex;

/// A clock that only moves when the test says so.
pub struct FixedClock {
    now: Mutex<DateTime<FixedOffset>>,
}

#[allow(dead_code)]
impl FixedClock {
    pub fn at(now: DateTime<FixedOffset>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: DateTime<FixedOffset>) {
        *self.now.lock().unwrap() = now;
    }

    pub fn advance_minutes(&self, minutes: i64) {
        let mut now = self.now.lock().unwrap();
        *now += Duration::minutes(minutes);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        *self.now.lock().unwrap()
    }
}
