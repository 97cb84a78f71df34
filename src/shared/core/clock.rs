// Wall-clock access for the habits core.
//
// Purpose
// - Everything in the core evaluates against the user's local calendar day, so the
//   current instant travels with its UTC offset.
//
// Testing guidance
// - Use the fixed clock from the test fixtures instead of the system clock.

use chrono::{DateTime, FixedOffset, Local, NaiveTime, TimeZone, Utc};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// Local midnight of the day containing `now`, expressed in UTC.
pub fn start_of_local_day<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Utc> {
    let midnight = now.date_naive().and_time(NaiveTime::MIN);
    now.timezone()
        .from_local_datetime(&midnight)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .unwrap_or_else(|| midnight.and_utc())
}

/// Minutes elapsed since local midnight.
pub fn minute_of_day<Tz: TimeZone>(at: &DateTime<Tz>) -> i64 {
    use chrono::Timelike;
    i64::from(at.hour()) * 60 + i64::from(at.minute())
}
