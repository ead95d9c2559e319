//! Date/time source and day-granularity helpers.
//!
//! All calendar comparisons (streaks, "due today", "is today") use the local
//! date with time-of-day discarded.

use std::cell::Cell;

use chrono::{DateTime, Duration, Local, NaiveDate, Utc};

/// Source of the current local time.
pub trait Clock {
    fn now(&self) -> DateTime<Local>;

    /// Today's date key.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// The host system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Cell<DateTime<Local>>,
}

impl ManualClock {
    pub fn new(now: DateTime<Local>) -> Self {
        Self { now: Cell::new(now) }
    }

    pub fn set(&self, now: DateTime<Local>) {
        self.now.set(now);
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Local> {
        self.now.get()
    }
}

/// Local calendar date of an instant.
pub fn date_key(at: &DateTime<Utc>) -> NaiveDate {
    at.with_timezone(&Local).date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn manual_clock_advances() {
        let start = Local.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let clock = ManualClock::new(start);
        clock.advance(Duration::days(1));
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2024, 5, 2).unwrap());
    }

    #[test]
    fn date_key_uses_local_calendar_day() {
        let late = Local.with_ymd_and_hms(2024, 5, 1, 23, 59, 0).unwrap();
        let early = Local.with_ymd_and_hms(2024, 5, 1, 0, 1, 0).unwrap();
        assert_eq!(
            date_key(&late.with_timezone(&Utc)),
            date_key(&early.with_timezone(&Utc))
        );
    }
}
