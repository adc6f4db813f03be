//! Injectable time source.
//!
//! Repositories never ask the database for the current time; they compute
//! it here and bind it as a query parameter.

use chrono::{NaiveDateTime, Timelike, Utc};

/// Source of the current instant.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Wall clock in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Utc::now().naive_utc()
    }
}

/// Clock frozen at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now(&self) -> NaiveDateTime {
        (**self).now()
    }
}

/// Drops sub-second precision, matching the stored `time` format.
pub fn truncate_to_second(value: NaiveDateTime) -> NaiveDateTime {
    value.with_nanosecond(0).unwrap_or(value)
}

/// Drops seconds and sub-second precision.
pub fn truncate_to_minute(value: NaiveDateTime) -> NaiveDateTime {
    let seconds = truncate_to_second(value);
    seconds.with_second(0).unwrap_or(seconds)
}

#[cfg(test)]
mod tests {
    use super::{truncate_to_minute, truncate_to_second, Clock, FixedClock, SystemClock};
    use chrono::NaiveDate;

    #[test]
    fn fixed_clock_returns_its_instant() {
        let instant = NaiveDate::from_ymd_opt(2014, 9, 9)
            .unwrap()
            .and_hms_opt(14, 10, 0)
            .unwrap();
        assert_eq!(FixedClock(instant).now(), instant);
    }

    #[test]
    fn truncation_helpers_drop_precision() {
        let instant = NaiveDate::from_ymd_opt(2014, 9, 9)
            .unwrap()
            .and_hms_milli_opt(14, 10, 42, 750)
            .unwrap();

        assert_eq!(
            truncate_to_second(instant),
            NaiveDate::from_ymd_opt(2014, 9, 9)
                .unwrap()
                .and_hms_opt(14, 10, 42)
                .unwrap()
        );
        assert_eq!(
            truncate_to_minute(instant),
            NaiveDate::from_ymd_opt(2014, 9, 9)
                .unwrap()
                .and_hms_opt(14, 10, 0)
                .unwrap()
        );
    }

    #[test]
    fn system_clock_moves_forward() {
        let first = SystemClock.now();
        let second = SystemClock.now();
        assert!(second >= first);
    }
}
