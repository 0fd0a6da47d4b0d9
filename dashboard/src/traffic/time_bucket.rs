//! Local-time derivation and the fixed time-of-day buckets.
//!
//! Stored timestamps are UTC epoch seconds. Hour-of-day and day-of-week are
//! always taken after shifting by [`LOCAL_OFFSET`], both here in Rust and in
//! the SQL expressions handed to the store, so bucket and weekday assignment
//! cannot drift between the table view and the charts.

use std::sync::LazyLock;

use chrono::{DateTime, Datelike, FixedOffset, Timelike};
use serde::{Deserialize, Serialize};

use crate::config::{LOCAL_UTC_OFFSET_HOURS, LOCAL_UTC_OFFSET_SECONDS, WEEKDAY_DIVISOR, WEEKEND_DIVISOR};

pub const LOCAL_OFFSET: FixedOffset = match FixedOffset::east_opt(LOCAL_UTC_OFFSET_SECONDS) {
    Some(offset) => offset,
    None => panic!("local UTC offset out of range"),
};

/// Local hour (0-23) of the `time` column, as an SQLite integer expression.
pub static LOCAL_HOUR_SQL: LazyLock<String> = LazyLock::new(|| {
    format!(
        "CAST(strftime('%H', time, 'unixepoch', '{LOCAL_UTC_OFFSET_HOURS:+} hours') AS INTEGER)"
    )
});

/// Local day of week of the `time` column, Sunday = 0 through Saturday = 6.
pub static LOCAL_WEEKDAY_SQL: LazyLock<String> = LazyLock::new(|| {
    format!(
        "CAST(strftime('%w', time, 'unixepoch', '{LOCAL_UTC_OFFSET_HOURS:+} hours') AS INTEGER)"
    )
});

pub fn to_local(epoch_secs: i64) -> Option<DateTime<FixedOffset>> {
    DateTime::from_timestamp(epoch_secs, 0).map(|utc| utc.with_timezone(&LOCAL_OFFSET))
}

pub fn local_hour(epoch_secs: i64) -> Option<u8> {
    to_local(epoch_secs).map(|local| local.hour() as u8)
}

/// Sunday = 0 through Saturday = 6.
pub fn local_day_of_week(epoch_secs: i64) -> Option<u8> {
    to_local(epoch_secs).map(|local| local.weekday().num_days_from_sunday() as u8)
}

/// Named local time-of-day interval.
///
/// Buckets do not cover the whole day: hours 9, 10, 13 and 19 belong to no
/// bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeBucket {
    Morning,
    Noon,
    Afternoon,
    Evening,
    Night,
}

impl TimeBucket {
    pub const ALL: [TimeBucket; 5] = [
        TimeBucket::Morning,
        TimeBucket::Noon,
        TimeBucket::Afternoon,
        TimeBucket::Evening,
        TimeBucket::Night,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            TimeBucket::Morning => "morning",
            TimeBucket::Noon => "noon",
            TimeBucket::Afternoon => "afternoon",
            TimeBucket::Evening => "evening",
            TimeBucket::Night => "night",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            TimeBucket::Morning => "Morning rush (07:00-09:00)",
            TimeBucket::Noon => "Midday (11:00-13:00)",
            TimeBucket::Afternoon => "Afternoon (14:00-17:00)",
            TimeBucket::Evening => "Evening rush (17:00-19:00)",
            TimeBucket::Night => "Night (20:00-06:00)",
        }
    }

    /// Half-open local hour ranges `[start, end)`. `Night` wraps midnight and
    /// is therefore two ranges.
    pub const fn hour_ranges(self) -> &'static [(u8, u8)] {
        match self {
            TimeBucket::Morning => &[(7, 9)],
            TimeBucket::Noon => &[(11, 13)],
            TimeBucket::Afternoon => &[(14, 17)],
            TimeBucket::Evening => &[(17, 19)],
            TimeBucket::Night => &[(20, 24), (0, 6)],
        }
    }

    /// Parses a boundary value such as a `?time_bucket=` query param.
    /// Blank or unknown names yield `None`.
    pub fn parse(raw: &str) -> Option<TimeBucket> {
        let raw = raw.trim();
        TimeBucket::ALL.into_iter().find(|bucket| bucket.name() == raw)
    }

    pub fn contains_hour(self, hour: u8) -> bool {
        self.hour_ranges()
            .iter()
            .any(|&(start, end)| hour >= start && hour < end)
    }

    /// SQL predicate over the `time` column. Ranges are inlined since they
    /// come from this closed set, never from request input.
    pub fn sql_condition(self) -> String {
        let hour = LOCAL_HOUR_SQL.as_str();
        let ranges: Vec<String> = self
            .hour_ranges()
            .iter()
            .map(|&(start, end)| format!("({hour} >= {start} AND {hour} < {end})"))
            .collect();
        format!("({})", ranges.join(" OR "))
    }
}

pub fn classify_hour(hour: u8) -> Option<TimeBucket> {
    TimeBucket::ALL
        .into_iter()
        .find(|bucket| bucket.contains_hour(hour))
}

/// SQL predicate for a bucket name; unknown names add no condition.
pub fn bucket_condition(name: &str) -> Option<String> {
    TimeBucket::parse(name).map(TimeBucket::sql_condition)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekdayClass {
    Weekday,
    Weekend,
}

impl WeekdayClass {
    pub const fn label(self) -> &'static str {
        match self {
            WeekdayClass::Weekday => "Weekday average",
            WeekdayClass::Weekend => "Weekend average",
        }
    }

    /// Fixed number of days the raw hourly counts are divided by.
    pub const fn divisor(self) -> f64 {
        match self {
            WeekdayClass::Weekday => WEEKDAY_DIVISOR,
            WeekdayClass::Weekend => WEEKEND_DIVISOR,
        }
    }
}

/// Sunday = 0 and Saturday = 6 are the weekend; 1-5 are weekdays.
pub const fn classify_weekday(day_of_week: u8) -> WeekdayClass {
    match day_of_week % 7 {
        0 | 6 => WeekdayClass::Weekend,
        _ => WeekdayClass::Weekday,
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rusqlite::Connection;

    use super::*;

    fn local_ts(y: i32, m: u32, d: u32, h: u32, min: u32) -> i64 {
        LOCAL_OFFSET
            .with_ymd_and_hms(y, m, d, h, min, 0)
            .unwrap()
            .timestamp()
    }

    #[test]
    fn night_wraps_midnight() {
        assert!(TimeBucket::Night.contains_hour(23));
        assert!(TimeBucket::Night.contains_hour(20));
        assert!(TimeBucket::Night.contains_hour(0));
        assert!(TimeBucket::Night.contains_hour(5));
        assert!(!TimeBucket::Night.contains_hour(6));
        assert!(!TimeBucket::Night.contains_hour(19));
    }

    #[test]
    fn gap_hours_have_no_bucket() {
        for hour in [9, 10, 13, 19] {
            assert_eq!(classify_hour(hour), None, "hour {hour}");
        }
        assert_eq!(classify_hour(7), Some(TimeBucket::Morning));
        assert_eq!(classify_hour(8), Some(TimeBucket::Morning));
        assert_eq!(classify_hour(12), Some(TimeBucket::Noon));
        assert_eq!(classify_hour(16), Some(TimeBucket::Afternoon));
        assert_eq!(classify_hour(17), Some(TimeBucket::Evening));
        assert_eq!(classify_hour(2), Some(TimeBucket::Night));
    }

    #[test]
    fn unknown_bucket_names_add_no_condition() {
        assert_eq!(bucket_condition("dawn"), None);
        assert_eq!(bucket_condition(""), None);
        assert_eq!(bucket_condition("Morning"), None);
        assert!(bucket_condition(" morning ").is_some());
    }

    #[test]
    fn local_time_uses_fixed_offset() {
        // 2024-01-01T00:30:00Z is 08:30 local.
        assert_eq!(local_hour(1_704_069_000), Some(8));
        assert_eq!(local_hour(local_ts(2024, 1, 8, 23, 59)), Some(23));
        assert_eq!(local_hour(local_ts(2024, 1, 9, 0, 0)), Some(0));
    }

    #[test]
    fn weekday_classes_follow_local_day() {
        // 2024-01-06 is a Saturday, 2024-01-08 a Monday.
        let saturday = local_ts(2024, 1, 6, 12, 0);
        let sunday_early = local_ts(2024, 1, 7, 1, 0);
        let monday_early = local_ts(2024, 1, 8, 1, 0);
        assert_eq!(local_day_of_week(saturday), Some(6));
        assert_eq!(local_day_of_week(sunday_early), Some(0));
        assert_eq!(local_day_of_week(monday_early), Some(1));
        assert_eq!(classify_weekday(6), WeekdayClass::Weekend);
        assert_eq!(classify_weekday(0), WeekdayClass::Weekend);
        for day in 1..=5 {
            assert_eq!(classify_weekday(day), WeekdayClass::Weekday);
        }
    }

    #[test]
    fn sql_expressions_agree_with_rust_classification() {
        let conn = Connection::open_in_memory().unwrap();
        // Monday 2024-01-08 through Sunday 2024-01-14, every local hour.
        let samples: Vec<i64> = (8..=14)
            .flat_map(|day| (0..24).map(move |hour| local_ts(2024, 1, day, hour, 15)))
            .collect();

        for ts in samples {
            let (hour, weekday): (u8, u8) = conn
                .query_row(
                    &format!(
                        "SELECT {}, {} FROM (SELECT ?1 AS time)",
                        *LOCAL_HOUR_SQL, *LOCAL_WEEKDAY_SQL
                    ),
                    [ts],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .unwrap();
            assert_eq!(Some(hour), local_hour(ts));
            assert_eq!(Some(weekday), local_day_of_week(ts));

            for bucket in TimeBucket::ALL {
                let matched: bool = conn
                    .query_row(
                        &format!(
                            "SELECT {} FROM (SELECT ?1 AS time)",
                            bucket.sql_condition()
                        ),
                        [ts],
                        |row| row.get(0),
                    )
                    .unwrap();
                assert_eq!(matched, bucket.contains_hour(hour), "{bucket:?} at hour {hour}");
            }
        }
    }
}
