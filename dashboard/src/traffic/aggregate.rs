//! The three chart reducers. Each runs over every matching record (no
//! paging) using the store's grouped count, then shapes the groups:
//! direction counts stay sparse, hourly series are dense over 0-23.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::HOURS_PER_DAY;

use super::direction::Direction;
use super::error::TrafficError;
use super::filter::{FilterCriteria, SqlFilter};
use super::store::{GroupCount, TrafficDb};
use super::time_bucket::{
    LOCAL_HOUR_SQL, LOCAL_WEEKDAY_SQL, TimeBucket, WeekdayClass, classify_weekday,
};

/// Record count per observed direction code, ascending by code. Codes with
/// no records are absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectionDistribution {
    pub time_bucket: Option<TimeBucket>,
    pub counts: BTreeMap<i64, u64>,
}

impl DirectionDistribution {
    pub fn from_groups(time_bucket: Option<TimeBucket>, groups: &[GroupCount]) -> Self {
        let counts = groups
            .iter()
            .filter(|group| group.count > 0)
            .filter_map(|group| {
                let code = group.keys.first().copied().flatten()?;
                Some((code, group.count))
            })
            .fold(BTreeMap::new(), |mut counts, (code, count)| {
                *counts.entry(code).or_insert(0) += count;
                counts
            });
        DirectionDistribution {
            time_bucket,
            counts,
        }
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

fn zeroed_hours<T: Default>() -> BTreeMap<u8, T> {
    (0..HOURS_PER_DAY).map(|hour| (hour, T::default())).collect()
}

/// NULL keys (unconvertible timestamps) and values outside 0-23 yield `None`.
fn hour_key(raw: Option<&Option<i64>>) -> Option<u8> {
    let raw = (*raw?)?;
    u8::try_from(raw).ok().filter(|hour| *hour < HOURS_PER_DAY)
}

/// Record count for every local hour 0-23, zero-filled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HourlyTrend {
    pub direction: Option<Direction>,
    pub counts: BTreeMap<u8, u64>,
    /// Records whose local hour could not be derived.
    #[serde(skip)]
    pub skipped_records: u64,
}

impl HourlyTrend {
    pub fn from_groups(direction: Option<Direction>, groups: &[GroupCount]) -> Self {
        let mut counts = zeroed_hours();
        let mut skipped_records = 0;
        for group in groups {
            match hour_key(group.keys.first()) {
                Some(hour) => *counts.entry(hour).or_insert(0) += group.count,
                None => skipped_records += group.count,
            }
        }
        HourlyTrend {
            direction,
            counts,
            skipped_records,
        }
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }
}

/// Average records per local hour, split by weekday class.
///
/// Raw weekday counts are divided by 5 and weekend counts by 2 regardless of
/// how many calendar days the data spans. This is an approximation that
/// assumes whole weeks of data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdayWeekendTrend {
    pub direction: Option<Direction>,
    pub weekday: BTreeMap<u8, f64>,
    pub weekend: BTreeMap<u8, f64>,
    #[serde(skip)]
    pub weekday_records: u64,
    #[serde(skip)]
    pub weekend_records: u64,
    /// Records whose local hour or weekday could not be derived.
    #[serde(skip)]
    pub skipped_records: u64,
}

impl WeekdayWeekendTrend {
    /// Builds from `(hour, day_of_week)` groups, Sunday = 0.
    pub fn from_groups(direction: Option<Direction>, groups: &[GroupCount]) -> Self {
        let mut weekday_raw: BTreeMap<u8, u64> = zeroed_hours();
        let mut weekend_raw: BTreeMap<u8, u64> = zeroed_hours();
        let mut skipped_records = 0;
        for group in groups {
            let hour = hour_key(group.keys.first());
            let day = group
                .keys
                .get(1)
                .copied()
                .flatten()
                .and_then(|day| u8::try_from(day).ok());
            let (Some(hour), Some(day)) = (hour, day) else {
                skipped_records += group.count;
                continue;
            };
            let raw = match classify_weekday(day) {
                WeekdayClass::Weekday => &mut weekday_raw,
                WeekdayClass::Weekend => &mut weekend_raw,
            };
            *raw.entry(hour).or_insert(0) += group.count;
        }
        WeekdayWeekendTrend {
            skipped_records,
            ..Self::from_raw(direction, &weekday_raw, &weekend_raw)
        }
    }

    pub fn from_raw(
        direction: Option<Direction>,
        weekday_raw: &BTreeMap<u8, u64>,
        weekend_raw: &BTreeMap<u8, u64>,
    ) -> Self {
        let average = |raw: &BTreeMap<u8, u64>, class: WeekdayClass| -> BTreeMap<u8, f64> {
            let mut averaged = zeroed_hours();
            for (&hour, &count) in raw {
                if hour < HOURS_PER_DAY {
                    averaged.insert(hour, count as f64 / class.divisor());
                }
            }
            averaged
        };
        WeekdayWeekendTrend {
            direction,
            weekday: average(weekday_raw, WeekdayClass::Weekday),
            weekend: average(weekend_raw, WeekdayClass::Weekend),
            weekday_records: weekday_raw.values().sum(),
            weekend_records: weekend_raw.values().sum(),
            skipped_records: 0,
        }
    }

    pub fn series(&self, class: WeekdayClass) -> &BTreeMap<u8, f64> {
        match class {
            WeekdayClass::Weekday => &self.weekday,
            WeekdayClass::Weekend => &self.weekend,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.weekday_records == 0 && self.weekend_records == 0
    }
}

pub fn direction_distribution(
    db: &TrafficDb,
    time_bucket: Option<TimeBucket>,
) -> Result<DirectionDistribution, TrafficError> {
    let filter = SqlFilter::build(&FilterCriteria {
        time_bucket,
        direction: None,
    });
    let groups = db.group_count(&["direction"], &filter)?;
    Ok(DirectionDistribution::from_groups(time_bucket, &groups))
}

pub fn hourly_trend(
    db: &TrafficDb,
    direction: Option<Direction>,
) -> Result<HourlyTrend, TrafficError> {
    let filter = SqlFilter::build(&FilterCriteria {
        time_bucket: None,
        direction,
    });
    let groups = db.group_count(&[LOCAL_HOUR_SQL.as_str()], &filter)?;
    Ok(HourlyTrend::from_groups(direction, &groups))
}

pub fn weekday_weekend_trend(
    db: &TrafficDb,
    direction: Option<Direction>,
) -> Result<WeekdayWeekendTrend, TrafficError> {
    let filter = SqlFilter::build(&FilterCriteria {
        time_bucket: None,
        direction,
    });
    let groups = db.group_count(
        &[LOCAL_HOUR_SQL.as_str(), LOCAL_WEEKDAY_SQL.as_str()],
        &filter,
    )?;
    Ok(WeekdayWeekendTrend::from_groups(direction, &groups))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(keys: &[i64], count: u64) -> GroupCount {
        GroupCount {
            keys: keys.iter().copied().map(Some).collect(),
            count,
        }
    }

    fn null_hour_group(count: u64) -> GroupCount {
        GroupCount {
            keys: vec![None, None],
            count,
        }
    }

    #[test]
    fn direction_distribution_is_sparse() {
        let dist = DirectionDistribution::from_groups(
            None,
            &[group(&[1], 4), group(&[3], 0), group(&[4], 2)],
        );
        assert_eq!(dist.counts, BTreeMap::from([(1, 4), (4, 2)]));
        assert_eq!(dist.total(), 6);
    }

    #[test]
    fn hourly_trend_is_dense() {
        let trend = HourlyTrend::from_groups(None, &[group(&[8], 25), group(&[23], 1)]);
        assert_eq!(trend.counts.len(), 24);
        assert_eq!(trend.counts[&8], 25);
        assert_eq!(trend.counts[&23], 1);
        assert_eq!(trend.counts[&0], 0);
        assert_eq!(trend.total(), 26);
    }

    #[test]
    fn hourly_trend_skips_null_hours() {
        let trend = HourlyTrend::from_groups(
            None,
            &[null_hour_group(2), group(&[8], 3), group(&[24], 1)],
        );
        assert_eq!(trend.counts.len(), 24);
        assert_eq!(trend.total(), 3);
        assert_eq!(trend.skipped_records, 3);
    }

    #[test]
    fn weekday_weekend_skips_null_keys() {
        let trend = WeekdayWeekendTrend::from_groups(
            None,
            &[null_hour_group(4), group(&[8, 2], 5)],
        );
        assert_eq!(trend.weekday[&8], 1.0);
        assert_eq!(trend.weekday_records, 5);
        assert_eq!(trend.weekend_records, 0);
        assert_eq!(trend.skipped_records, 4);
    }

    #[test]
    fn weekday_weekend_uses_fixed_divisors() {
        // hour 8: Monday 3 + Friday 4; Saturday 1 + Sunday 2.
        let trend = WeekdayWeekendTrend::from_groups(
            None,
            &[
                group(&[8, 1], 3),
                group(&[8, 5], 4),
                group(&[8, 6], 1),
                group(&[8, 0], 2),
                group(&[17, 3], 1),
            ],
        );
        assert_eq!(trend.weekday.len(), 24);
        assert_eq!(trend.weekend.len(), 24);
        assert_eq!(trend.weekday[&8], 7.0 / 5.0);
        assert_eq!(trend.weekend[&8], 3.0 / 2.0);
        assert_eq!(trend.weekday[&17], 0.2);
        assert_eq!(trend.weekend[&17], 0.0);
        assert_eq!(trend.weekday_records, 8);
        assert_eq!(trend.weekend_records, 3);
        assert!(!trend.is_empty());
    }

    #[test]
    fn averages_are_not_rounded() {
        let raw = BTreeMap::from([(5, 3_u64)]);
        let trend = WeekdayWeekendTrend::from_raw(None, &raw, &raw);
        assert_eq!(trend.weekday[&5], 0.6);
        assert_eq!(trend.weekend[&5], 1.5);
    }
}
