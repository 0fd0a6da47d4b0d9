pub mod svg;

use crate::traffic::direction::label_for_code;
use crate::traffic::{
    Direction, DirectionDistribution, HourlyTrend, TimeBucket, WeekdayClass, WeekdayWeekendTrend,
};

pub const ALL_DIRECTIONS_LABEL: &str = "all directions";

#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub name: &'static str,
    pub points: Vec<ChartPoint>,
}

pub fn hour_label(hour: u8) -> String {
    format!("{hour:02}:00")
}

pub fn direction_title(time_bucket: Option<TimeBucket>) -> String {
    match time_bucket {
        Some(bucket) => format!("Traffic direction distribution - {}", bucket.label()),
        None => "Traffic direction distribution".to_owned(),
    }
}

pub fn hourly_title(direction: Option<Direction>) -> String {
    match direction {
        Some(direction) => format!("24-hour traffic trend - {}", direction.label()),
        None => "24-hour traffic trend".to_owned(),
    }
}

pub fn weekday_weekend_title(direction: Option<Direction>) -> String {
    let scope = direction.map_or(ALL_DIRECTIONS_LABEL, Direction::label);
    format!("Weekday vs weekend traffic ({scope})")
}

pub fn direction_points(distribution: &DirectionDistribution) -> Vec<ChartPoint> {
    distribution
        .counts
        .iter()
        .map(|(&code, &count)| ChartPoint {
            label: label_for_code(code).to_owned(),
            value: count as f64,
        })
        .collect()
}

pub fn hourly_points(trend: &HourlyTrend) -> Vec<ChartPoint> {
    trend
        .counts
        .iter()
        .map(|(&hour, &count)| ChartPoint {
            label: hour_label(hour),
            value: count as f64,
        })
        .collect()
}

pub fn weekday_weekend_series(trend: &WeekdayWeekendTrend) -> Vec<ChartSeries> {
    [WeekdayClass::Weekday, WeekdayClass::Weekend]
        .into_iter()
        .map(|class| ChartSeries {
            name: class.label(),
            points: trend
                .series(class)
                .iter()
                .map(|(&hour, &avg)| ChartPoint {
                    label: hour_label(hour),
                    value: avg,
                })
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn titles_carry_filter_labels() {
        assert_eq!(direction_title(None), "Traffic direction distribution");
        assert_eq!(
            direction_title(Some(TimeBucket::Evening)),
            "Traffic direction distribution - Evening rush (17:00-19:00)"
        );
        assert_eq!(
            hourly_title(Some(Direction::EastToWest)),
            "24-hour traffic trend - East → West"
        );
        assert_eq!(
            weekday_weekend_title(None),
            "Weekday vs weekend traffic (all directions)"
        );
    }

    #[test]
    fn direction_points_label_unknown_codes() {
        let distribution = DirectionDistribution {
            time_bucket: None,
            counts: BTreeMap::from([(2, 5), (9, 1)]),
        };
        let points = direction_points(&distribution);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].label, "South → North");
        assert_eq!(points[0].value, 5.0);
        assert_eq!(points[1].label, "Unknown direction");
    }

    #[test]
    fn hourly_points_cover_the_day() {
        let trend = HourlyTrend::from_groups(None, &[]);
        let points = hourly_points(&trend);
        assert_eq!(points.len(), 24);
        assert_eq!(points[0].label, "00:00");
        assert_eq!(points[23].label, "23:00");
    }
}
