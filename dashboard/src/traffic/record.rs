use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use serde_json::{Map, Value};

use super::direction::{self, Direction};
use super::time_bucket;

pub const LOCAL_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One detected vehicle crossing.
///
/// Only `time` and `direction` are interpreted; every other column of the
/// row is carried through untouched in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrafficRecord {
    /// UTC epoch seconds.
    pub time: i64,
    pub direction: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TrafficRecord {
    pub fn local_time(&self) -> Option<DateTime<FixedOffset>> {
        time_bucket::to_local(self.time)
    }

    pub fn formatted_time(&self) -> String {
        match self.local_time() {
            Some(local) => local.format(LOCAL_TIME_FORMAT).to_string(),
            None => format!("invalid timestamp {}", self.time),
        }
    }

    pub fn direction(&self) -> Option<Direction> {
        Direction::from_code(self.direction)
    }

    pub fn direction_label(&self) -> &'static str {
        direction::label_for_code(self.direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_in_local_time() {
        let record = TrafficRecord {
            time: 1_704_069_000,
            direction: 3,
            extra: Map::new(),
        };
        assert_eq!(record.formatted_time(), "2024-01-01 08:30:00");
        assert_eq!(record.direction(), Some(Direction::EastToWest));
        assert_eq!(record.direction_label(), "East → West");
    }

    #[test]
    fn passthrough_columns_flatten_into_json() {
        let mut extra = Map::new();
        extra.insert("plate".to_owned(), Value::from("A12345"));
        let record = TrafficRecord {
            time: 0,
            direction: 9,
            extra,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["plate"], "A12345");
        assert_eq!(json["direction"], 9);
        assert_eq!(record.direction_label(), "Unknown direction");
    }
}
