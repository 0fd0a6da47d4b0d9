use serde::{Deserialize, Serialize};

pub const UNKNOWN_DIRECTION_LABEL: &str = "Unknown direction";

/// Crossing direction of a detected vehicle, stored as codes 1-4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    NorthToSouth,
    SouthToNorth,
    EastToWest,
    WestToEast,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::NorthToSouth,
        Direction::SouthToNorth,
        Direction::EastToWest,
        Direction::WestToEast,
    ];

    pub const fn code(self) -> i64 {
        match self {
            Direction::NorthToSouth => 1,
            Direction::SouthToNorth => 2,
            Direction::EastToWest => 3,
            Direction::WestToEast => 4,
        }
    }

    pub const fn from_code(code: i64) -> Option<Direction> {
        match code {
            1 => Some(Direction::NorthToSouth),
            2 => Some(Direction::SouthToNorth),
            3 => Some(Direction::EastToWest),
            4 => Some(Direction::WestToEast),
            _ => None,
        }
    }

    /// Parses a boundary value such as a `?direction=` query param.
    ///
    /// Blank or unrecognised input means "no direction constraint" and
    /// yields `None`.
    pub fn parse(raw: &str) -> Option<Direction> {
        raw.trim().parse::<i64>().ok().and_then(Direction::from_code)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Direction::NorthToSouth => "North → South",
            Direction::SouthToNorth => "South → North",
            Direction::EastToWest => "East → West",
            Direction::WestToEast => "West → East",
        }
    }
}

/// Display text for a stored direction code, including codes outside 1-4.
pub fn label_for_code(code: i64) -> &'static str {
    Direction::from_code(code).map_or(UNKNOWN_DIRECTION_LABEL, Direction::label)
}
