//! Behavioral constants for local-time derivation, paging, and chart rendering.

use std::time::Duration;

/// Fixed local offset applied to every stored UTC timestamp before the hour
/// or day of week is extracted. Not configurable.
pub const LOCAL_UTC_OFFSET_HOURS: i32 = 8;
pub const LOCAL_UTC_OFFSET_SECONDS: i32 = LOCAL_UTC_OFFSET_HOURS * 3600;

pub const DEFAULT_PER_PAGE: u32 = 20;
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5001";

/// Fixed divisors for the weekday/weekend hourly averages. These assume the
/// data covers whole weeks; they are not derived from the calendar days
/// actually present.
pub const WEEKDAY_DIVISOR: f64 = 5.0;
pub const WEEKEND_DIVISOR: f64 = 2.0;

pub const HOURS_PER_DAY: u8 = 24;
