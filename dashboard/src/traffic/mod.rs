//! Query and aggregation core over the `traffic` detection table.
//!
//! Everything here is read-only: records are filtered and paged for the
//! table view, or reduced into the three chart aggregations. Hour-of-day and
//! day-of-week are always derived through [`time_bucket`] so the table and
//! the charts agree on local time.

pub mod aggregate;
pub mod direction;
pub mod error;
pub mod filter;
pub mod query;
pub mod record;
pub mod service;
pub mod store;
pub mod time_bucket;

pub use aggregate::{DirectionDistribution, HourlyTrend, WeekdayWeekendTrend};
pub use direction::Direction;
pub use error::TrafficError;
pub use filter::{FilterCriteria, SqlFilter};
pub use query::{PageRequest, PageResult};
pub use record::TrafficRecord;
pub use service::TrafficService;
pub use store::TrafficDb;
pub use time_bucket::{TimeBucket, WeekdayClass};
