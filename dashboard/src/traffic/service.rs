use std::path::{Path, PathBuf};

use tracing::{Span, debug, info, warn};

use super::aggregate::{self, DirectionDistribution, HourlyTrend, WeekdayWeekendTrend};
use super::direction::Direction;
use super::error::TrafficError;
use super::filter::FilterCriteria;
use super::query::{self, PageRequest, PageResult};
use super::store::TrafficDb;
use super::time_bucket::TimeBucket;

/// Entry point for table and chart reads.
///
/// Each call opens its own [`TrafficDb`] handle and drops it before
/// returning. Diagnostics are emitted under the span supplied at
/// construction.
#[derive(Debug, Clone)]
pub struct TrafficService {
    db_path: PathBuf,
    span: Span,
}

impl TrafficService {
    pub fn new(db_path: impl Into<PathBuf>, span: Span) -> Self {
        TrafficService {
            db_path: db_path.into(),
            span,
        }
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    fn open(&self) -> Result<TrafficDb, TrafficError> {
        let mut db = TrafficDb::new(&self.db_path);
        if let Err(e) = db.try_connect() {
            warn!(parent: &self.span, error = %e, "traffic database connection failed");
            return Err(e);
        }
        Ok(db)
    }

    /// Filtered, paginated records for the table view.
    ///
    /// Unlike the chart aggregations, failures here degrade to an empty page
    /// with zero counts instead of an error: the table has no separate
    /// "unavailable" state, while an empty chart would be indistinguishable
    /// from "no data".
    pub fn query(&self, criteria: &FilterCriteria, page: i64, per_page: u32) -> PageResult {
        let request = PageRequest::new(page, per_page);
        let result = self
            .open()
            .and_then(|db| query::execute(&db, criteria, request));
        match result {
            Ok(result) => {
                if let Some(description) = criteria.describe() {
                    info!(
                        parent: &self.span,
                        search = %description,
                        total_records = result.total_records,
                        "filtered search"
                    );
                }
                result
            }
            Err(e) => {
                warn!(parent: &self.span, error = %e, "page query failed, returning empty page");
                PageResult::empty(request.per_page)
            }
        }
    }

    pub fn direction_distribution(
        &self,
        time_bucket: Option<TimeBucket>,
    ) -> Result<DirectionDistribution, TrafficError> {
        let db = self.open()?;
        let distribution = aggregate::direction_distribution(&db, time_bucket)?;
        debug!(
            parent: &self.span,
            time_bucket = time_bucket.map(TimeBucket::name),
            total = distribution.total(),
            directions = distribution.counts.len(),
            "direction distribution"
        );
        Ok(distribution)
    }

    pub fn hourly_trend(&self, direction: Option<Direction>) -> Result<HourlyTrend, TrafficError> {
        let db = self.open()?;
        let trend = aggregate::hourly_trend(&db, direction)?;
        debug!(
            parent: &self.span,
            direction = direction.map(Direction::code),
            total = trend.total(),
            skipped_records = trend.skipped_records,
            "hourly trend"
        );
        Ok(trend)
    }

    pub fn weekday_weekend_trend(
        &self,
        direction: Option<Direction>,
    ) -> Result<WeekdayWeekendTrend, TrafficError> {
        let db = self.open()?;
        let trend = aggregate::weekday_weekend_trend(&db, direction)?;
        debug!(
            parent: &self.span,
            direction = direction.map(Direction::code),
            weekday_records = trend.weekday_records,
            weekend_records = trend.weekend_records,
            skipped_records = trend.skipped_records,
            "weekday/weekend trend"
        );
        Ok(trend)
    }
}
