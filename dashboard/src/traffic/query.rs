use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_PER_PAGE;

use super::error::TrafficError;
use super::filter::{FilterCriteria, SqlFilter};
use super::record::TrafficRecord;
use super::store::TrafficDb;

/// Requested page. `page` is caller-supplied and may be out of range; it is
/// clamped during execution rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: i64,
    pub per_page: u32,
}

impl PageRequest {
    /// A zero `per_page` falls back to [`DEFAULT_PER_PAGE`].
    pub const fn new(page: i64, per_page: u32) -> Self {
        let per_page = if per_page == 0 {
            DEFAULT_PER_PAGE
        } else {
            per_page
        };
        PageRequest { page, per_page }
    }

    pub const fn first(per_page: u32) -> Self {
        PageRequest::new(1, per_page)
    }

    /// `page` with values below 1 raised to 1.
    pub fn lower_clamped_page(&self) -> u64 {
        u64::try_from(self.page).unwrap_or(0).max(1)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageResult {
    pub records: Vec<TrafficRecord>,
    pub total_records: u64,
    pub total_pages: u64,
    /// The page actually returned, after clamping.
    pub page: u64,
    pub per_page: u32,
}

impl PageResult {
    pub const fn empty(per_page: u32) -> Self {
        PageResult {
            records: Vec::new(),
            total_records: 0,
            total_pages: 0,
            page: 1,
            per_page,
        }
    }

    /// 1-based index of the first record on this page, 0 when empty.
    pub fn first_index(&self) -> u64 {
        if self.records.is_empty() {
            0
        } else {
            (self.page - 1) * u64::from(self.per_page) + 1
        }
    }

    pub fn last_index(&self) -> u64 {
        if self.records.is_empty() {
            0
        } else {
            self.first_index() + self.records.len() as u64 - 1
        }
    }

    pub const fn has_previous(&self) -> bool {
        self.page > 1 && self.total_pages > 0
    }

    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

pub fn total_pages(total_records: u64, per_page: u32) -> u64 {
    total_records.div_ceil(u64::from(per_page.max(1)))
}

/// Runs one paginated search against an open handle.
///
/// Counts all matches first; a page past the end is answered as the last
/// page. Records come back in the store's natural row order, which is only
/// stable while the table is not being written to.
pub fn execute(
    db: &TrafficDb,
    criteria: &FilterCriteria,
    request: PageRequest,
) -> Result<PageResult, TrafficError> {
    let filter = SqlFilter::build(criteria);
    let total_records = db.count(&filter)?;
    if total_records == 0 {
        return Ok(PageResult::empty(request.per_page));
    }

    let total_pages = total_pages(total_records, request.per_page);
    let page = request.lower_clamped_page().min(total_pages);
    let offset = (page - 1) * u64::from(request.per_page);
    let records = db.select(&filter, request.per_page, offset)?;

    Ok(PageResult {
        records,
        total_records,
        total_pages,
        page,
        per_page: request.per_page,
    })
}
