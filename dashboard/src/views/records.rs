use std::sync::Arc;

use axum::extract::{Query, State};
use maud::{Markup, html};
use serde_json::Value;
use tracing::warn;

use crate::state::AppState;
use crate::styles::{Global as GlobalClass, Records as RecordsClass};
use crate::traffic::{FilterCriteria, PageResult, TrafficRecord};

use super::{FilterQuery, NavItem, direction_select, page_shell, time_bucket_select};

/// How many page numbers to show on either side of the current page.
const PAGE_WINDOW: u64 = 2;

pub async fn index(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FilterQuery>,
) -> Markup {
    let criteria = query.criteria();
    let page = query.page();
    let per_page = state.per_page;

    let result = state
        .run(move |traffic| Ok(traffic.query(&criteria, page, per_page)))
        .await
        .unwrap_or_else(|e| {
            warn!(error = %e, "records page degraded to empty");
            PageResult::empty(per_page)
        });

    let content = html! {
        h1 { "> traffic records" }
        form.(RecordsClass::FILTER_FORM) method="get" action="/" {
            (time_bucket_select(criteria.time_bucket))
            (direction_select(criteria.direction))
            button type="submit" { "[search]" }
            @if !criteria.is_empty() {
                a href="/" { "[clear]" }
            }
        }
        (render_summary(&criteria, &result))
        (render_table(&result.records))
        (render_pagination(&criteria, &result))
    };
    page_shell("Traffic records", NavItem::Records, content)
}

fn render_summary(criteria: &FilterCriteria, result: &PageResult) -> Markup {
    html! {
        div.(RecordsClass::SUMMARY) {
            @if let Some(description) = criteria.describe() {
                "Search " (description) ": "
            }
            @if result.total_records == 0 {
                "no matching records"
            } @else {
                "showing " (result.first_index()) "-" (result.last_index())
                " of " (result.total_records) " records"
                span.(GlobalClass::META) {
                    " (page " (result.page) " of " (result.total_pages) ")"
                }
            }
        }
    }
}

/// Passthrough column names present on this page, without duplicates.
fn extra_columns(records: &[TrafficRecord]) -> Vec<&str> {
    let mut columns: Vec<&str> = Vec::new();
    for record in records {
        for key in record.extra.keys() {
            if !columns.contains(&key.as_str()) {
                columns.push(key.as_str());
            }
        }
    }
    columns
}

fn display_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn render_table(records: &[TrafficRecord]) -> Markup {
    if records.is_empty() {
        return html! {
            div.(RecordsClass::EMPTY_STATE) { "No traffic records to display." }
        };
    }

    let columns = extra_columns(records);
    html! {
        table.(RecordsClass::RECORDS_TABLE) {
            thead {
                tr {
                    th { "time (UTC+8)" }
                    th { "direction" }
                    @for column in &columns {
                        th { (column) }
                    }
                }
            }
            tbody {
                @for record in records {
                    tr {
                        td { (record.formatted_time()) }
                        td { (record.direction_label()) }
                        @for column in &columns {
                            td { (display_value(record.extra.get(*column))) }
                        }
                    }
                }
            }
        }
    }
}

pub fn page_href(criteria: &FilterCriteria, page: u64) -> String {
    let mut params = Vec::new();
    if let Some(bucket) = criteria.time_bucket {
        params.push(format!("time_bucket={}", bucket.name()));
    }
    if let Some(direction) = criteria.direction {
        params.push(format!("direction={}", direction.code()));
    }
    params.push(format!("page={page}"));
    format!("/?{}", params.join("&"))
}

fn render_pagination(criteria: &FilterCriteria, result: &PageResult) -> Markup {
    if result.total_pages <= 1 {
        return html! {};
    }
    let first = result.page.saturating_sub(PAGE_WINDOW).max(1);
    let last = (result.page + PAGE_WINDOW).min(result.total_pages);

    html! {
        nav.(RecordsClass::PAGINATION) {
            @if result.has_previous() {
                a.(RecordsClass::PAGE_LINK) href=(page_href(criteria, 1)) { "« first" }
                a.(RecordsClass::PAGE_LINK) href=(page_href(criteria, result.page - 1)) { "‹ prev" }
            }
            @for page in first..=last {
                @if page == result.page {
                    span.(RecordsClass::PAGE_CURRENT) { (page) }
                } @else {
                    a.(RecordsClass::PAGE_LINK) href=(page_href(criteria, page)) { (page) }
                }
            }
            @if result.has_next() {
                a.(RecordsClass::PAGE_LINK) href=(page_href(criteria, result.page + 1)) { "next ›" }
                a.(RecordsClass::PAGE_LINK) href=(page_href(criteria, result.total_pages)) { "last »" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Map;

    use super::*;
    use crate::traffic::{Direction, TimeBucket};

    #[test]
    fn page_links_preserve_filters() {
        let criteria = FilterCriteria {
            time_bucket: Some(TimeBucket::Evening),
            direction: Some(Direction::NorthToSouth),
        };
        assert_eq!(
            page_href(&criteria, 2),
            "/?time_bucket=evening&direction=1&page=2"
        );
        assert_eq!(page_href(&FilterCriteria::all(), 5), "/?page=5");
    }

    #[test]
    fn extra_columns_are_deduplicated() {
        let record = |pairs: &[(&str, Value)]| TrafficRecord {
            time: 0,
            direction: 1,
            extra: pairs
                .iter()
                .map(|(k, v)| ((*k).to_owned(), v.clone()))
                .collect::<Map<_, _>>(),
        };
        let records = [
            record(&[("id", Value::from(1)), ("plate", Value::from("A1"))]),
            record(&[("id", Value::from(2)), ("lane", Value::from(3))]),
        ];
        let columns = extra_columns(&records);
        assert_eq!(columns.len(), 3);
        assert!(columns.contains(&"lane"));
        assert_eq!(display_value(records[1].extra.get("plate")), "");
        assert_eq!(display_value(records[0].extra.get("plate")), "A1");
    }
}
