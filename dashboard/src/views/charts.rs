use std::sync::Arc;

use axum::extract::{Query, State};
use maud::{Markup, html};
use tracing::warn;

use crate::charts::{self, svg};
use crate::state::AppState;
use crate::styles::Charts as ChartClass;
use crate::traffic::TrafficError;

use super::{FilterQuery, NavItem, direction_select, page_shell, time_bucket_select};

/// Chart output, or the reason it could not be produced. Each chart is
/// resolved independently so one failing read doesn't blank the others.
fn chart_or_placeholder<T>(
    title: &str,
    result: Result<T, TrafficError>,
    is_empty: impl FnOnce(&T) -> bool,
    render: impl FnOnce(&T) -> Markup,
) -> Markup {
    match result {
        Ok(data) if is_empty(&data) => svg::empty_chart(title),
        Ok(data) => render(&data),
        Err(e) => {
            warn!(error = %e, chart = %title, "chart unavailable");
            svg::unavailable_chart(title)
        }
    }
}

pub async fn charts_page(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FilterQuery>,
) -> Markup {
    let criteria = query.criteria();
    let (time_bucket, direction) = (criteria.time_bucket, criteria.direction);

    let (distribution, hourly, weekly) = tokio::join!(
        state.run(move |traffic| traffic.direction_distribution(time_bucket)),
        state.run(move |traffic| traffic.hourly_trend(direction)),
        state.run(move |traffic| traffic.weekday_weekend_trend(direction)),
    );

    let direction_title = charts::direction_title(time_bucket);
    let direction_chart = chart_or_placeholder(
        &direction_title,
        distribution,
        |d| d.is_empty(),
        |d| svg::render_bar_chart(&charts::direction_points(d), &direction_title),
    );

    let hourly_title = charts::hourly_title(direction);
    let hourly_chart = chart_or_placeholder(
        &hourly_title,
        hourly,
        |t| t.total() == 0,
        |t| {
            let series = [charts::ChartSeries {
                name: "Vehicles",
                points: charts::hourly_points(t),
            }];
            svg::render_line_chart(&series, &hourly_title)
        },
    );

    let weekly_title = charts::weekday_weekend_title(direction);
    let weekly_chart = chart_or_placeholder(
        &weekly_title,
        weekly,
        |t| t.is_empty(),
        |t| svg::render_line_chart(&charts::weekday_weekend_series(t), &weekly_title),
    );

    let content = html! {
        h1 { "> traffic charts" }
        div.(ChartClass::CHART_GRID) {
            div.(ChartClass::CHART_CONTAINER) {
                div.(ChartClass::CHART_HEADER) {
                    span { "direction distribution" }
                    form.(ChartClass::CHART_FILTER) method="get" action="/charts" {
                        (time_bucket_select(time_bucket))
                        @if let Some(direction) = direction {
                            input type="hidden" name="direction" value=(direction.code());
                        }
                        button type="submit" { "[apply]" }
                    }
                }
                (direction_chart)
            }
            div.(ChartClass::CHART_CONTAINER) {
                div.(ChartClass::CHART_HEADER) {
                    span { "hourly trends" }
                    form.(ChartClass::CHART_FILTER) method="get" action="/charts" {
                        (direction_select(direction))
                        @if let Some(bucket) = time_bucket {
                            input type="hidden" name="time_bucket" value=(bucket.name());
                        }
                        button type="submit" { "[apply]" }
                    }
                }
                (hourly_chart)
            }
            div.(ChartClass::CHART_CONTAINER) {
                (weekly_chart)
            }
        }
    };
    page_shell("Traffic charts", NavItem::Charts, content)
}
