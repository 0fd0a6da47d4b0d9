use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::{Json, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::warn;

use crate::charts;
use crate::state::AppState;
use crate::traffic::direction::label_for_code;
use crate::traffic::{PageResult, TrafficError};
use crate::views::FilterQuery;

#[derive(Serialize)]
pub struct ApiError {
    code: &'static str,
    message: String,
}

/// Chart data could not be read. Answered as 503 so the client can show an
/// "unavailable" state distinct from an empty chart.
pub struct ChartUnavailable(TrafficError);

impl From<TrafficError> for ChartUnavailable {
    fn from(e: TrafficError) -> Self {
        ChartUnavailable(e)
    }
}

impl IntoResponse for ChartUnavailable {
    fn into_response(self) -> Response {
        warn!(error = %self.0, "chart data unavailable");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiError {
                code: "CHART_UNAVAILABLE",
                message: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

pub async fn records(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FilterQuery>,
) -> Json<PageResult> {
    let criteria = query.criteria();
    let page = query.page();
    let per_page = state.per_page;

    let result = state
        .run(move |traffic| Ok(traffic.query(&criteria, page, per_page)))
        .await
        .unwrap_or_else(|e| {
            warn!(error = %e, "records query degraded to empty");
            PageResult::empty(per_page)
        });
    Json(result)
}

#[derive(Serialize)]
pub struct DirectionPoint {
    direction: i64,
    label: &'static str,
    count: u64,
}

#[derive(Serialize)]
pub struct DirectionChart {
    title: String,
    points: Vec<DirectionPoint>,
}

pub async fn direction_chart(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<DirectionChart>, ChartUnavailable> {
    let time_bucket = query.criteria().time_bucket;
    let distribution = state
        .run(move |traffic| traffic.direction_distribution(time_bucket))
        .await?;

    Ok(Json(DirectionChart {
        title: charts::direction_title(time_bucket),
        points: distribution
            .counts
            .iter()
            .map(|(&direction, &count)| DirectionPoint {
                direction,
                label: label_for_code(direction),
                count,
            })
            .collect(),
    }))
}

#[derive(Serialize)]
pub struct HourlyChart {
    title: String,
    counts: BTreeMap<u8, u64>,
}

pub async fn hourly_chart(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<HourlyChart>, ChartUnavailable> {
    let direction = query.criteria().direction;
    let trend = state
        .run(move |traffic| traffic.hourly_trend(direction))
        .await?;

    Ok(Json(HourlyChart {
        title: charts::hourly_title(direction),
        counts: trend.counts,
    }))
}

#[derive(Serialize)]
pub struct WeekdayWeekendChart {
    title: String,
    weekday: BTreeMap<u8, f64>,
    weekend: BTreeMap<u8, f64>,
}

pub async fn weekday_weekend_chart(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<WeekdayWeekendChart>, ChartUnavailable> {
    let direction = query.criteria().direction;
    let trend = state
        .run(move |traffic| traffic.weekday_weekend_trend(direction))
        .await?;

    Ok(Json(WeekdayWeekendChart {
        title: charts::weekday_weekend_title(direction),
        weekday: trend.weekday,
        weekend: trend.weekend,
    }))
}
