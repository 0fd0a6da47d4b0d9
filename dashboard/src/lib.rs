use std::sync::Arc;

use axum::Router;
use axum::routing::get;

use crate::state::AppState;

pub mod charts;
pub mod config;
pub mod dashboard_config;
pub mod paths;
pub mod routes;
pub mod state;
pub mod styles;
pub mod traffic;
pub mod views;

pub fn router(state: Arc<AppState>) -> Router {
    // JSON chart and record data: /api/*
    let api_routes = Router::new()
        .route("/records", get(routes::records))
        .route("/charts/direction", get(routes::direction_chart))
        .route("/charts/hourly", get(routes::hourly_chart))
        .route(
            "/charts/weekday-weekend",
            get(routes::weekday_weekend_chart),
        );

    Router::new()
        .route("/", get(views::records::index))
        .route("/charts", get(views::charts::charts_page))
        .route("/styles.css", get(views::styles))
        .nest("/api", api_routes)
        .with_state(state)
}
