use std::time::Duration;

use tracing::info_span;

use crate::dashboard_config::DashboardConfig;
use crate::traffic::{TrafficError, TrafficService};

pub struct AppState {
    pub traffic: TrafficService,
    pub per_page: u32,
    pub query_timeout: Duration,
}

impl AppState {
    pub fn new(config: &DashboardConfig) -> Self {
        let span = info_span!("traffic", db = %config.database_path.display());
        AppState {
            traffic: TrafficService::new(config.database_path.clone(), span),
            per_page: config.per_page,
            query_timeout: config.query_timeout(),
        }
    }

    /// Runs a blocking store call off the async runtime, bounded by the
    /// configured query timeout.
    pub async fn run<T, F>(&self, f: F) -> Result<T, TrafficError>
    where
        F: FnOnce(&TrafficService) -> Result<T, TrafficError> + Send + 'static,
        T: Send + 'static,
    {
        let service = self.traffic.clone();
        let task = tokio::task::spawn_blocking(move || f(&service));
        match tokio::time::timeout(self.query_timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => Err(TrafficError::Task(e.to_string())),
            Err(_) => Err(TrafficError::Timeout(self.query_timeout)),
        }
    }
}
