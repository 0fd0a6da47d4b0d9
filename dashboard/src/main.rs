use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use traffic_dashboard::dashboard_config::DashboardConfig;
use traffic_dashboard::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    shared::load_dotenv!()?;
    shared::init_tracing!()?;

    let config = DashboardConfig::load()?;
    if !config.database_path.is_file() {
        warn!(
            path = %config.database_path.display(),
            "traffic database not found; pages will show no records and charts will be unavailable"
        );
    }

    let state = Arc::new(AppState::new(&config));
    let app = traffic_dashboard::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr))?;
    info!(addr = %config.bind_addr, db = %config.database_path.display(), "traffic dashboard listening");
    axum::serve(listener, app)
        .await
        .context("server error")?;

    Ok(())
}
