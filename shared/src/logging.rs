use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;

/// Installs the global `fmt` subscriber, filtered by `RUST_LOG` (default `info`).
///
/// `crate_name` is the calling crate, so its own events default to `debug`
/// in debug builds.
pub fn init_tracing(crate_name: &str) -> Result<()> {
    let default_level = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("info,{}={default_level}", crate_name.replace('-', "_")))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow!("failed to install tracing subscriber: {e}"))
}

/// Initialise tracing for the calling crate.
#[macro_export]
macro_rules! init_tracing {
    () => {
        $crate::logging::init_tracing(env!("CARGO_PKG_NAME"))
    };
}
