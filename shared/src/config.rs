use std::{env, path::Path, str::FromStr};

use anyhow::{Context, Result};
use tracing::warn;

/// Loads `.env` from the calling crate's manifest directory in debug builds.
///
/// A missing `.env` is fine; the process environment is used as-is.
pub fn load_dotenv(manifest_dir: &Path) -> Result<()> {
    if !cfg!(debug_assertions) {
        return Ok(());
    }
    match dotenvy::from_path(manifest_dir.join(".env")) {
        Ok(()) => Ok(()),
        Err(dotenvy::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).context("Failed to read .env file"),
    }
}

/// Reads `key` from the environment and parses it.
///
/// Returns `None` when the variable is unset or empty. Values that fail to
/// parse are reported and ignored so a bad override never blocks startup.
pub fn env_override<T: FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(%key, value = %raw, "ignoring unparseable environment override");
            None
        }
    }
}

/// Load `.env` using the calling crate's manifest directory.
#[macro_export]
macro_rules! load_dotenv {
    () => {
        $crate::config::load_dotenv(std::path::Path::new(env!("CARGO_MANIFEST_DIR")))
    };
}
