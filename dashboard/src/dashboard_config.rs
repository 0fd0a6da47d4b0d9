use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use shared::config::env_override;

use crate::config::{DEFAULT_BIND_ADDR, DEFAULT_PER_PAGE, DEFAULT_QUERY_TIMEOUT};
use crate::paths::{DEFAULT_CONFIG_PATH, DEFAULT_DATABASE_PATH};

pub const CONFIG_PATH_ENV: &str = "TRAFFIC_DASHBOARD_CONFIG";
pub const DATABASE_PATH_ENV: &str = "TRAFFIC_DB_PATH";
pub const BIND_ADDR_ENV: &str = "DASHBOARD_ADDR";
pub const PER_PAGE_ENV: &str = "DASHBOARD_PER_PAGE";
pub const QUERY_TIMEOUT_ENV: &str = "DASHBOARD_QUERY_TIMEOUT_SECS";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    pub database_path: PathBuf,
    pub bind_addr: String,
    pub per_page: u32,
    pub query_timeout_secs: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            bind_addr: DEFAULT_BIND_ADDR.to_owned(),
            per_page: DEFAULT_PER_PAGE,
            query_timeout_secs: DEFAULT_QUERY_TIMEOUT.as_secs(),
        }
    }
}

impl DashboardConfig {
    /// Resolves the settings file (`$TRAFFIC_DASHBOARD_CONFIG` or
    /// `dashboard.toml`), then layers environment overrides on top.
    pub fn load() -> Result<Self> {
        let path = env_override::<PathBuf>(CONFIG_PATH_ENV)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
        let config = load_file(&path)
            .with_context(|| format!("Failed to load dashboard config from {}", path.display()))?;
        Ok(config.with_env_overrides().normalized())
    }

    pub fn with_env_overrides(mut self) -> Self {
        if let Some(path) = env_override(DATABASE_PATH_ENV) {
            self.database_path = path;
        }
        if let Some(addr) = env_override(BIND_ADDR_ENV) {
            self.bind_addr = addr;
        }
        if let Some(per_page) = env_override(PER_PAGE_ENV) {
            self.per_page = per_page;
        }
        if let Some(secs) = env_override(QUERY_TIMEOUT_ENV) {
            self.query_timeout_secs = secs;
        }
        self
    }

    /// Zero page size or timeout fall back to the defaults.
    pub fn normalized(mut self) -> Self {
        if self.per_page == 0 {
            self.per_page = DEFAULT_PER_PAGE;
        }
        if self.query_timeout_secs == 0 {
            self.query_timeout_secs = DEFAULT_QUERY_TIMEOUT.as_secs();
        }
        self
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }
}

/// Loads settings from a TOML file. Returns `DashboardConfig::default()` if
/// the file doesn't exist; propagates other I/O and parse errors.
pub fn load_file(path: &Path) -> io::Result<DashboardConfig> {
    match fs::read_to_string(path) {
        Ok(content) => parse(&content),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(DashboardConfig::default()),
        Err(e) => Err(e),
    }
}

pub fn parse(content: &str) -> io::Result<DashboardConfig> {
    toml::from_str(content).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
