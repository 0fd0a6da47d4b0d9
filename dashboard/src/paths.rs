//! Default on-disk locations.

pub const DEFAULT_DATABASE_PATH: &str = "data/traffic.db";
pub const DEFAULT_CONFIG_PATH: &str = "dashboard.toml";
