use std::path::Path;

use super::{schema::Config, validate::ConfigError};

pub const DEFAULT_CONFIG_PATH: &str = "fleetwatch.toml";
pub const CONFIG_PATH_ENV: &str = "FLEETWATCH_CONFIG";

/// Config file location, overridable through `FLEETWATCH_CONFIG`.
pub fn config_path() -> String {
    std::env::var(CONFIG_PATH_ENV)
        .ok()
        .filter(|path| !path.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string())
}

pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let path_str = path.display().to_string();
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path_str.clone(),
        source,
    })?;
    let config: Config = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path_str,
        source,
    })?;
    config.validate()?;
    Ok(config)
}
