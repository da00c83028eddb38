//! Configuration loader with file and environment variable support

use crate::{AppConfig, ConfigError, StoreBackend};
use std::env;
use std::path::PathBuf;
use tracing::{info, warn};

/// Standard config file search paths
const CONFIG_PATHS: &[&str] = &[
    "config.toml",
    "library.toml",
    "./config/library.toml",
    "/etc/library/config.toml",
];

/// Explicit config file location
const CONFIG_ENV: &str = "LIBRARY_CONFIG";

pub struct ConfigLoader {
    config_path: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self { config_path: None }
    }

    /// Create a loader with a specific config file path
    pub fn with_path<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            config_path: Some(path.into()),
        }
    }

    /// Load configuration from file (if found) with environment variable overrides,
    /// then validate the result.
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        let mut config = match self.find_config_file() {
            Some(path) => {
                info!(?path, "Loading configuration from file");
                AppConfig::from_file(&path)?
            }
            None => AppConfig::default(),
        };

        apply_overrides(&mut config, |key| env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    fn find_config_file(&self) -> Option<PathBuf> {
        if let Some(path) = &self.config_path {
            if path.exists() {
                return Some(path.clone());
            }
            warn!(?path, "Configured config file does not exist");
        }

        if let Ok(path) = env::var(CONFIG_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        CONFIG_PATHS
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply `LIBRARY_*` overrides using the given variable lookup.
///
/// Values that fail to parse are ignored and the file/default value is kept.
pub(crate) fn apply_overrides<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    // HTTP
    if let Some(port) = lookup("LIBRARY_HTTP_PORT").and_then(|v| v.parse().ok()) {
        config.http.port = port;
    }
    if let Some(host) = lookup("LIBRARY_HTTP_HOST") {
        config.http.host = host;
    }
    if let Some(origins) = lookup("LIBRARY_CORS_ORIGINS") {
        config.http.cors_origins = origins
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }

    // Store
    if let Some(backend) = lookup("LIBRARY_STORE_BACKEND") {
        match StoreBackend::parse(&backend) {
            Some(backend) => config.store.backend = backend,
            None => warn!(value = %backend, "Ignoring unknown LIBRARY_STORE_BACKEND"),
        }
    }
    if let Some(url) = lookup("LIBRARY_SQLITE_URL") {
        config.store.sqlite_url = url;
    }
    if let Some(max) = lookup("LIBRARY_STORE_MAX_CONNECTIONS").and_then(|v| v.parse().ok()) {
        config.store.max_connections = max;
    }

    // Seed
    if let Some(enabled) = lookup("LIBRARY_SEED_ENABLED") {
        match parse_bool(&enabled) {
            Some(enabled) => config.seed.enabled = enabled,
            None => warn!(value = %enabled, "Ignoring unrecognised LIBRARY_SEED_ENABLED"),
        }
    }
}

/// `true`/`false`, `1`/`0`, `yes`/`no`, `on`/`off`, any case.
fn parse_bool(value: &str) -> Option<bool> {
    let value = value.trim();
    if ["true", "1", "yes", "on"].iter().any(|t| value.eq_ignore_ascii_case(t)) {
        Some(true)
    } else if ["false", "0", "no", "off"].iter().any(|f| value.eq_ignore_ascii_case(f)) {
        Some(false)
    } else {
        None
    }
}
