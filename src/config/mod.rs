mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::Path;
use streamcat_common::Error;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    // Try default locations
    let default_paths = [
        "./config.toml",
        "./streamcat.toml",
        "~/.config/streamcat/config.toml",
        "/etc/streamcat/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Apply `PORT`, `REFRESH_INTERVAL` and `NODE_ENV` from the process environment.
pub fn apply_env_overrides(config: &mut Config) -> Result<()> {
    apply_overrides_from(config, |name| std::env::var(name).ok())?;
    validate_config(config)?;
    Ok(())
}

/// Apply environment overrides using `lookup` to resolve variable names.
pub fn apply_overrides_from<F>(config: &mut Config, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = lookup("PORT") {
        config.server.port = port
            .trim()
            .parse()
            .with_context(|| format!("Invalid PORT value: {port:?}"))?;
    }

    if let Some(interval) = lookup("REFRESH_INTERVAL") {
        config.catalog.refresh_interval_ms = interval
            .trim()
            .parse()
            .with_context(|| format!("Invalid REFRESH_INTERVAL value: {interval:?}"))?;
    }

    if lookup("NODE_ENV").as_deref() == Some("production") {
        config.logging.production = true;
    }

    Ok(())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> streamcat_common::Result<()> {
    if config.server.port == 0 {
        return Err(Error::config("Server port cannot be 0"));
    }

    if config.catalog.refresh_interval_ms == 0 {
        return Err(Error::config("Refresh interval cannot be 0"));
    }

    if config.catalog.buckets.is_empty() {
        return Err(Error::config("At least one catalog bucket must be configured"));
    }

    let mut seen = HashSet::new();
    for bucket in &config.catalog.buckets {
        if bucket.key.is_empty() {
            return Err(Error::config("Bucket key cannot be empty"));
        }
        if !seen.insert(bucket.key.as_str()) {
            return Err(Error::config(format!("Duplicate bucket key '{}'", bucket.key)));
        }
        if bucket.providers.is_empty() {
            return Err(Error::config(format!("Bucket '{}' has no providers", bucket.key)));
        }
        if bucket.region.trim().is_empty() {
            return Err(Error::config(format!("Bucket '{}' has no region", bucket.key)));
        }
    }

    if config.gateway.page_size == 0 {
        return Err(Error::config("Gateway page size cannot be 0"));
    }

    if config.gateway.requests_per_second == 0 {
        return Err(Error::config("Gateway rate limit cannot be 0"));
    }

    if let Some(dir) = &config.server.static_dir {
        if !dir.exists() {
            tracing::warn!("Static directory does not exist: {:?}", dir);
        }
    }

    Ok(())
}
