use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::catalog::BucketSpec;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub gateway: GatewayConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Optional directory of static files (configuration page) served as
    /// fallback for unmatched routes.
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    9000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// Milliseconds between refresh cycles (default: 6 hours)
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_ms: u64,

    /// Buckets fetched for every media type, in manifest order
    #[serde(default = "default_buckets")]
    pub buckets: Vec<BucketSpec>,
}

fn default_refresh_interval() -> u64 {
    21_600_000
}

pub fn default_buckets() -> Vec<BucketSpec> {
    vec![
        BucketSpec::new("trend", "Trending", &["nfx", "atp", "hbm"], "US"),
        BucketSpec::new("nfx", "Netflix", &["nfx"], "US"),
        BucketSpec::new("lin", "Line", &["nfx", "atp", "lin"], "JP"),
    ]
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            refresh_interval_ms: default_refresh_interval(),
            buckets: default_buckets(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GatewayConfig {
    /// GraphQL endpoint of the upstream catalog API
    #[serde(default = "default_gateway_url")]
    pub url: String,

    /// Language requested for titles and descriptions
    #[serde(default = "default_language")]
    pub language: String,

    /// Number of titles requested per bucket (default: 100)
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Per-request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Token-bucket rate limit for upstream requests (default: 4)
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
}

fn default_gateway_url() -> String {
    "https://apis.justwatch.com/graphql".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_page_size() -> u32 {
    100
}

fn default_timeout() -> u64 {
    30
}

fn default_requests_per_second() -> u32 {
    4
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            url: default_gateway_url(),
            language: default_language(),
            page_size: default_page_size(),
            timeout_secs: default_timeout(),
            requests_per_second: default_requests_per_second(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Production mode: warnings and errors are also written to `error_log`
    #[serde(default)]
    pub production: bool,

    #[serde(default = "default_error_log")]
    pub error_log: PathBuf,
}

fn default_error_log() -> PathBuf {
    PathBuf::from("error.log")
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            production: false,
            error_log: default_error_log(),
        }
    }
}
