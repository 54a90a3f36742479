//! Tracing subscriber setup.
//!
//! Console output is filtered by `RUST_LOG` (or a default based on the
//! verbose flag). In production mode warnings and errors are additionally
//! appended to the configured error log, and panics are reported through
//! tracing.

use anyhow::{Context, Result};
use std::sync::Mutex;
use tracing::Subscriber;
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*, EnvFilter};

use crate::config::Config;

/// Build the subscriber without installing it.
pub fn build_subscriber(
    verbose: bool,
    config: &Config,
) -> Result<impl Subscriber + Send + Sync + 'static> {
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if verbose {
            "streamcat=trace,streamcat_common=trace,tower_http=debug".to_string()
        } else {
            "streamcat=info,tower_http=info".to_string()
        }
    });

    let console = fmt::layer().with_filter(EnvFilter::new(&env_filter));

    let error_log = if config.logging.production {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.logging.error_log)
            .with_context(|| {
                format!("Failed to open error log: {:?}", config.logging.error_log)
            })?;
        Some(
            fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .with_filter(LevelFilter::WARN),
        )
    } else {
        None
    };

    Ok(tracing_subscriber::registry().with(console).with(error_log))
}

/// Install the global subscriber, plus the panic hook in production mode.
pub fn init_logging(verbose: bool, config: &Config) -> Result<()> {
    build_subscriber(verbose, config)?.init();

    if config.logging.production {
        std::panic::set_hook(Box::new(|info| {
            tracing::error!(panic = %info, "Uncaught panic");
        }));
        tracing::info!(
            "Production mode: errors are also written to {:?}",
            config.logging.error_log
        );
    }

    Ok(())
}
