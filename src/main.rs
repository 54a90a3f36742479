mod cli;

use streamcat::{
    config::{self, Config},
    gateway::{CatalogGateway, JustWatchGateway},
    logging::init_logging,
    server,
};
use streamcat_common::MediaType;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{CatalogKind, Cli, Commands};
use std::sync::Arc;

/// Load the config file (if any) and apply environment overrides.
fn resolve_config(path: Option<&std::path::Path>) -> Result<Config> {
    let mut config = config::load_config_or_default(path)?;
    config::apply_env_overrides(&mut config)?;
    Ok(config)
}

async fn start_server(config: Config) -> Result<()> {
    tracing::info!("Starting streamcat server");
    tracing::info!(
        "Server will listen on {}:{}",
        config.server.host,
        config.server.port
    );

    let gateway: Arc<dyn CatalogGateway> = Arc::new(JustWatchGateway::new(&config.gateway)?);
    server::start_server(config, gateway).await
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Start { host, port } => {
            let mut config = resolve_config(cli.config.as_deref())?;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            config::validate_config(&config)?;
            init_logging(cli.verbose, &config)?;

            // Create tokio runtime
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(config))
        }
        Commands::Fetch { kind, bucket, json } => {
            let config = resolve_config(cli.config.as_deref())?;
            init_logging(cli.verbose, &config)?;

            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(fetch_bucket(&config, kind, &bucket, json))
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("streamcat {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

async fn fetch_bucket(config: &Config, kind: CatalogKind, key: &str, json: bool) -> Result<()> {
    let bucket = config
        .catalog
        .buckets
        .iter()
        .find(|b| b.key == key)
        .with_context(|| format!("Unknown bucket: {key}"))?;

    let media_type = match kind {
        CatalogKind::Movie => MediaType::Movie,
        CatalogKind::Series => MediaType::Show,
    };

    let gateway = JustWatchGateway::new(&config.gateway)?;
    let metas = gateway
        .fetch_category(media_type, &bucket.providers, &bucket.region)
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&metas)?);
    } else {
        println!(
            "{} / {} ({} @ {}): {} titles",
            media_type,
            bucket.name,
            bucket.providers.join(","),
            bucket.region,
            metas.len()
        );
        for (i, meta) in metas.iter().enumerate() {
            println!("  {:>3}. {} [{}]", i + 1, meta.name, meta.id);
        }
    }

    Ok(())
}

fn validate_config(path: Option<&std::path::Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            println!("  Server: {}:{}", config.server.host, config.server.port);
            println!(
                "  Refresh interval: {} ms",
                config.catalog.refresh_interval_ms
            );
            println!("  Gateway: {}", config.gateway.url);
            println!("  Buckets: {}", config.catalog.buckets.len());
            for bucket in &config.catalog.buckets {
                println!(
                    "    {} ({}): {} @ {}",
                    bucket.key,
                    bucket.name,
                    bucket.providers.join(","),
                    bucket.region
                );
            }
        }
        None => {
            println!("No config file specified, using defaults");
            let config = Config::default();
            println!("Default config:");
            println!("  Server: {}:{}", config.server.host, config.server.port);
            println!("  Buckets: {}", config.catalog.buckets.len());
        }
    }

    Ok(())
}
