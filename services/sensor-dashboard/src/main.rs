//! Sensor dashboard CLI
//!
//! Command-line interface for the polling sensor dashboard.

use std::path::PathBuf;

use clap::Parser;
use sensor_dashboard::classify::{classify, format_temperature};
use sensor_dashboard::config::API_URL_ENV;
use sensor_dashboard::reading::latest_per_sensor;
use sensor_dashboard::source::ReadingSource;
use sensor_dashboard::{load_config, Config};
use tracing::Level;

#[derive(Parser)]
#[command(name = "sensor-dashboard")]
#[command(about = "Polling sensor dashboard")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Sensor endpoint URL (overrides config file and SENSOR_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Polling interval in milliseconds (overrides config file)
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Dashboard port (overrides config file)
    #[arg(long)]
    dashboard_port: Option<u16>,

    /// Fetch once, print the latest reading per sensor and exit
    #[arg(long)]
    once: bool,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: Level,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    tracing::debug!(
        "Parsed command line arguments: config={:?}, api_url={:?}, interval_ms={:?}, dashboard_port={:?}, once={}",
        args.config,
        args.api_url,
        args.interval_ms,
        args.dashboard_port,
        args.once
    );

    let mut config = if let Some(config_path) = &args.config {
        tracing::debug!("Loading configuration from {:?}", config_path);
        load_config(config_path)?
    } else {
        tracing::debug!("Using default configuration");
        Config::default()
    };

    config.apply_env_url(std::env::var(API_URL_ENV).ok());

    if let Some(api_url) = args.api_url {
        config.source.url = api_url;
    }
    if let Some(interval_ms) = args.interval_ms {
        config.polling.interval_ms = interval_ms;
    }
    if let Some(dashboard_port) = args.dashboard_port {
        config.dashboard.port = dashboard_port;
    }

    config.validate()?;

    if args.once {
        let source = sensor_dashboard::build_source(&config)?;
        let readings = source.fetch().await?;
        println!("{:>8}  {:>10}  STATUS", "SENSOR", "TEMP");
        for reading in latest_per_sensor(&readings) {
            println!(
                "{:>8}  {:>10}  {}",
                reading.sensor_id,
                format_temperature(reading.temperature),
                classify(reading.temperature)
            );
        }
        return Ok(());
    }

    tracing::info!("Starting sensor dashboard for {}", config.source.url);
    tracing::debug!(
        "Interval: {} ms, dashboard enabled: {}, port: {}",
        config.polling.interval_ms,
        config.dashboard.enabled,
        config.dashboard.port
    );

    sensor_dashboard::run(config).await?;

    Ok(())
}
