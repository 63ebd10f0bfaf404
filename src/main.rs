//! CLI entry point for sensor-bridge.
//!
//! Loads configuration from the environment (`INTERVAL`, `DECODER`,
//! `REQUEST_TIMEOUT_MS`, `LOG_LEVEL`), initializes tracing, wires the
//! pipeline context, and runs the scheduler until Ctrl-C.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use sensor_bridge::config::PipelineConfig;
use sensor_bridge::dispatch::LogSink;
use sensor_bridge::pipeline::{self, PipelineContext};
use sensor_bridge::sensor::SimulatedSensor;
use sensor_bridge::tracing_setup;
use tokio::sync::watch;
use tracing::info;

#[derive(Parser)]
#[command(name = "sensor-bridge")]
#[command(about = "Periodic sensor sampling bridge with HTTP decode", long_about = None)]
struct Cli {
    /// Override the sampling interval in milliseconds.
    #[arg(long)]
    interval: Option<u64>,

    /// Override the decoder endpoint URL.
    #[arg(long)]
    decoder: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = PipelineConfig::from_env().context("loading configuration")?;
    if let Some(interval) = cli.interval {
        config.interval = interval;
    }
    if let Some(decoder) = cli.decoder {
        config.decoder = decoder;
    }
    config.validate().context("validating configuration")?;

    tracing_setup::init(&config.log_level).map_err(anyhow::Error::msg)?;

    info!("Interval set from ENV to: {}", config.interval);
    info!("Decoder set from ENV to: {}", config.decoder);

    // The sink must be ready before the first tick is scheduled. LogSink
    // has no connection to open; a real hub sink would connect here.
    let sink = Arc::new(LogSink);
    let sensor = Arc::new(SimulatedSensor::new());
    let context = Arc::new(
        PipelineContext::new(config, sink, sensor).context("building pipeline context")?,
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let scheduler = tokio::spawn(pipeline::run(context, shutdown_rx));

    tokio::signal::ctrl_c()
        .await
        .context("waiting for shutdown signal")?;
    info!("Shutdown signal received, stopping scheduler");
    let _ = shutdown_tx.send(true);

    scheduler.await.context("scheduler task panicked")?;
    Ok(())
}
