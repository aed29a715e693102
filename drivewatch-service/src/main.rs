// SPDX-License-Identifier: GPL-3.0-only

//! drivewatch - operate the telemetry pipeline against a local data dir
//!
//! The serving layer is out of tree; this binary drives the same facade for
//! operators and scripts: register devices, push smartctl JSON, inspect
//! summaries, exercise the notification endpoints.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

use drivewatch_service::{Monitor, ServiceConfig};
use drivewatch_types::DeviceIdentity;

#[derive(Parser)]
#[command(name = "drivewatch", about = "Disk-health telemetry pipeline", version)]
struct Cli {
    /// Path to a TOML config file (defaults to $DRIVEWATCH_CONFIG, then
    /// built-in defaults)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Register or update devices from a JSON descriptor file
    Register {
        /// JSON array of device descriptors
        file: PathBuf,
    },
    /// Ingest one smartctl JSON snapshot for a device
    Ingest {
        /// Device WWN (or fallback id)
        #[arg(long)]
        wwn: String,
        /// smartctl --json output file
        file: PathBuf,
    },
    /// Print summaries in device-registration order
    Summary {
        /// Narrow to these WWNs
        wwn: Vec<String>,
    },
    /// Send a test message to every configured notification endpoint
    NotifyTest,
}

fn load_config(cli: &Cli) -> Result<ServiceConfig> {
    let path = cli
        .config
        .clone()
        .or_else(|| std::env::var_os("DRIVEWATCH_CONFIG").map(PathBuf::from));
    match path {
        Some(path) => {
            ServiceConfig::load(&path).with_context(|| format!("load {}", path.display()))
        }
        None => Ok(ServiceConfig::default()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("drivewatch=info,warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let monitor = Monitor::open(&config).await?;

    match cli.command {
        Command::Register { file } => {
            let contents = std::fs::read_to_string(&file)
                .with_context(|| format!("read {}", file.display()))?;
            let descriptors: Vec<DeviceIdentity> =
                serde_json::from_str(&contents).context("parse device descriptors")?;
            let accepted = monitor.register_devices(descriptors)?;
            tracing::info!(count = accepted.len(), "devices registered");
            println!("{}", serde_json::to_string_pretty(&accepted)?);
        }
        Command::Ingest { wwn, file } => {
            let contents = std::fs::read_to_string(&file)
                .with_context(|| format!("read {}", file.display()))?;
            let payload: serde_json::Value =
                serde_json::from_str(&contents).context("parse telemetry payload")?;
            let stored = monitor.ingest(&wwn, &payload).await?;
            println!("{}", serde_json::to_string_pretty(&stored)?);
        }
        Command::Summary { wwn } => {
            let filter = if wwn.is_empty() { None } else { Some(wwn.as_slice()) };
            let summaries = monitor.summary(filter).await?;
            println!("{}", serde_json::to_string_pretty(&summaries)?);
        }
        Command::NotifyTest => {
            monitor.send_test_notification().await?;
            tracing::info!("all configured endpoints accepted the test message");
        }
    }

    Ok(())
}
