//! USB HID relay board CLI
//!
//! A command-line interface for switching DCT and UCR relay boards.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::debug;
use usbrelay::RelayConfig;
use usbrelay_transport::{BoxedTransport, HidTransport, MonitorConfig, MonitorTransport};

// CLI definitions
mod cli;
use cli::{Cli, Commands};

// Command handlers
mod commands;
use commands::Settings;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Load config
    let config_path = cli.config.clone().unwrap_or_else(RelayConfig::default_path);
    debug!("Loading config from {:?}", config_path);
    let config = RelayConfig::load(&config_path)
        .with_context(|| format!("reading config {}", config_path.display()))?;
    let settings = Settings::resolve(&cli, &config);

    let mut transport: BoxedTransport = Arc::new(HidTransport::new());
    if cli.monitor {
        transport = MonitorTransport::wrap(transport, MonitorConfig::default().with_hex(cli.hex));
    }

    match cli.command {
        None | Some(Commands::List) => commands::query::list(&transport, &settings)?,
        Some(Commands::Status) => commands::query::status(&transport, &settings)?,
        Some(Commands::Serial) => commands::query::serial(&transport, &settings)?,
        Some(Commands::On { relay }) => commands::set::relay(&transport, &settings, relay, true)?,
        Some(Commands::Off { relay }) => commands::set::relay(&transport, &settings, relay, false)?,
        Some(Commands::Toggle { relay }) => commands::set::toggle(&transport, &settings, relay)?,
        Some(Commands::AllOn) => commands::set::all(&transport, &settings, true)?,
        Some(Commands::AllOff) => commands::set::all(&transport, &settings, false)?,
        Some(Commands::SetSerial { serial }) => {
            commands::set::serial(&transport, &settings, &serial)?
        }
    }

    Ok(())
}
