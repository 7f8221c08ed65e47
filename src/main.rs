//! chassis-controller - serial command loop for the rover chassis
//!
//! ## Protocol
//!
//! - **Inbound**: one JSON command per line, e.g.
//!   `{"mode":"PWM","payload":{"fl":100,"fr":-100,"rl":50,"rr":-50}}`
//! - **Outbound**: one feedback object per iteration, followed by `\n\n`

use chassis_controller::error::Error;
use chassis_controller::transport::SerialTransport;
use chassis_controller::{ChassisController, Config, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "chassis-controller")]
#[command(about = "Mode-switchable chassis controller over a serial JSON link")]
struct Args {
    /// TOML configuration file (defaults are used when omitted)
    config: Option<PathBuf>,

    /// Serial port path, overrides the config file
    #[arg(short, long)]
    port: Option<String>,

    /// Baud rate, overrides the config file
    #[arg(short, long)]
    baud: Option<u32>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(port) = args.port {
        config.serial.port = port;
    }
    if let Some(baud) = args.baud {
        config.serial.baud_rate = baud;
    }

    // Initialize logger (RUST_LOG wins over the config file)
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();

    log::info!("chassis-controller v{} starting...", env!("CARGO_PKG_VERSION"));
    match &args.config {
        Some(path) => log::info!("Using config: {}", path.display()),
        None => log::info!("No config file given, using defaults"),
    }

    let transport = SerialTransport::open(
        &config.serial.port,
        config.serial.baud_rate,
        config.serial.read_timeout(),
    )?;

    // Set up shutdown signal handler
    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);
    ctrlc::set_handler(move || {
        log::info!("Received shutdown signal");
        r.store(false, Ordering::Relaxed);
    })
    .map_err(|e| Error::Other(format!("Error setting Ctrl-C handler: {}", e)))?;

    let mut controller = ChassisController::new(transport, config.control.interval());
    controller.run(&running)?;

    log::info!("chassis-controller stopped");
    Ok(())
}
