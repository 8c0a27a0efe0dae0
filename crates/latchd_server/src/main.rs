//! latchd access-control server binary.

use clap::Parser;
use latchd_server::{select_actuator, AccessServer, Actuator, ServerConfig, SimulatedActuator};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Network access-control server for a physical door lock.
#[derive(Parser)]
#[command(name = "latchd")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Address to listen on for reader connections
    #[arg(long, env = "LATCHD_ADDR", default_value = "0.0.0.0:5000")]
    addr: SocketAddr,

    /// BCM pin number driving the solenoid relay
    #[arg(long, env = "LATCHD_PIN", default_value_t = 18)]
    pin: u32,

    /// Seconds the door stays unlocked after an authorized attempt
    #[arg(long, env = "LATCHD_UNLOCK_SECS", default_value_t = 3)]
    unlock_secs: u64,

    /// Seconds to wait for a reader to deliver its credential
    #[arg(long, env = "LATCHD_READ_TIMEOUT_SECS", default_value_t = 10)]
    read_timeout_secs: u64,

    /// Path to the authorization list
    #[arg(long, env = "LATCHD_CARDS_FILE", default_value = "authorized_cards.json")]
    cards_file: PathBuf,

    /// Path to the audit log
    #[arg(long, env = "LATCHD_LOG_FILE", default_value = "access_log.json")]
    log_file: PathBuf,

    /// Skip the hardware probe and run the simulated actuator
    #[arg(long)]
    simulate: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = ServerConfig::new(cli.addr)
        .with_solenoid_pin(cli.pin)
        .with_unlock_duration(Duration::from_secs(cli.unlock_secs))
        .with_read_timeout(Duration::from_secs(cli.read_timeout_secs))
        .with_cards_path(cli.cards_file)
        .with_log_path(cli.log_file);

    let actuator: Arc<dyn Actuator> = if cli.simulate {
        Arc::new(SimulatedActuator::new())
    } else {
        select_actuator(config.solenoid_pin)
    };

    let server = AccessServer::new(config, actuator);
    server.run().await?;
    Ok(())
}
