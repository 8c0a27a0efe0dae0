//! latchctl, the administration tool for the latchd access-control system.
//!
//! # Commands
//!
//! - `list` - Show the authorization list
//! - `add` / `delete` / `update` - Edit card records
//! - `logs` / `clear-logs` - Inspect or truncate the audit log
//! - `init` - Seed the default card set

mod commands;

use clap::{Parser, Subcommand};
use latchd_core::{AuditLog, CardStore};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// latchd administration tool.
#[derive(Parser)]
#[command(name = "latchctl")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the authorization list
    #[arg(
        global = true,
        long,
        env = "LATCHD_CARDS_FILE",
        default_value = "authorized_cards.json"
    )]
    cards_file: PathBuf,

    /// Path to the audit log
    #[arg(
        global = true,
        long,
        env = "LATCHD_LOG_FILE",
        default_value = "access_log.json"
    )]
    log_file: PathBuf,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the authorization list
    List,

    /// Add a new card record
    Add {
        /// Credential identifier (e.g. 0x1a2b3c4d)
        card_id: String,

        /// Display label for the card
        name: String,

        /// Add the card as denied instead of authorized
        #[arg(long)]
        deny: bool,
    },

    /// Delete a card record
    Delete {
        /// Credential identifier to delete
        card_id: String,
    },

    /// Update an existing card's authorization
    Update {
        /// Credential identifier to update
        card_id: String,

        /// Authorize the card
        #[arg(long)]
        authorize: bool,

        /// Deny the card
        #[arg(long)]
        deny: bool,
    },

    /// Show the access log
    Logs,

    /// Truncate the access log
    ClearLogs,

    /// Seed the default card set if no intact list exists
    Init,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let store = CardStore::new(&cli.cards_file);
    let log = AuditLog::new(&cli.log_file);

    match cli.command {
        Commands::List => commands::cards::list(&store),
        Commands::Add {
            card_id,
            name,
            deny,
        } => commands::cards::add(&store, &card_id, &name, !deny)?,
        Commands::Delete { card_id } => commands::cards::delete(&store, &card_id)?,
        Commands::Update {
            card_id,
            authorize,
            deny,
        } => {
            let authorized = match (authorize, deny) {
                (true, false) => true,
                (false, true) => false,
                _ => return Err("specify exactly one of --authorize or --deny".into()),
            };
            commands::cards::update(&store, &card_id, authorized)?;
        }
        Commands::Logs => commands::logs::show(&log),
        Commands::ClearLogs => commands::logs::clear(&log)?,
        Commands::Init => commands::cards::init(&store)?,
    }

    Ok(())
}
