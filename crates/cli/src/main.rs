//! Teteu Cueros CLI - database migrations and record maintenance.
//!
//! # Usage
//!
//! ```bash
//! # Apply storefront migrations
//! teteu-cli migrate
//!
//! # Deactivate records past the retention window
//! teteu-cli sweep --retention-days 30
//!
//! # Show the most recent active records
//! teteu-cli list --limit 20
//!
//! # Deactivate one record
//! teteu-cli delete 0b6f3c52-8f5e-4a7b-9a0e-2f1d9a7c4e11
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `sweep` - Expire old customizations
//! - `list` - List active customizations
//! - `stats` - Count active customizations per option
//! - `delete` - Deactivate a customization

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "teteu-cli")]
#[command(author, version, about = "Teteu Cueros CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run storefront database migrations
    Migrate,
    /// Deactivate customizations older than the retention window
    Sweep {
        /// Retention window in days (defaults to `STOREFRONT_RETENTION_DAYS`)
        #[arg(short, long)]
        retention_days: Option<u32>,
    },
    /// List active customizations, most recent first
    List {
        /// Maximum number of records to show
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },
    /// Count active customizations per color and hardware
    Stats,
    /// Deactivate a customization by id
    Delete {
        /// Customization id (UUID)
        id: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    match cli.command {
        Commands::Migrate => commands::migrate::storefront().await?,
        Commands::Sweep { retention_days } => commands::records::sweep(retention_days).await?,
        Commands::List { limit } => commands::records::list(limit).await?,
        Commands::Stats => commands::records::stats().await?,
        Commands::Delete { id } => commands::records::delete(&id).await?,
    }
    Ok(())
}
