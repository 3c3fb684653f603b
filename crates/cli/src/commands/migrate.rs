//! Database migration commands.
//!
//! # Usage
//!
//! ```bash
//! teteu-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string (falls back
//!   to `DATABASE_URL`)

use teteu_storefront::db::MIGRATOR;

use super::{CliError, connect};

/// Apply pending storefront migrations.
///
/// # Errors
///
/// Returns `CliError` if the database is unreachable or a migration fails.
pub async fn storefront() -> Result<(), CliError> {
    let (_, pool) = connect().await?;

    tracing::info!("Running storefront migrations...");
    MIGRATOR.run(&pool).await?;

    tracing::info!("Storefront migrations complete");
    Ok(())
}
