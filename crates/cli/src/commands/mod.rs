//! CLI subcommands.

pub mod migrate;
pub mod records;

use sqlx::PgPool;
use thiserror::Error;

use teteu_core::CustomizationIdError;
use teteu_storefront::config::{ConfigError, StorefrontConfig};
use teteu_storefront::db::{self, RepositoryError};

/// Errors shared by all subcommands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("STOREFRONT_DATABASE_URL (or DATABASE_URL) is not set")]
    MissingDatabaseUrl,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Store error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("{0}")]
    InvalidId(#[from] CustomizationIdError),
}

/// Load configuration and connect to the storefront database.
///
/// # Errors
///
/// Returns `CliError` if configuration is invalid, no database URL is set, or
/// the connection fails.
pub async fn connect() -> Result<(StorefrontConfig, PgPool), CliError> {
    let config = StorefrontConfig::from_env()?;
    let database_url = config
        .database_url
        .as_ref()
        .ok_or(CliError::MissingDatabaseUrl)?;

    tracing::info!("Connecting to storefront database...");
    let pool = db::create_pool(database_url).await?;

    Ok((config, pool))
}
