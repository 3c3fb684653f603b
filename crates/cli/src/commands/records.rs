//! Customization record maintenance.
//!
//! These commands go through the same store the storefront uses, so expiry and
//! deletion behave exactly as they do from the admin pages.

use teteu_core::{Color, CustomizationId, Hardware};
use teteu_storefront::db::CustomizationStore;

use super::{CliError, connect};

/// Deactivate records older than the retention window.
///
/// # Errors
///
/// Returns `CliError` if the database is unreachable or the update fails.
pub async fn sweep(retention_days: Option<u32>) -> Result<(), CliError> {
    let (config, pool) = connect().await?;
    let retention_days = retention_days.unwrap_or(config.retention_days);
    let store = CustomizationStore::Postgres(pool);

    let swept = store.sweep_expired(retention_days).await?;
    tracing::info!(swept, retention_days, "Expired customizations deactivated");
    Ok(())
}

/// Print the most recent active records.
///
/// # Errors
///
/// Returns `CliError` if the database is unreachable or the query fails.
#[allow(clippy::print_stdout)]
pub async fn list(limit: usize) -> Result<(), CliError> {
    let (_, pool) = connect().await?;
    let store = CustomizationStore::Postgres(pool);

    let records = store.list(limit).await?;
    if records.is_empty() {
        tracing::info!("No active customizations");
        return Ok(());
    }

    for record in &records {
        println!(
            "{}  {}  {:<24}  {:<11}  {}",
            record.id,
            record.created_at.format("%Y-%m-%d %H:%M"),
            record.product,
            record.color.as_str(),
            record.hardware.as_str(),
        );
    }
    tracing::info!(shown = records.len(), "Listed customizations");
    Ok(())
}

/// Print active record counts per option.
///
/// # Errors
///
/// Returns `CliError` if the database is unreachable or a query fails.
#[allow(clippy::print_stdout)]
pub async fn stats() -> Result<(), CliError> {
    let (_, pool) = connect().await?;
    let store = CustomizationStore::Postgres(pool);

    let stats = store.stats().await?;
    println!("active: {}", stats.total_active);
    for color in Color::ALL {
        println!("  {:<11} {}", color.as_str(), stats.color_count(color));
    }
    for hardware in Hardware::ALL {
        println!("  {:<11} {}", hardware.as_str(), stats.hardware_count(hardware));
    }
    Ok(())
}

/// Deactivate a single record.
///
/// # Errors
///
/// Returns `CliError` if the id is malformed or the database update fails.
pub async fn delete(id: &str) -> Result<(), CliError> {
    let id: CustomizationId = id.parse()?;
    let (_, pool) = connect().await?;
    let store = CustomizationStore::Postgres(pool);

    if store.delete(id).await? {
        tracing::info!(%id, "Customization deactivated");
    } else {
        tracing::warn!(%id, "No active customization with that id");
    }
    Ok(())
}
