//! Background expiry sweep.
//!
//! Runs [`CustomizationStore::sweep_expired`] on a fixed period until the
//! shutdown channel flips to `true`. The first sweep happens immediately
//! after start, so records that expired while the process was down are
//! deactivated right away.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, error, info};

use crate::db::CustomizationStore;

/// Sweep schedule.
#[derive(Debug, Clone, Copy)]
pub struct SweeperConfig {
    /// Time between sweeps.
    pub period: Duration,
    /// Records older than this many days are deactivated.
    pub retention_days: u32,
}

/// Counters kept by the sweeper for its whole lifetime.
#[derive(Debug, Default)]
pub struct SweepMetrics {
    /// Sweeps attempted.
    pub cycles: AtomicU64,
    /// Records deactivated.
    pub swept: AtomicU64,
    /// Sweeps that failed.
    pub errors: AtomicU64,
}

/// Run the sweep loop until `shutdown_rx` observes `true` or its sender is dropped.
pub async fn run_sweeper(
    store: CustomizationStore,
    config: SweeperConfig,
    mut shutdown_rx: watch::Receiver<bool>,
) -> Arc<SweepMetrics> {
    let metrics = Arc::new(SweepMetrics::default());

    let mut ticker = interval(config.period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(
        period_secs = config.period.as_secs(),
        retention_days = config.retention_days,
        backend = store.backend_name(),
        "Expiry sweeper started"
    );

    loop {
        tokio::select! {
            changed = shutdown_rx.changed() => {
                if changed.is_err() || *shutdown_rx.borrow() {
                    info!("Expiry sweeper shutting down");
                    break;
                }
            }
            _ = ticker.tick() => {
                sweep_once(&store, config.retention_days, &metrics).await;
            }
        }
    }

    info!(
        cycles = metrics.cycles.load(Ordering::Relaxed),
        swept = metrics.swept.load(Ordering::Relaxed),
        errors = metrics.errors.load(Ordering::Relaxed),
        "Expiry sweeper stopped"
    );

    metrics
}

async fn sweep_once(store: &CustomizationStore, retention_days: u32, metrics: &SweepMetrics) {
    metrics.cycles.fetch_add(1, Ordering::Relaxed);

    match store.sweep_expired(retention_days).await {
        Ok(0) => debug!("Expiry sweep found nothing to deactivate"),
        Ok(count) => {
            metrics.swept.fetch_add(count, Ordering::Relaxed);
            info!(count, retention_days, "Expired customizations deactivated");
        }
        Err(e) => {
            metrics.errors.fetch_add(1, Ordering::Relaxed);
            error!(error = %e, "Expiry sweep failed");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeDelta, Utc};
    use teteu_core::{Color, CustomizationId, Hardware, NewCustomization};

    use super::*;
    use crate::db::MemoryCustomizationStore;

    #[tokio::test]
    async fn test_sweeper_runs_immediately_and_stops_on_shutdown() {
        let memory = MemoryCustomizationStore::new();
        let old = NewCustomization::new("Classic Wallet", Color::Brown, Hardware::Gold).unwrap();
        let id = CustomizationId::generate();
        memory
            .insert_at(old, id, Utc::now() - TimeDelta::days(40))
            .unwrap();
        let store = CustomizationStore::Memory(memory);

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(run_sweeper(
            store.clone(),
            SweeperConfig {
                period: Duration::from_secs(3600),
                retention_days: 30,
            },
            shutdown_rx,
        ));

        // The first tick fires at once; wait until it has been processed.
        for _ in 0..100 {
            if store.get(id).await.unwrap().is_none() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(store.get(id).await.unwrap().is_none());

        shutdown_tx.send(true).unwrap();
        let metrics = handle.await.unwrap();
        assert_eq!(metrics.swept.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.errors.load(Ordering::Relaxed), 0);
        assert!(metrics.cycles.load(Ordering::Relaxed) >= 1);
    }
}
