//! Teteu Cueros storefront - leather customization site.
//!
//! This binary serves the storefront on port 5000.
//!
//! # Architecture
//!
//! - Axum web framework, Askama templates for server-side rendering
//! - Customization records in `PostgreSQL` when `STOREFRONT_DATABASE_URL` is
//!   set, in process memory otherwise
//! - Background task deactivating records past the retention window

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;

use sentry::integrations::tracing as sentry_tracing;
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use teteu_storefront::config::{LogFormat, StorefrontConfig};
use teteu_storefront::db::{self, CustomizationStore, MemoryCustomizationStore};
use teteu_storefront::services::{SweeperConfig, run_sweeper};
use teteu_storefront::state::AppState;

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            sample_rate: config.sentry_sample_rate,
            traces_sample_rate: config.sentry_traces_sample_rate,
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        tracing::Level::TRACE => sentry_tracing::EventFilter::Ignore,
    }
}

/// Pick the record store: Postgres when a database URL is configured.
async fn open_store(config: &StorefrontConfig) -> CustomizationStore {
    match &config.database_url {
        Some(url) => {
            let pool = db::create_pool(url)
                .await
                .expect("Failed to create database pool");
            tracing::info!("Database pool created");
            // NOTE: Migrations are NOT run automatically on startup.
            // Run them explicitly via: cargo run -p teteu-cli -- migrate
            CustomizationStore::Postgres(pool)
        }
        None => {
            tracing::warn!(
                max_records = config.max_records,
                "STOREFRONT_DATABASE_URL not set, customizations are kept in memory"
            );
            CustomizationStore::Memory(MemoryCustomizationStore::with_capacity_limit(
                config.max_records,
            ))
        }
    }
}

#[tokio::main]
async fn main() {
    // Load configuration from environment (needed for Sentry init)
    let config = StorefrontConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "teteu_storefront=info,tower_http=debug".into());

    let is_json = config.log_format == LogFormat::Json;
    let json_layer = is_json.then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!is_json).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    tracing::debug!(?config, "Configuration loaded");

    let store = open_store(&config).await;
    let state = AppState::new(config.clone(), store.clone());

    // Background expiry sweep
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sweeper = config.sweep_interval.map(|period| {
        tokio::spawn(run_sweeper(
            store,
            SweeperConfig {
                period,
                retention_days: config.retention_days,
            },
            shutdown_rx,
        ))
    });
    if sweeper.is_none() {
        tracing::info!("Expiry sweeper disabled (STOREFRONT_SWEEP_INTERVAL_SECS=0)");
    }

    let app = teteu_storefront::app(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    // Start server
    let addr = config.socket_addr();
    tracing::info!("storefront listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .expect("Server error");

    // Stop the sweeper and wait for its final log line
    let _ = shutdown_tx.send(true);
    if let Some(handle) = sweeper
        && let Err(e) = handle.await
    {
        tracing::error!(error = %e, "Expiry sweeper task failed");
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
