//! Customization record storage.
//!
//! Two backends implement the same operations:
//!
//! - [`MemoryCustomizationStore`] - process memory, lost on restart
//! - [`CustomizationRepository`] - `PostgreSQL`, survives restarts
//!
//! Which one runs is a deployment decision: the storefront uses Postgres when
//! `STOREFRONT_DATABASE_URL` is set and memory otherwise. Handlers only see
//! [`CustomizationStore`].
//!
//! # Database
//!
//! ## Tables
//!
//! - `storefront.customizations` - one row per customization record
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p teteu-cli -- migrate
//! ```

pub mod customizations;
pub mod memory;

use std::time::Duration;

use chrono::{DateTime, Utc};
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;
use tracing::instrument;

use teteu_core::{
    CustomizationId, CustomizationRecord, CustomizationStats, NewCustomization, ValidationError,
};

pub use customizations::CustomizationRepository;
pub use memory::MemoryCustomizationStore;

/// Migrations embedded at compile time.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Input rejected before anything was stored.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Constraint violation (e.g., duplicate id).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// The in-memory store holds its maximum number of active records.
    #[error("store is full ({max} active customizations)")]
    CapacityExceeded {
        /// Configured limit.
        max: usize,
    },

    /// The backend cannot serve requests.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// The record store shared by all request handlers.
///
/// Cheap to clone; clones share the same underlying records.
#[derive(Clone, Debug)]
pub enum CustomizationStore {
    /// Process-memory backend.
    Memory(MemoryCustomizationStore),
    /// `PostgreSQL` backend.
    Postgres(PgPool),
}

impl CustomizationStore {
    /// Short backend name for logs.
    #[must_use]
    pub const fn backend_name(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::Postgres(_) => "postgres",
        }
    }

    /// Validate raw input and store a new active record.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Validation` if the input is invalid (nothing
    /// is stored), or a storage error if the backend fails.
    pub async fn create(
        &self,
        product: &str,
        color: &str,
        hardware: &str,
    ) -> Result<CustomizationRecord, RepositoryError> {
        let new = NewCustomization::parse(product, color, hardware)?;
        self.insert(new).await
    }

    /// Store an already validated record request.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the backend fails or is full.
    #[instrument(skip(self, new), fields(backend = self.backend_name()))]
    pub async fn insert(
        &self,
        new: NewCustomization,
    ) -> Result<CustomizationRecord, RepositoryError> {
        let id = CustomizationId::generate();
        let now = Utc::now();
        match self {
            Self::Memory(store) => store.insert_at(new, id, now),
            Self::Postgres(pool) => {
                CustomizationRepository::new(pool)
                    .insert(new, id, now)
                    .await
            }
        }
    }

    /// Get an active record. Unknown and inactive ids yield `None`.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the backend fails.
    #[instrument(skip(self), fields(backend = self.backend_name()))]
    pub async fn get(
        &self,
        id: CustomizationId,
    ) -> Result<Option<CustomizationRecord>, RepositoryError> {
        match self {
            Self::Memory(store) => store.get(id),
            Self::Postgres(pool) => CustomizationRepository::new(pool).get(id).await,
        }
    }

    /// Active records, most recent first, at most `limit` of them.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the backend fails.
    #[instrument(skip(self), fields(backend = self.backend_name()))]
    pub async fn list(&self, limit: usize) -> Result<Vec<CustomizationRecord>, RepositoryError> {
        match self {
            Self::Memory(store) => store.list(limit),
            Self::Postgres(pool) => CustomizationRepository::new(pool).list(limit).await,
        }
    }

    /// Deactivate every active record older than `retention_days`.
    ///
    /// Returns how many records were deactivated; a second call with the same
    /// window returns 0.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the backend fails.
    pub async fn sweep_expired(&self, retention_days: u32) -> Result<u64, RepositoryError> {
        self.sweep_expired_at(Utc::now(), retention_days).await
    }

    /// [`sweep_expired`](Self::sweep_expired) measured against `now`.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the backend fails.
    #[instrument(skip(self), fields(backend = self.backend_name()))]
    pub async fn sweep_expired_at(
        &self,
        now: DateTime<Utc>,
        retention_days: u32,
    ) -> Result<u64, RepositoryError> {
        match self {
            Self::Memory(store) => store.sweep_expired_at(now, retention_days),
            Self::Postgres(pool) => {
                CustomizationRepository::new(pool)
                    .sweep_expired_at(now, retention_days)
                    .await
            }
        }
    }

    /// Mark a record inactive. Returns whether it existed and was active.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the backend fails.
    #[instrument(skip(self), fields(backend = self.backend_name()))]
    pub async fn delete(&self, id: CustomizationId) -> Result<bool, RepositoryError> {
        match self {
            Self::Memory(store) => store.delete(id),
            Self::Postgres(pool) => CustomizationRepository::new(pool).delete(id).await,
        }
    }

    /// Counts of active records per color and hardware.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the backend fails.
    pub async fn stats(&self) -> Result<CustomizationStats, RepositoryError> {
        match self {
            Self::Memory(store) => store.stats(),
            Self::Postgres(pool) => CustomizationRepository::new(pool).stats().await,
        }
    }

    /// Check that the backend can serve requests.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the backend is unreachable.
    pub async fn ping(&self) -> Result<(), RepositoryError> {
        match self {
            Self::Memory(store) => store.ping(),
            Self::Postgres(pool) => {
                sqlx::query("SELECT 1").fetch_one(pool).await?;
                Ok(())
            }
        }
    }
}
