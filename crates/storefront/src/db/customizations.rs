//! Customization repository for `PostgreSQL`.
//!
//! Ids and timestamps are generated by the caller so both backends assign
//! identity the same way. Rows are never removed; deletion and expiry clear
//! the `active` flag.

use chrono::{DateTime, Datelike, Utc};
use sqlx::PgPool;

use teteu_core::{
    Color, CustomizationId, CustomizationRecord, CustomizationStats, Hardware, NewCustomization,
    retention_cutoff,
};

use super::RepositoryError;

/// Earliest year a `TIMESTAMPTZ` can hold (4713 BC). No row can be older, so
/// a cutoff before it expires nothing.
const POSTGRES_MIN_YEAR: i32 = -4712;

/// Repository for customization database operations.
pub struct CustomizationRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomizationRepository<'a> {
    /// Create a new customization repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new active record.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the id already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn insert(
        &self,
        new: NewCustomization,
        id: CustomizationId,
        now: DateTime<Utc>,
    ) -> Result<CustomizationRecord, RepositoryError> {
        let record = sqlx::query_as::<_, CustomizationRecord>(
            r"
            INSERT INTO storefront.customizations (id, product, color, hardware, created_at, active)
            VALUES ($1, $2, $3, $4, $5, TRUE)
            RETURNING id, product, color, hardware, created_at, active
            ",
        )
        .bind(id)
        .bind(new.product())
        .bind(new.color())
        .bind(new.hardware())
        .bind(now)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict(format!("id {id} already exists"));
            }
            RepositoryError::Database(e)
        })?;

        Ok(record)
    }

    /// Get an active record by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(
        &self,
        id: CustomizationId,
    ) -> Result<Option<CustomizationRecord>, RepositoryError> {
        let record = sqlx::query_as::<_, CustomizationRecord>(
            r"
            SELECT id, product, color, hardware, created_at, active
            FROM storefront.customizations
            WHERE id = $1 AND active
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(record)
    }

    /// Active records, most recent first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, limit: usize) -> Result<Vec<CustomizationRecord>, RepositoryError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let records = sqlx::query_as::<_, CustomizationRecord>(
            r"
            SELECT id, product, color, hardware, created_at, active
            FROM storefront.customizations
            WHERE active
            ORDER BY created_at DESC, id DESC
            LIMIT $1
            ",
        )
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(records)
    }

    /// Deactivate active records created before the retention cutoff.
    ///
    /// A window longer than the column's range deactivates nothing and skips
    /// the query.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn sweep_expired_at(
        &self,
        now: DateTime<Utc>,
        retention_days: u32,
    ) -> Result<u64, RepositoryError> {
        let Some(cutoff) = retention_cutoff(now, retention_days)
            .filter(|cutoff| cutoff.year() >= POSTGRES_MIN_YEAR)
        else {
            return Ok(0);
        };

        let result = sqlx::query(
            r"
            UPDATE storefront.customizations
            SET active = FALSE
            WHERE active AND created_at < $1
            ",
        )
        .bind(cutoff)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Deactivate one record.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn delete(&self, id: CustomizationId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE storefront.customizations
            SET active = FALSE
            WHERE id = $1 AND active
            ",
        )
        .bind(id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts of active records per color and hardware.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn stats(&self) -> Result<CustomizationStats, RepositoryError> {
        let by_color = sqlx::query_as::<_, (Color, i64)>(
            r"
            SELECT color, COUNT(*)
            FROM storefront.customizations
            WHERE active
            GROUP BY color
            ",
        )
        .fetch_all(self.pool)
        .await?;

        let by_hardware = sqlx::query_as::<_, (Hardware, i64)>(
            r"
            SELECT hardware, COUNT(*)
            FROM storefront.customizations
            WHERE active
            GROUP BY hardware
            ",
        )
        .fetch_all(self.pool)
        .await?;

        let mut stats = CustomizationStats::default();
        for (color, count) in by_color {
            let count = u64::try_from(count).unwrap_or(0);
            stats.total_active += count;
            stats.by_color.insert(color, count);
        }
        for (hardware, count) in by_hardware {
            stats
                .by_hardware
                .insert(hardware, u64::try_from(count).unwrap_or(0));
        }

        Ok(stats)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{SubsecRound, TimeDelta};

    use super::*;
    use crate::db::MIGRATOR;

    /// Connect to the test database and bring the schema up to date.
    async fn pool() -> PgPool {
        let url = std::env::var("STOREFRONT_DATABASE_URL")
            .or_else(|_| std::env::var("DATABASE_URL"))
            .expect("STOREFRONT_DATABASE_URL or DATABASE_URL must be set");
        let pool = PgPool::connect(&url).await.unwrap();
        MIGRATOR.run(&pool).await.unwrap();
        pool
    }

    // Postgres keeps microseconds.
    fn now() -> DateTime<Utc> {
        Utc::now().trunc_subsecs(6)
    }

    fn new(product: &str, color: Color, hardware: Hardware) -> NewCustomization {
        NewCustomization::new(product, color, hardware).unwrap()
    }

    #[tokio::test]
    #[ignore = "Requires PostgreSQL (STOREFRONT_DATABASE_URL)"]
    async fn test_insert_then_get_returns_identical_record() {
        let pool = pool().await;
        let repo = CustomizationRepository::new(&pool);

        let created = repo
            .insert(
                new("Classic Wallet", Color::LightBrown, Hardware::Gold),
                CustomizationId::generate(),
                now(),
            )
            .await
            .unwrap();

        let fetched = repo.get(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert!(fetched.active);
    }

    #[tokio::test]
    #[ignore = "Requires PostgreSQL (STOREFRONT_DATABASE_URL)"]
    async fn test_duplicate_id_is_a_conflict() {
        let pool = pool().await;
        let repo = CustomizationRepository::new(&pool);
        let id = CustomizationId::generate();

        repo.insert(new("Urban Tote", Color::Black, Hardware::Silver), id, now())
            .await
            .unwrap();
        let err = repo
            .insert(new("Urban Tote", Color::Brown, Hardware::Gold), id, now())
            .await
            .unwrap_err();

        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    #[ignore = "Requires PostgreSQL (STOREFRONT_DATABASE_URL)"]
    async fn test_sweep_expired_is_idempotent() {
        let pool = pool().await;
        let repo = CustomizationRepository::new(&pool);
        let now = now();

        let old = repo
            .insert(
                new("Classic Wallet", Color::Black, Hardware::Gold),
                CustomizationId::generate(),
                now - TimeDelta::days(400),
            )
            .await
            .unwrap();
        let fresh = repo
            .insert(
                new("Classic Wallet", Color::Brown, Hardware::Gold),
                CustomizationId::generate(),
                now,
            )
            .await
            .unwrap();

        assert!(repo.sweep_expired_at(now, 30).await.unwrap() >= 1);
        assert_eq!(repo.sweep_expired_at(now, 30).await.unwrap(), 0);
        assert!(repo.get(old.id).await.unwrap().is_none());
        assert!(repo.get(fresh.id).await.unwrap().is_some());
    }

    #[tokio::test]
    #[ignore = "Requires PostgreSQL (STOREFRONT_DATABASE_URL)"]
    async fn test_sweep_with_huge_window_skips_query() {
        let pool = pool().await;
        let repo = CustomizationRepository::new(&pool);

        assert_eq!(repo.sweep_expired_at(now(), u32::MAX).await.unwrap(), 0);
        assert_eq!(repo.sweep_expired_at(now(), 5_000_000).await.unwrap(), 0);
    }

    #[tokio::test]
    #[ignore = "Requires PostgreSQL (STOREFRONT_DATABASE_URL)"]
    async fn test_delete_hides_record() {
        let pool = pool().await;
        let repo = CustomizationRepository::new(&pool);

        let record = repo
            .insert(
                new("Urban Tote", Color::Brown, Hardware::Gold),
                CustomizationId::generate(),
                now(),
            )
            .await
            .unwrap();

        assert!(repo.delete(record.id).await.unwrap());
        assert!(repo.get(record.id).await.unwrap().is_none());
        assert!(!repo.delete(record.id).await.unwrap());
        assert!(
            !repo
                .list(1000)
                .await
                .unwrap()
                .iter()
                .any(|r| r.id == record.id)
        );
    }

    #[tokio::test]
    #[ignore = "Requires PostgreSQL (STOREFRONT_DATABASE_URL)"]
    async fn test_list_returns_most_recent_first() {
        let pool = pool().await;
        let repo = CustomizationRepository::new(&pool);

        // Dated ahead of every other row so they head the listing.
        let base = now() + TimeDelta::days(365 * 500);
        let mut ids = Vec::new();
        for i in 0..5 {
            let record = repo
                .insert(
                    new("Classic Wallet", Color::Black, Hardware::Silver),
                    CustomizationId::generate(),
                    base + TimeDelta::seconds(i),
                )
                .await
                .unwrap();
            ids.push(record.id);
        }

        let listed: Vec<_> = repo
            .list(2)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        let newest: Vec<_> = ids.iter().rev().take(2).copied().collect();
        assert_eq!(listed, newest);

        for id in ids {
            repo.delete(id).await.unwrap();
        }
    }

    #[tokio::test]
    #[ignore = "Requires PostgreSQL (STOREFRONT_DATABASE_URL)"]
    async fn test_stats_count_active_records() {
        let pool = pool().await;
        let repo = CustomizationRepository::new(&pool);

        let record = repo
            .insert(
                new("Urban Tote", Color::LightBrown, Hardware::Gold),
                CustomizationId::generate(),
                now(),
            )
            .await
            .unwrap();

        let stats = repo.stats().await.unwrap();
        assert!(stats.total_active >= 1);
        assert!(stats.color_count(Color::LightBrown) >= 1);
        assert!(stats.hardware_count(Hardware::Gold) >= 1);

        repo.delete(record.id).await.unwrap();
    }
}
