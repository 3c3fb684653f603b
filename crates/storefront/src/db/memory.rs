//! In-memory customization store.
//!
//! Records live in a map behind a `RwLock`. Expired and deleted records stay
//! in the map with `active = false`; every read filters them out.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};

use teteu_core::{CustomizationId, CustomizationRecord, CustomizationStats, NewCustomization};

use super::RepositoryError;

/// Entry in the map. `seq` orders records created within the same instant.
#[derive(Debug)]
struct Slot {
    seq: u64,
    record: CustomizationRecord,
}

#[derive(Debug, Default)]
struct Records {
    by_id: HashMap<CustomizationId, Slot>,
    next_seq: u64,
}

impl Records {
    fn active(&self) -> impl Iterator<Item = &Slot> {
        self.by_id.values().filter(|slot| slot.record.active)
    }
}

/// Process-memory record store.
#[derive(Debug, Clone, Default)]
pub struct MemoryCustomizationStore {
    records: Arc<RwLock<Records>>,
    max_active: Option<usize>,
}

impl MemoryCustomizationStore {
    /// Create an empty, unbounded store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store that refuses new records once `max_active`
    /// active records exist.
    #[must_use]
    pub fn with_capacity_limit(max_active: usize) -> Self {
        Self {
            records: Arc::default(),
            max_active: Some(max_active),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Records>, RepositoryError> {
        self.records
            .read()
            .map_err(|_| RepositoryError::Unavailable("in-memory store lock poisoned".to_owned()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Records>, RepositoryError> {
        self.records
            .write()
            .map_err(|_| RepositoryError::Unavailable("in-memory store lock poisoned".to_owned()))
    }

    /// Store a record with a caller-chosen id and creation time.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::CapacityExceeded` when the store is full,
    /// `RepositoryError::Conflict` if `id` is already present, or
    /// `RepositoryError::Unavailable` if the lock is poisoned.
    pub fn insert_at(
        &self,
        new: NewCustomization,
        id: CustomizationId,
        now: DateTime<Utc>,
    ) -> Result<CustomizationRecord, RepositoryError> {
        let mut records = self.write()?;

        if let Some(max) = self.max_active
            && records.active().count() >= max
        {
            return Err(RepositoryError::CapacityExceeded { max });
        }
        if records.by_id.contains_key(&id) {
            return Err(RepositoryError::Conflict(format!("id {id} already exists")));
        }

        let record = new.into_record(id, now);
        let seq = records.next_seq;
        records.next_seq += 1;
        records.by_id.insert(
            id,
            Slot {
                seq,
                record: record.clone(),
            },
        );

        Ok(record)
    }

    pub(super) fn get(
        &self,
        id: CustomizationId,
    ) -> Result<Option<CustomizationRecord>, RepositoryError> {
        let records = self.read()?;
        Ok(records
            .by_id
            .get(&id)
            .filter(|slot| slot.record.active)
            .map(|slot| slot.record.clone()))
    }

    pub(super) fn list(&self, limit: usize) -> Result<Vec<CustomizationRecord>, RepositoryError> {
        let records = self.read()?;
        let mut active: Vec<&Slot> = records.active().collect();
        active.sort_by(|a, b| {
            b.record
                .created_at
                .cmp(&a.record.created_at)
                .then(b.seq.cmp(&a.seq))
        });
        Ok(active
            .into_iter()
            .take(limit)
            .map(|slot| slot.record.clone())
            .collect())
    }

    pub(super) fn sweep_expired_at(
        &self,
        now: DateTime<Utc>,
        retention_days: u32,
    ) -> Result<u64, RepositoryError> {
        let mut records = self.write()?;
        let mut swept = 0;
        for slot in records.by_id.values_mut() {
            if slot.record.active && slot.record.is_expired(now, retention_days) {
                slot.record.active = false;
                swept += 1;
            }
        }
        Ok(swept)
    }

    pub(super) fn delete(&self, id: CustomizationId) -> Result<bool, RepositoryError> {
        let mut records = self.write()?;
        match records.by_id.get_mut(&id) {
            Some(slot) if slot.record.active => {
                slot.record.active = false;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    pub(super) fn stats(&self) -> Result<CustomizationStats, RepositoryError> {
        let records = self.read()?;
        Ok(CustomizationStats::tally(
            records.by_id.values().map(|slot| &slot.record),
        ))
    }

    pub(super) fn ping(&self) -> Result<(), RepositoryError> {
        self.read().map(|_| ())
    }

    /// Number of records held, including inactive ones.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Unavailable` if the lock is poisoned.
    pub fn stored_len(&self) -> Result<usize, RepositoryError> {
        Ok(self.read()?.by_id.len())
    }
}
