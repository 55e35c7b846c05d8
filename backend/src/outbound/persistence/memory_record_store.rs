//! In-process record store used when no database is configured and in tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::debug;

use super::record_store::{ClientRecordStore, RecordStoreError, SealedClient, StoredRecord};

#[derive(Debug, Default)]
struct Tables {
    next_id: i64,
    rows: BTreeMap<i64, SealedClient>,
    by_oib: HashMap<String, i64>,
}

/// Mutex-guarded map with a unique index on the sealed identifier.
///
/// The check for an existing identifier and the insert happen under one
/// lock, so concurrent saves of the same client cannot both succeed.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    tables: Mutex<Tables>,
}

impl MemoryRecordStore {
    /// Number of stored rows.
    pub fn len(&self) -> Result<usize, RecordStoreError> {
        Ok(self.lock()?.rows.len())
    }

    /// Whether the store holds no rows.
    pub fn is_empty(&self) -> Result<bool, RecordStoreError> {
        Ok(self.lock()?.rows.is_empty())
    }

    /// Snapshot of every stored row, ordered by id.
    pub fn rows(&self) -> Result<Vec<StoredRecord>, RecordStoreError> {
        Ok(self
            .lock()?
            .rows
            .iter()
            .map(|(id, sealed)| StoredRecord {
                id: *id,
                sealed: sealed.clone(),
            })
            .collect())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, RecordStoreError> {
        self.tables
            .lock()
            .map_err(|_| RecordStoreError::connection("memory store lock poisoned"))
    }
}

#[async_trait]
impl ClientRecordStore for MemoryRecordStore {
    async fn insert(&self, sealed: SealedClient) -> Result<StoredRecord, RecordStoreError> {
        let mut tables = self.lock()?;
        if tables.by_oib.contains_key(&sealed.oib) {
            debug!("memory insert rejected: identifier taken");
            return Err(RecordStoreError::duplicate("oib already stored"));
        }
        tables.next_id += 1;
        let id = tables.next_id;
        tables.by_oib.insert(sealed.oib.clone(), id);
        tables.rows.insert(id, sealed.clone());
        Ok(StoredRecord { id, sealed })
    }

    async fn update(&self, record: StoredRecord) -> Result<StoredRecord, RecordStoreError> {
        let mut tables = self.lock()?;
        let previous_oib = match tables.rows.get(&record.id) {
            Some(existing) => existing.oib.clone(),
            None => return Err(RecordStoreError::missing(format!("id {}", record.id))),
        };
        let taken_by_other = tables
            .by_oib
            .get(&record.sealed.oib)
            .is_some_and(|holder| *holder != record.id);
        if taken_by_other {
            return Err(RecordStoreError::duplicate("oib already stored"));
        }
        tables.by_oib.remove(&previous_oib);
        tables.by_oib.insert(record.sealed.oib.clone(), record.id);
        tables.rows.insert(record.id, record.sealed.clone());
        Ok(record)
    }

    async fn find_by_oib(
        &self,
        sealed_oib: &str,
    ) -> Result<Option<StoredRecord>, RecordStoreError> {
        let tables = self.lock()?;
        Ok(tables.by_oib.get(sealed_oib).and_then(|id| {
            tables.rows.get(id).map(|sealed| StoredRecord {
                id: *id,
                sealed: sealed.clone(),
            })
        }))
    }

    async fn delete_by_oib(&self, sealed_oib: &str) -> Result<bool, RecordStoreError> {
        let mut tables = self.lock()?;
        match tables.by_oib.remove(sealed_oib) {
            Some(id) => {
                tables.rows.remove(&id);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
