//! Process-local record store, used when no database is configured

use std::sync::Mutex;

use async_trait::async_trait;
use shared::{AuditEntry, HarvestRecord, PageRequest};

use super::{RecordStore, StoreError};

#[derive(Default)]
struct Inner {
    next_id: i64,
    records: Vec<HarvestRecord>,
}

/// Record store keeping everything in memory for the lifetime of the process
#[derive(Default)]
pub struct InMemoryRecordStore {
    inner: Mutex<Inner>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        self.inner
            .lock()
            .map(|inner| inner.records.len())
            .map_err(|_| poisoned())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        self.len().map(|len| len == 0)
    }
}

fn poisoned() -> StoreError {
    StoreError::Unavailable("in-memory store lock poisoned".to_string())
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn insert(&self, entry: &AuditEntry) -> Result<i64, StoreError> {
        let mut inner = self.inner.lock().map_err(|_| poisoned())?;
        inner.next_id += 1;
        let id = inner.next_id;
        inner.records.push(entry.clone().into_record(id));
        Ok(id)
    }

    async fn query_ordered(
        &self,
        page: Option<PageRequest>,
    ) -> Result<Vec<HarvestRecord>, StoreError> {
        let inner = self.inner.lock().map_err(|_| poisoned())?;
        let mut records = inner.records.clone();
        drop(inner);

        records.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        Ok(match page {
            Some(page) => records
                .into_iter()
                .skip(page.offset() as usize)
                .take(page.limit() as usize)
                .collect(),
            None => records,
        })
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.inner.lock().map(|_| ()).map_err(|_| poisoned())
    }
}
