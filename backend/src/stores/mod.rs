//! Persistence for enriched harvest records
//!
//! Two independent stores receive every accepted submission: the JSON audit
//! log, a best-effort append-only trail, and the record store, which is the
//! system of record for retrieval.

pub mod audit_log;
pub mod memory;
pub mod postgres;

pub use audit_log::JsonFileAuditLog;
pub use memory::InMemoryRecordStore;
pub use postgres::PgRecordStore;

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use shared::{AuditEntry, HarvestRecord, PageRequest};
use thiserror::Error;

/// Store failure, shared by the audit log and the record store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("audit log is corrupt: {0}")]
    Corrupt(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("invalid stored row: {0}")]
    InvalidRow(String),

    #[error("operation timed out after {0:?}")]
    Timeout(Duration),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Append-only trail of enriched submissions
#[async_trait]
pub trait AuditLog: Send + Sync {
    /// Append one entry after every entry already recorded
    async fn append(&self, entry: &AuditEntry) -> Result<(), StoreError>;

    /// Every entry, oldest first
    async fn entries(&self) -> Result<Vec<AuditEntry>, StoreError>;
}

/// System of record for harvest records
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Persist the entry and return the identity assigned to it
    async fn insert(&self, entry: &AuditEntry) -> Result<i64, StoreError>;

    /// Records newest first (`created_at` desc, then `id` desc)
    async fn query_ordered(
        &self,
        page: Option<PageRequest>,
    ) -> Result<Vec<HarvestRecord>, StoreError>;

    /// Check that the store is reachable
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Bound a store operation so a stalled medium surfaces as an error
pub async fn with_timeout<T, F>(limit: Duration, operation: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    match tokio::time::timeout(limit, operation).await {
        Ok(result) => result,
        Err(_) => Err(StoreError::Timeout(limit)),
    }
}
