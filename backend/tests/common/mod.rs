//! Fixtures and fake stores shared by the integration tests

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};
use harvest_insights_backend::clock::FixedClock;
use harvest_insights_backend::config::{Config, DatabaseConfig, ServerConfig, StorageConfig};
use harvest_insights_backend::stores::{AuditLog, InMemoryRecordStore, RecordStore, StoreError};
use harvest_insights_backend::{create_app, AppState, HarvestPipeline};
use serde_json::{json, Value};
use shared::{AuditEntry, HarvestEvent, HarvestMethod, HarvestRecord, InsightEngine, PageRequest};

pub const STORE_TIMEOUT: Duration = Duration::from_millis(200);

pub fn sao_paulo() -> FixedOffset {
    FixedOffset::west_opt(3 * 3600).expect("valid offset")
}

/// 2025-04-17 18:30:00 -03:00
pub fn submission_time() -> DateTime<FixedOffset> {
    sao_paulo()
        .with_ymd_and_hms(2025, 4, 17, 18, 30, 0)
        .single()
        .expect("valid time")
}

pub fn fixed_clock() -> Arc<FixedClock> {
    Arc::new(FixedClock(submission_time()))
}

/// The reference mechanical harvest: fires loss, moisture, Brix and spoilage rules
pub fn reference_event() -> HarvestEvent {
    HarvestEvent {
        area: 150.0,
        production: 1800.0,
        loss_percentage: 12.0,
        duration_hours: 7.5,
        harvest_method: HarvestMethod::Mechanical,
        moisture_percentage: 25.0,
        harvest_date: NaiveDate::from_ymd_opt(2025, 4, 17).expect("valid date"),
        operator_id: "OP12345".to_string(),
        equipment_id: "EQ67890".to_string(),
        variety: "RB867515".to_string(),
        ambient_temperature: 38.0,
        brix_percentage: 10.0,
    }
}

/// A manual harvest well inside every threshold
pub fn quiet_event() -> HarvestEvent {
    HarvestEvent {
        area: 50.0,
        production: 2000.0,
        loss_percentage: 4.0,
        duration_hours: 8.0,
        harvest_method: HarvestMethod::Manual,
        moisture_percentage: 15.0,
        operator_id: "OP1".to_string(),
        equipment_id: "EQ1".to_string(),
        variety: "CTC4".to_string(),
        ambient_temperature: 28.0,
        brix_percentage: 19.5,
        ..reference_event()
    }
}

pub fn reference_payload() -> Value {
    json!({
        "area": 150,
        "production": 1800,
        "loss_percentage": 12,
        "duration_hours": 7.5,
        "harvest_method": "mechanical",
        "moisture_percentage": 25,
        "harvest_date": "2025-04-17",
        "operator_id": "OP12345",
        "equipment_id": "EQ67890",
        "variety": "RB867515",
        "ambient_temperature": 38,
        "brix_percentage": 10
    })
}

pub fn invalid_event() -> HarvestEvent {
    HarvestEvent {
        area: 0.0,
        loss_percentage: 140.0,
        ..reference_event()
    }
}

pub fn test_config(audit_log_path: PathBuf) -> Config {
    Config {
        environment: "test".to_string(),
        timezone_offset: "-03:00".to_string(),
        server: ServerConfig {
            port: 0,
            host: "127.0.0.1".to_string(),
        },
        database: DatabaseConfig {
            url: None,
            max_connections: 1,
            min_connections: 1,
            acquire_timeout_secs: 1,
            run_migrations: false,
        },
        storage: StorageConfig {
            audit_log_path,
            operation_timeout_secs: 1,
        },
        insights: Default::default(),
    }
}

pub fn pipeline(audit_log: Arc<dyn AuditLog>, records: Arc<dyn RecordStore>) -> HarvestPipeline {
    HarvestPipeline::new(
        InsightEngine::default(),
        audit_log,
        records,
        fixed_clock(),
        STORE_TIMEOUT,
    )
}

pub fn app(pipeline: HarvestPipeline) -> axum::Router {
    let state = AppState {
        pipeline,
        config: Arc::new(test_config(PathBuf::from("unused.json"))),
    };
    create_app(state)
}

/// Audit log kept in memory
#[derive(Default)]
pub struct MemoryAuditLog {
    entries: Mutex<Vec<AuditEntry>>,
}

impl MemoryAuditLog {
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn snapshot(&self) -> Vec<AuditEntry> {
        self.entries.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuditLog for MemoryAuditLog {
    async fn append(&self, entry: &AuditEntry) -> Result<(), StoreError> {
        self.entries.lock().unwrap().push(entry.clone());
        Ok(())
    }

    async fn entries(&self) -> Result<Vec<AuditEntry>, StoreError> {
        Ok(self.snapshot())
    }
}

/// Audit log whose medium is gone
#[derive(Default)]
pub struct BrokenAuditLog {
    pub attempts: AtomicUsize,
}

#[async_trait]
impl AuditLog for BrokenAuditLog {
    async fn append(&self, _entry: &AuditEntry) -> Result<(), StoreError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::Unavailable("audit volume not mounted".to_string()))
    }

    async fn entries(&self) -> Result<Vec<AuditEntry>, StoreError> {
        Err(StoreError::Unavailable("audit volume not mounted".to_string()))
    }
}

/// Record store whose database is down
#[derive(Default)]
pub struct BrokenRecordStore {
    pub inserts: AtomicUsize,
}

#[async_trait]
impl RecordStore for BrokenRecordStore {
    async fn insert(&self, _entry: &AuditEntry) -> Result<i64, StoreError> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn query_ordered(
        &self,
        _page: Option<PageRequest>,
    ) -> Result<Vec<HarvestRecord>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
}

/// Record store that never answers
#[derive(Default)]
pub struct StalledRecordStore;

#[async_trait]
impl RecordStore for StalledRecordStore {
    async fn insert(&self, _entry: &AuditEntry) -> Result<i64, StoreError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(1)
    }

    async fn query_ordered(
        &self,
        _page: Option<PageRequest>,
    ) -> Result<Vec<HarvestRecord>, StoreError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(Vec::new())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(())
    }
}

/// Memory-backed stores wired into a pipeline, handles kept for assertions
pub struct Harness {
    pub audit_log: Arc<MemoryAuditLog>,
    pub records: Arc<InMemoryRecordStore>,
    pub pipeline: HarvestPipeline,
}

pub fn harness() -> Harness {
    let audit_log = Arc::new(MemoryAuditLog::default());
    let records = Arc::new(InMemoryRecordStore::new());
    let pipeline = pipeline(audit_log.clone(), records.clone());
    Harness {
        audit_log,
        records,
        pipeline,
    }
}
