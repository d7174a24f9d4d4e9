//! JSON file audit log
//!
//! The whole trail is a single JSON array on disk. Appends rewrite the array
//! through a sibling temp file and an atomic rename, under an async mutex so
//! concurrent submissions never interleave their read-modify-write cycles.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use shared::AuditEntry;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use super::{AuditLog, StoreError};

/// Audit log backed by one JSON file
pub struct JsonFileAuditLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileAuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw entries as stored. A missing or empty file is an empty trail.
    async fn load(&self) -> Result<Vec<Value>, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        if bytes.iter().all(|b| b.is_ascii_whitespace()) {
            return Ok(Vec::new());
        }

        serde_json::from_slice::<Vec<Value>>(&bytes).map_err(|e| {
            StoreError::Corrupt(format!("{} is not a JSON array: {}", self.path.display(), e))
        })
    }

    async fn save(&self, entries: &[Value]) -> Result<(), StoreError> {
        let contents = serde_json::to_vec_pretty(entries)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let temp_path = self.path.with_extension("json.tmp");
        let mut file = tokio::fs::File::create(&temp_path).await?;
        file.write_all(&contents).await?;
        file.sync_all().await?;
        drop(file);

        restrict_permissions(&temp_path).await?;
        tokio::fs::rename(&temp_path, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl AuditLog for JsonFileAuditLog {
    async fn append(&self, entry: &AuditEntry) -> Result<(), StoreError> {
        let value = serde_json::to_value(entry)?;

        let _guard = self.lock.lock().await;
        let mut entries = self.load().await?;
        entries.push(value);
        self.save(&entries).await?;

        tracing::debug!(
            submission_id = %entry.submission_id,
            path = %self.path.display(),
            total = entries.len(),
            "Audit entry appended"
        );
        Ok(())
    }

    async fn entries(&self) -> Result<Vec<AuditEntry>, StoreError> {
        let _guard = self.lock.lock().await;
        self.load()
            .await?
            .into_iter()
            .map(|value| serde_json::from_value(value).map_err(StoreError::from))
            .collect()
    }
}

#[cfg(unix)]
async fn restrict_permissions(path: &Path) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;

    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).await?;
    Ok(())
}

#[cfg(not(unix))]
async fn restrict_permissions(_path: &Path) -> Result<(), StoreError> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, NaiveDate, TimeZone};
    use shared::{calculate_metrics, HarvestEvent, HarvestMethod, InsightEngine};
    use std::sync::Arc;
    use uuid::Uuid;

    fn entry(operator: &str) -> AuditEntry {
        let event = HarvestEvent {
            area: 150.0,
            production: 1800.0,
            loss_percentage: 12.0,
            duration_hours: 7.5,
            harvest_method: HarvestMethod::Mechanical,
            moisture_percentage: 25.0,
            harvest_date: NaiveDate::from_ymd_opt(2025, 4, 17).unwrap(),
            operator_id: operator.to_string(),
            equipment_id: "EQ67890".to_string(),
            variety: "RB867515".to_string(),
            ambient_temperature: 38.0,
            brix_percentage: 10.0,
        };
        let metrics = calculate_metrics(&event);
        let insights = InsightEngine::default().evaluate(&event, &metrics);
        let offset = FixedOffset::west_opt(3 * 3600).unwrap();
        AuditEntry {
            submission_id: Uuid::new_v4(),
            event,
            metrics,
            insights,
            created_at: offset.with_ymd_and_hms(2025, 4, 17, 18, 30, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let log = JsonFileAuditLog::new(dir.path().join("history.json"));

        assert!(log.entries().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_append_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let log = JsonFileAuditLog::new(dir.path().join("history.json"));

        let first = entry("OP1");
        let second = entry("OP2");
        log.append(&first).await.unwrap();
        log.append(&second).await.unwrap();

        let entries = log.entries().await.unwrap();
        assert_eq!(entries, vec![first, second]);
    }

    #[tokio::test]
    async fn test_file_is_a_flat_json_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        let log = JsonFileAuditLog::new(&path);
        log.append(&entry("OP1")).await.unwrap();

        let raw: Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        let items = raw.as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["operator_id"], "OP1");
        assert_eq!(items[0]["harvest_method"], "mechanical");
        assert_eq!(items[0]["harvest_date"], "2025-04-17");
        assert_eq!(items[0]["lost_tonnage"], 216.0);
        assert!(items[0]["alert"].as_str().unwrap().starts_with("Losses exceed"));
        assert_eq!(items[0]["created_at"], "2025-04-17T18:30:00-03:00");
        assert!(items[0].get("id").is_none());
    }

    #[tokio::test]
    async fn test_creates_missing_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let log = JsonFileAuditLog::new(dir.path().join("nested/audit/history.json"));

        log.append(&entry("OP1")).await.unwrap();
        assert_eq!(log.entries().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_reported_and_left_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        std::fs::write(&path, b"{ not an array").unwrap();
        let log = JsonFileAuditLog::new(&path);

        let err = log.append(&entry("OP1")).await.unwrap_err();
        assert!(matches!(err, StoreError::Corrupt(_)));
        assert_eq!(std::fs::read(&path).unwrap(), b"{ not an array");
    }

    #[tokio::test]
    async fn test_concurrent_appends_are_all_kept() {
        let dir = tempfile::tempdir().unwrap();
        let log = Arc::new(JsonFileAuditLog::new(dir.path().join("history.json")));

        let mut handles = Vec::new();
        for i in 0..16 {
            let log = Arc::clone(&log);
            handles.push(tokio::spawn(async move {
                log.append(&entry(&format!("OP{}", i))).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(log.entries().await.unwrap().len(), 16);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        let log = JsonFileAuditLog::new(&path);
        log.append(&entry("OP1")).await.unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
